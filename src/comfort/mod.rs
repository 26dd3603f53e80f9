pub mod risk;
pub mod score;

pub use risk::*;
pub use score::*;
