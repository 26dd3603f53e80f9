pub mod building;
pub mod forecast;
pub mod heat_pump;
pub mod schedule;

pub use building::*;
pub use forecast::*;
pub use heat_pump::*;
pub use schedule::*;
