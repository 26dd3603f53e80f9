use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Normalised price assigned to every hour of a flat price curve
pub const FLAT_CURVE_LEVEL: f64 = 50.0;

/// Relative price level of an hour within the horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PriceCategory {
    Cheap,
    Moderate,
    Expensive,
}

/// Half-open thresholds on the 0-100 normalised scale:
/// `[0, cheap)` cheap, `[cheap, expensive)` moderate, `[expensive, 100]` expensive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceThresholds {
    pub cheap_below: f64,
    pub expensive_from: f64,
}

impl Default for PriceThresholds {
    fn default() -> Self {
        Self {
            cheap_below: 30.0,
            expensive_from: 70.0,
        }
    }
}

impl PriceThresholds {
    pub fn classify(&self, normalized: f64) -> PriceCategory {
        if normalized < self.cheap_below {
            PriceCategory::Cheap
        } else if normalized < self.expensive_from {
            PriceCategory::Moderate
        } else {
            PriceCategory::Expensive
        }
    }

    pub fn classify_all(&self, prices: &[f64]) -> Vec<PriceCategory> {
        normalize_prices(prices)
            .into_iter()
            .map(|p| self.classify(p))
            .collect()
    }
}

/// Linearly rescales prices onto 0-100 (cheapest hour 0, dearest 100).
/// A flat curve maps every hour to [`FLAT_CURVE_LEVEL`].
pub fn normalize_prices(prices: &[f64]) -> Vec<f64> {
    let (min, max) = match prices.iter().copied().minmax_by(f64::total_cmp) {
        MinMaxResult::MinMax(lo, hi) => (lo, hi),
        MinMaxResult::OneElement(p) => (p, p),
        MinMaxResult::NoElements => return Vec::new(),
    };
    let range = max - min;

    if range > 0.0 {
        prices.iter().map(|p| (p - min) / range * 100.0).collect()
    } else {
        vec![FLAT_CURVE_LEVEL; prices.len()]
    }
}
