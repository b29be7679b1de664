//! Over/under-valuation bands of the latest price against its trend.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{MarketError, Result};

/// Price above `trend * OVERVALUED_RATIO` is overvalued.
pub const OVERVALUED_RATIO: f64 = 1.15;
/// Price below `trend * BARGAIN_RATIO` is a bargain.
pub const BARGAIN_RATIO: f64 = 0.85;

/// Slack applied to the ratio comparisons.
///
/// `10.0 * 1.15` lands just below 11.5 while `10.0 * 0.85` is exactly 8.5, so
/// without it a price sitting on a threshold would classify differently at
/// the top and the bottom of the band.
const RATIO_EPSILON: f64 = 1e-9;

/// Classification of the latest price.
///
/// `pct` is the distance from the trend in whole percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    Overvalued { pct: u32 },
    Bargain { pct: u32 },
    Stable,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Overvalued { pct } => write!(f, "OVERVALUED (+{}%)", pct),
            Signal::Bargain { pct } => write!(f, "BARGAIN (-{}%)", pct),
            Signal::Stable => write!(f, "STABLE"),
        }
    }
}

/// Classify `price` against `trend`.
///
/// A zero trend has no ratio and fails with [`MarketError::DivideByZero`].
pub fn classify(price: f64, trend: f64) -> Result<Signal> {
    if !price.is_finite() || price < 0.0 {
        return Err(MarketError::InvalidArgument(format!(
            "price must be a non-negative amount, got {}",
            price
        )));
    }
    if trend == 0.0 {
        return Err(MarketError::DivideByZero(
            "trend is zero, no valuation ratio".into(),
        ));
    }
    if !trend.is_finite() || trend < 0.0 {
        return Err(MarketError::InvalidArgument(format!(
            "trend must be a positive amount, got {}",
            trend
        )));
    }

    let ratio = price / trend;
    let signal = if ratio > OVERVALUED_RATIO - RATIO_EPSILON {
        Signal::Overvalued {
            pct: whole_percent(ratio - 1.0),
        }
    } else if ratio < BARGAIN_RATIO + RATIO_EPSILON {
        Signal::Bargain {
            pct: whole_percent(1.0 - ratio),
        }
    } else {
        Signal::Stable
    };
    Ok(signal)
}

/// Whole percent, halves rounded away from zero (`12.5` becomes `13`).
fn whole_percent(fraction: f64) -> u32 {
    (fraction * 100.0).round() as u32
}
