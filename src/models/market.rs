use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::signal::Signal;

// ---------------------------------------------------------------------------
// MarketMover: Short-term price change of one card
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketMover {
    pub card_id: String,
    pub name: String,
    /// Change between the two newest observations, in percent (two decimals).
    pub pct_change: f64,
    pub latest_price: f64,
}

// ---------------------------------------------------------------------------
// MoversReport: Top gainers and losers of a market
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MoversReport {
    pub market: String,
    pub gainers: Vec<MarketMover>,
    pub losers: Vec<MarketMover>,
}

impl MoversReport {
    pub fn is_empty(&self) -> bool {
        self.gainers.is_empty() && self.losers.is_empty()
    }
}

// ---------------------------------------------------------------------------
// MarketSignal: Latest price of a card compared to its trend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSignal {
    pub card_id: String,
    pub market: String,
    pub recorded_at: DateTime<Utc>,
    pub last_price: f64,
    pub trend: f64,
    /// `None` when the classification was withheld (zero trend).
    pub signal: Option<Signal>,
}
