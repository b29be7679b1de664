use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PriceObservation: One scraped price point
// ---------------------------------------------------------------------------

/// A single price point for a card in one language market.
///
/// Observations are append-only. `price_trend` is the trailing average stored
/// next to the price by the scraper, when it supplied one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub card_id: String,
    pub market: String,
    pub recorded_at: DateTime<Utc>,
    pub price_low: f64,
    pub price_trend: Option<f64>,
}

impl PriceObservation {
    pub fn is_in_market(&self, market: &str) -> bool {
        self.market.eq_ignore_ascii_case(market.trim())
    }
}

/// Canonical form of a market/language tag (`" en"` -> `"EN"`).
pub fn normalize_market(tag: &str) -> String {
    tag.trim().to_ascii_uppercase()
}

// ---------------------------------------------------------------------------
// TrendPoint: Observation paired with its trailing average
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub recorded_at: DateTime<Utc>,
    pub price: f64,
    pub trend: f64,
}
