//! Raw store rows and their validation into typed models.
//!
//! Both stores deserialize rows into these loosely typed records first; the
//! rest of the crate only ever sees the validated models.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MarketError, Result};
use crate::models::{normalize_market, Card, Holding, PriceObservation};

// ---------------------------------------------------------------------------
// CardRecord
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardRecord {
    pub card_id: Option<String>,
    pub name: Option<String>,
    pub is_showcase: Option<bool>,
    pub set_code: Option<String>,
    pub rarity: Option<String>,
    pub domain: Option<String>,
    pub cost: Option<i64>,
    pub ability: Option<String>,
    pub image_url: Option<String>,
}

impl TryFrom<CardRecord> for Card {
    type Error = MarketError;

    fn try_from(row: CardRecord) -> Result<Self> {
        let card_id = required(row.card_id, "card_id")?;
        let name = required(row.name, "name")?;
        Ok(Card {
            card_id,
            name,
            is_showcase: row.is_showcase.unwrap_or(false),
            set_code: row.set_code.unwrap_or_default(),
            rarity: row.rarity,
            domain: row.domain,
            cost: row.cost,
            ability: row.ability.filter(|a| !a.trim().is_empty()),
            image_url: row.image_url,
        })
    }
}

// ---------------------------------------------------------------------------
// PriceRecord
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceRecord {
    pub card_id: Option<String>,
    pub language: Option<String>,
    pub recorded_at: Option<String>,
    pub price_low: Option<f64>,
    pub price_trend: Option<f64>,
}

impl TryFrom<PriceRecord> for PriceObservation {
    type Error = MarketError;

    fn try_from(row: PriceRecord) -> Result<Self> {
        let card_id = required(row.card_id, "card_id")?;
        let market = normalize_market(&required(row.language, "language")?);
        let recorded_at = parse_timestamp(&required(row.recorded_at, "recorded_at")?)?;
        let price_low = row
            .price_low
            .ok_or_else(|| MarketError::InvalidArgument("price row without price_low".into()))?;
        if !price_low.is_finite() || price_low < 0.0 {
            return Err(MarketError::InvalidArgument(format!(
                "price_low must be a non-negative amount, got {}",
                price_low
            )));
        }
        Ok(PriceObservation {
            card_id,
            market,
            recorded_at,
            price_low,
            price_trend: row.price_trend.filter(|t| t.is_finite() && *t >= 0.0),
        })
    }
}

impl From<&PriceObservation> for PriceRecord {
    fn from(obs: &PriceObservation) -> Self {
        Self {
            card_id: Some(obs.card_id.clone()),
            language: Some(obs.market.clone()),
            recorded_at: Some(format_timestamp(&obs.recorded_at)),
            price_low: Some(obs.price_low),
            price_trend: obs.price_trend,
        }
    }
}

// ---------------------------------------------------------------------------
// HoldingRecord
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HoldingRecord {
    pub user_id: Option<String>,
    pub card_id: Option<String>,
    pub quantity: Option<i64>,
    pub purchase_price: Option<f64>,
}

impl TryFrom<HoldingRecord> for Holding {
    type Error = MarketError;

    fn try_from(row: HoldingRecord) -> Result<Self> {
        let user_id = required(row.user_id, "user_id")?;
        let card_id = required(row.card_id, "card_id")?;
        let raw_quantity = row
            .quantity
            .ok_or_else(|| MarketError::InvalidArgument("holding row without quantity".into()))?;
        let quantity = u32::try_from(raw_quantity).map_err(|_| {
            MarketError::InvalidArgument(format!("holding quantity out of range: {}", raw_quantity))
        })?;
        let purchase_price = row.purchase_price.ok_or_else(|| {
            MarketError::InvalidArgument("holding row without purchase_price".into())
        })?;
        Holding::new(user_id, card_id, quantity, purchase_price)
    }
}

impl From<&Holding> for HoldingRecord {
    fn from(h: &Holding) -> Self {
        Self {
            user_id: Some(h.user_id.clone()),
            card_id: Some(h.card_id.clone()),
            quantity: Some(i64::from(h.quantity)),
            purchase_price: Some(h.purchase_price),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Validate a batch of rows, dropping (and logging) the ones that fail.
pub fn validate_rows<R, T>(rows: Vec<R>, what: &str) -> Vec<T>
where
    T: TryFrom<R, Error = MarketError>,
{
    let total = rows.len();
    let valid: Vec<T> = rows
        .into_iter()
        .filter_map(|row| match T::try_from(row) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(what, error = %e, "skipping invalid row");
                None
            }
        })
        .collect();
    if valid.len() < total {
        tracing::warn!(what, skipped = total - valid.len(), total, "dropped invalid rows");
    }
    valid
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(MarketError::InvalidArgument(format!("row without {}", field))),
    }
}

/// Parse a store timestamp.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[.f]` and `YYYY-MM-DD`; the last two
/// are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }
    Err(MarketError::InvalidArgument(format!(
        "unrecognized timestamp: {}",
        raw
    )))
}

/// Fixed-width UTC form, so text ordering matches time ordering.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
