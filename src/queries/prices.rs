//! Price history, trend and signal queries for a single card.

use crate::analytics::signal::classify;
use crate::analytics::trend::{latest_trend, market_series, trailing_trend};
use crate::config::MARKETS;
use crate::error::{MarketError, Result};
use crate::models::{MarketSignal, PriceObservation, TrendPoint};
use crate::MarketSdk;

// ---------------------------------------------------------------------------
// PriceQuery
// ---------------------------------------------------------------------------

/// Query interface for the price history of individual cards.
///
/// History is fetched per card on every call so newly scraped rows are
/// visible immediately.
pub struct PriceQuery<'a> {
    sdk: &'a MarketSdk,
}

impl<'a> PriceQuery<'a> {
    /// Create a new `PriceQuery` bound to the given SDK.
    pub fn new(sdk: &'a MarketSdk) -> Self {
        Self { sdk }
    }

    /// Full history of a card in the given markets, oldest first.
    ///
    /// An unknown card or an empty market selection yields an empty list.
    pub fn history(&self, card_id: &str, markets: &[&str]) -> Result<Vec<PriceObservation>> {
        if markets.is_empty() {
            return Ok(Vec::new());
        }
        let history = self.sdk.store.card_history(card_id)?;
        tracing::debug!(card_id, rows = history.len(), "fetched price history");
        Ok(history
            .into_iter()
            .filter(|o| markets.iter().any(|m| o.is_in_market(m)))
            .collect())
    }

    /// Full history of a card in every tracked market, oldest first.
    pub fn history_all(&self, card_id: &str) -> Result<Vec<PriceObservation>> {
        self.history(card_id, &MARKETS)
    }

    /// Newest observation of a card in one market.
    pub fn latest(&self, card_id: &str, market: &str) -> Result<Option<PriceObservation>> {
        Ok(self.series(card_id, market)?.pop())
    }

    /// Price and trailing trend for every observation in one market.
    ///
    /// Trends stored with the observations win over the locally derived
    /// average.
    pub fn trend(&self, card_id: &str, market: &str) -> Result<Vec<TrendPoint>> {
        let series = self.series(card_id, market)?;
        let mut points = trailing_trend(&series, self.sdk.config.trend_window)?;
        for (point, obs) in points.iter_mut().zip(&series) {
            if let Some(stored) = obs.price_trend {
                point.trend = stored;
            }
        }
        Ok(points)
    }

    /// Compare the newest price in one market with its trend.
    ///
    /// Returns `Ok(None)` when the card has no observations in that market.
    /// A zero trend withholds the classification (`signal` is `None`).
    pub fn signal(&self, card_id: &str, market: &str) -> Result<Option<MarketSignal>> {
        let series = self.series(card_id, market)?;
        let Some(last) = series.last() else {
            return Ok(None);
        };
        let Some(trend) = latest_trend(&series, self.sdk.config.trend_window)? else {
            return Ok(None);
        };

        let signal = match classify(last.price_low, trend) {
            Ok(signal) => Some(signal),
            Err(MarketError::DivideByZero(reason)) => {
                tracing::warn!(card_id, market, %reason, "signal withheld");
                None
            }
            Err(e) => return Err(e),
        };

        Ok(Some(MarketSignal {
            card_id: card_id.to_string(),
            market: last.market.clone(),
            recorded_at: last.recorded_at,
            last_price: last.price_low,
            trend,
            signal,
        }))
    }

    fn series(&self, card_id: &str, market: &str) -> Result<Vec<PriceObservation>> {
        Ok(market_series(&self.sdk.store.card_history(card_id)?, market))
    }
}
