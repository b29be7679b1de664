//! Trailing moving-average trend per (card, market) series.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{MarketError, Result};
use crate::models::{PriceObservation, TrendPoint};

/// Span of the trailing average.
///
/// Scraped trends are commonly described as "7-day" averages, but with one
/// scrape a day that is the same as seven observations, so both are offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendWindow {
    /// The newest `n` observations, the current one included.
    Observations(usize),
    /// Observations newer than `d` days before the current one.
    Days(i64),
}

impl Default for TrendWindow {
    fn default() -> Self {
        TrendWindow::Observations(crate::config::DEFAULT_TREND_OBSERVATIONS)
    }
}

impl TrendWindow {
    pub fn validate(&self) -> Result<()> {
        match *self {
            TrendWindow::Observations(0) => Err(MarketError::InvalidArgument(
                "trend window must span at least one observation".into(),
            )),
            TrendWindow::Days(d) if d <= 0 => Err(MarketError::InvalidArgument(format!(
                "trend window must span at least one day, got {}",
                d
            ))),
            _ => Ok(()),
        }
    }

    /// Index of the oldest observation inside the window ending at `end`.
    fn window_start(&self, series: &[PriceObservation], end: usize, prev_start: usize) -> usize {
        match *self {
            TrendWindow::Observations(n) => (end + 1).saturating_sub(n),
            TrendWindow::Days(d) => {
                // A span past the representable range covers the whole series
                let Some(cutoff) = Duration::try_days(d)
                    .and_then(|span| series[end].recorded_at.checked_sub_signed(span))
                else {
                    return 0;
                };
                let mut start = prev_start;
                while start < end && series[start].recorded_at <= cutoff {
                    start += 1;
                }
                start
            }
        }
    }
}

/// Observations of one market, ascending by timestamp.
///
/// The sort is stable, so observations sharing a timestamp keep store order.
pub fn market_series(observations: &[PriceObservation], market: &str) -> Vec<PriceObservation> {
    let mut series: Vec<PriceObservation> = observations
        .iter()
        .filter(|o| o.is_in_market(market))
        .cloned()
        .collect();
    series.sort_by_key(|o| o.recorded_at);
    series
}

/// Pair every observation of an ascending series with its trailing mean.
///
/// An empty series yields no points.
pub fn trailing_trend(series: &[PriceObservation], window: TrendWindow) -> Result<Vec<TrendPoint>> {
    window.validate()?;

    let mut points = Vec::with_capacity(series.len());
    let mut start = 0;
    for end in 0..series.len() {
        start = window.window_start(series, end, start);
        let span = &series[start..=end];
        let mean = span.iter().map(|o| o.price_low).sum::<f64>() / span.len() as f64;
        points.push(TrendPoint {
            recorded_at: series[end].recorded_at,
            price: series[end].price_low,
            trend: mean,
        });
    }
    Ok(points)
}

/// Trend at the newest observation of an ascending series.
///
/// Prefers the trend stored with the observation and derives one with
/// `window` otherwise. `None` means there is no data.
pub fn latest_trend(series: &[PriceObservation], window: TrendWindow) -> Result<Option<f64>> {
    let Some(last) = series.last() else {
        return Ok(None);
    };
    if let Some(stored) = last.price_trend {
        return Ok(Some(stored));
    }
    Ok(trailing_trend(series, window)?.last().map(|p| p.trend))
}
