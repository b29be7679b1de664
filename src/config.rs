use std::path::PathBuf;
use std::time::Duration;

use crate::analytics::trend::TrendWindow;
use crate::error::{MarketError, Result};

pub const CARDS_TABLE: &str = "cards";
pub const PRICES_TABLE: &str = "card_prices";
pub const PORTFOLIO_TABLE: &str = "portfolio";

pub const SUPABASE_URL_ENV: &str = "SUPABASE_URL";
pub const SUPABASE_KEY_ENV: &str = "SUPABASE_KEY";

/// Language markets tracked by the scraper.
pub const MARKETS: [&str; 2] = ["EN", "CN"];

pub const DEFAULT_MARKET: &str = "EN";
pub const DEFAULT_MOVERS_LIMIT: usize = 5;
pub const DEFAULT_RECENT_WINDOW: usize = 1000;
pub const DEFAULT_TREND_OBSERVATIONS: usize = 7;

pub const CARDS_TTL: Duration = Duration::from_secs(600);
pub const RECENT_PRICES_TTL: Duration = Duration::from_secs(3600);
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Rows requested per page from the hosted store, matching its default
/// `max-rows` cap.
pub const REST_PAGE_SIZE: usize = 1000;

pub fn default_database_path() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("riftbound-market").join("market.duckdb")
    } else {
        PathBuf::from(".riftbound-market").join("market.duckdb")
    }
}

/// Read the hosted store URL and API key from the environment.
pub fn supabase_from_env() -> Result<(String, String)> {
    let url = std::env::var(SUPABASE_URL_ENV).map_err(|_| {
        MarketError::InvalidArgument(format!("{} is not set", SUPABASE_URL_ENV))
    })?;
    let key = std::env::var(SUPABASE_KEY_ENV).map_err(|_| {
        MarketError::InvalidArgument(format!("{} is not set", SUPABASE_KEY_ENV))
    })?;
    Ok((url, key))
}

/// Tunables for the analytics pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Window used when a trend has to be derived locally.
    pub trend_window: TrendWindow,
    /// Entries kept in each of the gainers/losers lists.
    pub movers_limit: usize,
    /// Newest price rows (across all cards) fed to the movers ranker.
    pub recent_window: usize,
    /// Market whose latest price values portfolio holdings.
    pub valuation_market: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            trend_window: TrendWindow::Observations(DEFAULT_TREND_OBSERVATIONS),
            movers_limit: DEFAULT_MOVERS_LIMIT,
            recent_window: DEFAULT_RECENT_WINDOW,
            valuation_market: DEFAULT_MARKET.to_string(),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        self.trend_window.validate()?;
        if self.recent_window == 0 {
            return Err(MarketError::InvalidArgument(
                "recent window must hold at least one row".into(),
            ));
        }
        if self.valuation_market.trim().is_empty() {
            return Err(MarketError::InvalidArgument(
                "valuation market must not be empty".into(),
            ));
        }
        Ok(())
    }
}
