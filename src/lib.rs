//! Riftbound market SDK for Rust.
//!
//! Reads card reference data and scraped price observations from a tabular
//! store, and turns them into values a dashboard can render: price history
//! with a trailing trend, an over/under-valuation signal, the top market
//! movers, and the mark-to-market of a user's portfolio.
//!
//! # Quick start
//!
//! ```no_run
//! use riftbound_market::MarketSdk;
//!
//! let sdk = MarketSdk::builder().from_env().build().unwrap();
//!
//! // Signal for one card in the English market
//! let signal = sdk.prices().signal("OGN-001", "EN").unwrap();
//!
//! // Top five gainers and losers
//! let movers = sdk.movers().for_market("EN").unwrap();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod analytics;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod queries;
pub mod sql_builder;
pub mod store;

pub use analytics::signal::Signal;
pub use analytics::trend::TrendWindow;
#[cfg(feature = "async")]
pub use async_client::AsyncMarketSdk;
pub use auth::{IdentityProvider, SupabaseAuth};
pub use cache::ReferenceCache;
pub use config::AnalysisConfig;
pub use error::{MarketError, Result};
pub use sql_builder::SqlBuilder;
pub use store::{DuckDbStore, PriceStore, RestStore};

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use models::{Card, PriceObservation, UserSession};

// ---------------------------------------------------------------------------
// MarketSdkBuilder
// ---------------------------------------------------------------------------

enum Backend {
    InMemory,
    File(PathBuf),
    Hosted { url: String, key: String },
    FromEnv,
    Custom(Box<dyn PriceStore>),
}

/// Builder for configuring and constructing a [`MarketSdk`] instance.
///
/// Use [`MarketSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](MarketSdkBuilder::build) to create the SDK.
pub struct MarketSdkBuilder {
    backend: Backend,
    config: AnalysisConfig,
    cards_ttl: Duration,
    recent_ttl: Duration,
    timeout: Duration,
}

impl Default for MarketSdkBuilder {
    fn default() -> Self {
        Self {
            backend: Backend::File(config::default_database_path()),
            config: AnalysisConfig::default(),
            cards_ttl: config::CARDS_TTL,
            recent_ttl: config::RECENT_PRICES_TTL,
            timeout: config::HTTP_TIMEOUT,
        }
    }
}

impl MarketSdkBuilder {
    /// Use a fresh in-memory DuckDB database.
    pub fn in_memory(mut self) -> Self {
        self.backend = Backend::InMemory;
        self
    }

    /// Use a DuckDB database file.
    ///
    /// If no backend is chosen, the platform data directory is used
    /// (e.g. `~/.local/share/riftbound-market/market.duckdb` on Linux).
    pub fn database_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.backend = Backend::File(path.as_ref().to_path_buf());
        self
    }

    /// Use the hosted store at `url` with the project API key.
    pub fn supabase(mut self, url: &str, key: &str) -> Self {
        self.backend = Backend::Hosted {
            url: url.to_string(),
            key: key.to_string(),
        };
        self
    }

    /// Use the hosted store named by `SUPABASE_URL` / `SUPABASE_KEY`,
    /// read when the SDK is built.
    pub fn from_env(mut self) -> Self {
        self.backend = Backend::FromEnv;
        self
    }

    /// Use an already constructed store.
    pub fn store<S: PriceStore + 'static>(mut self, store: S) -> Self {
        self.backend = Backend::Custom(Box::new(store));
        self
    }

    /// Window for locally derived trends. Defaults to 7 observations.
    pub fn trend_window(mut self, window: TrendWindow) -> Self {
        self.config.trend_window = window;
        self
    }

    /// Length of the gainers/losers lists. Defaults to 5.
    pub fn movers_limit(mut self, limit: usize) -> Self {
        self.config.movers_limit = limit;
        self
    }

    /// Newest price rows fetched for the movers ranking. Defaults to 1000.
    pub fn recent_window(mut self, rows: usize) -> Self {
        self.config.recent_window = rows;
        self
    }

    /// Market used to value portfolios. Defaults to `EN`.
    pub fn valuation_market(mut self, market: &str) -> Self {
        self.config.valuation_market = models::normalize_market(market);
        self
    }

    /// Lifetime of the cached card catalogue. Defaults to 10 minutes.
    pub fn cards_ttl(mut self, ttl: Duration) -> Self {
        self.cards_ttl = ttl;
        self
    }

    /// Lifetime of the cached recent-price snapshot. Defaults to 1 hour.
    pub fn recent_ttl(mut self, ttl: Duration) -> Self {
        self.recent_ttl = ttl;
        self
    }

    /// HTTP request timeout for the hosted store. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the SDK, opening or connecting to the configured store.
    ///
    /// Nothing is fetched eagerly; reference data is loaded on first query.
    pub fn build(self) -> Result<MarketSdk> {
        self.config.validate()?;
        let window = self.config.trend_window;

        let store: Box<dyn PriceStore> = match self.backend {
            Backend::InMemory => Box::new(DuckDbStore::open_in_memory()?.with_trend_window(window)?),
            Backend::File(path) => Box::new(DuckDbStore::open(path)?.with_trend_window(window)?),
            Backend::Hosted { url, key } => Box::new(RestStore::new(&url, &key, self.timeout)?),
            Backend::FromEnv => {
                let (url, key) = config::supabase_from_env()?;
                Box::new(RestStore::new(&url, &key, self.timeout)?)
            }
            Backend::Custom(store) => store,
        };

        Ok(MarketSdk {
            store,
            cache: RefCell::new(ReferenceCache::new(self.cards_ttl, self.recent_ttl)),
            config: self.config,
        })
    }
}

// ---------------------------------------------------------------------------
// MarketSdk
// ---------------------------------------------------------------------------

/// The main entry point for the market SDK.
///
/// Owns the [`PriceStore`] and the [`ReferenceCache`], and exposes the
/// domain query interfaces as lightweight borrowing wrappers.
///
/// Created via [`MarketSdk::builder()`].
pub struct MarketSdk {
    pub(crate) store: Box<dyn PriceStore>,
    pub(crate) cache: RefCell<ReferenceCache>,
    pub(crate) config: AnalysisConfig,
}

impl MarketSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> MarketSdkBuilder {
        MarketSdkBuilder::default()
    }

    // -- Query accessors ---------------------------------------------------

    /// Access the card catalogue.
    pub fn cards(&self) -> queries::cards::CardQuery<'_> {
        queries::cards::CardQuery::new(self)
    }

    /// Access per-card price history, trends and signals.
    pub fn prices(&self) -> queries::prices::PriceQuery<'_> {
        queries::prices::PriceQuery::new(self)
    }

    /// Access the market movers ranking.
    pub fn movers(&self) -> queries::movers::MoversQuery<'_> {
        queries::movers::MoversQuery::new(self)
    }

    /// Access the portfolio of the signed-in user.
    pub fn portfolio<'a>(&'a self, session: &'a UserSession) -> queries::portfolio::PortfolioQuery<'a> {
        queries::portfolio::PortfolioQuery::new(self, session)
    }

    // -- Cache and configuration -------------------------------------------

    /// Drop all cached reference data so the next query refetches it.
    pub fn refresh(&self) {
        self.cache.borrow_mut().invalidate();
        tracing::info!("reference cache cleared");
    }

    /// Return the analysis settings in effect.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Return the underlying store for advanced usage.
    pub fn store(&self) -> &dyn PriceStore {
        self.store.as_ref()
    }

    /// Card catalogue, from the cache when fresh.
    pub(crate) fn catalogue(&self) -> Result<Vec<Card>> {
        if let Some(cards) = self.cache.borrow().cards() {
            tracing::debug!(cards = cards.len(), "card catalogue served from cache");
            return Ok(cards.to_vec());
        }
        let cards = self.store.cards()?;
        tracing::debug!(cards = cards.len(), "fetched card catalogue");
        self.cache.borrow_mut().put_cards(cards.clone());
        Ok(cards)
    }

    /// Recent-price window across all cards, from the cache when fresh.
    pub(crate) fn recent_snapshot(&self) -> Result<Vec<PriceObservation>> {
        if let Some(prices) = self.cache.borrow().recent_prices() {
            return Ok(prices.to_vec());
        }
        let prices = self.store.recent_prices(self.config.recent_window)?;
        tracing::debug!(rows = prices.len(), "fetched recent prices");
        self.cache.borrow_mut().put_recent_prices(prices.clone());
        Ok(prices)
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for MarketSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.cache.borrow();
        write!(
            f,
            "MarketSdk(trend_window={:?}, movers_limit={}, valuation_market={}, cached={})",
            self.config.trend_window,
            self.config.movers_limit,
            self.config.valuation_market,
            !cache.is_empty()
        )
    }
}
