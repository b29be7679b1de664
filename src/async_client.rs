//! Async wrapper around [`MarketSdk`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all SDK operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free.
//!
//! # Example
//!
//! ```no_run
//! use riftbound_market::{AsyncMarketSdk, MarketSdk};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let sdk = AsyncMarketSdk::build(MarketSdk::builder().from_env()).await.unwrap();
//!
//!     // Run any sync SDK method via closure
//!     let names = sdk.run(|s| s.cards().display_names(None)).await.unwrap();
//!
//!     // Convenience method for the movers ranking
//!     let movers = sdk.movers("EN").await.unwrap();
//! }
//! ```

use std::sync::{Arc, Mutex};

use crate::error::{MarketError, Result};
use crate::models::{MarketSignal, MoversReport};
use crate::{MarketSdk, MarketSdkBuilder};

/// Async wrapper around [`MarketSdk`].
///
/// All operations are dispatched to a blocking thread pool via
/// [`tokio::task::spawn_blocking`]. The underlying [`MarketSdk`] is
/// protected by a [`Mutex`] since it uses `RefCell` internally.
#[derive(Clone)]
pub struct AsyncMarketSdk {
    inner: Arc<Mutex<MarketSdk>>,
}

impl AsyncMarketSdk {
    /// Build the SDK on the blocking thread pool.
    ///
    /// Opening a database file or building an HTTP client may block, so it
    /// is kept off the event loop.
    pub async fn build(builder: MarketSdkBuilder) -> Result<Self> {
        tokio::task::spawn_blocking(move || builder.build().map(Self::new))
            .await
            .map_err(|e| MarketError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Wrap an already built SDK.
    pub fn new(sdk: MarketSdk) -> Self {
        Self {
            inner: Arc::new(Mutex::new(sdk)),
        }
    }

    /// Run a sync SDK operation on the blocking thread pool.
    ///
    /// The closure receives an `&MarketSdk` reference and should return
    /// a `Result<T>`.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&MarketSdk) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sdk = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = sdk
                .lock()
                .map_err(|_| MarketError::InvalidArgument("SDK lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| MarketError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Gainers and losers of a market.
    pub async fn movers(&self, market: &str) -> Result<MoversReport> {
        let market = market.to_string();
        self.run(move |s| s.movers().for_market(&market)).await
    }

    /// Trend signal of one card in one market.
    pub async fn signal(&self, card_id: &str, market: &str) -> Result<Option<MarketSignal>> {
        let card_id = card_id.to_string();
        let market = market.to_string();
        self.run(move |s| s.prices().signal(&card_id, &market)).await
    }

    /// Drop all cached reference data.
    pub async fn refresh(&self) -> Result<()> {
        self.run(|s| {
            s.refresh();
            Ok(())
        })
        .await
    }
}
