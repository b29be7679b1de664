//! Pure computations over price snapshots.
//!
//! Nothing in here touches a store or the cache: callers pass in the
//! observations and holdings they already fetched.

pub mod movers;
pub mod signal;
pub mod trend;
pub mod valuation;

pub use movers::{compute_movers, rank_movers};
pub use signal::{classify, Signal};
pub use trend::{latest_trend, market_series, trailing_trend, TrendWindow};
pub use valuation::{value_holding, value_portfolio};
