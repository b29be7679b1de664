//! Query modules for the market SDK.
//!
//! Each module provides a query struct that borrows from a
//! [`MarketSdk`](crate::MarketSdk) and returns typed models. Reference data
//! goes through the SDK's [`ReferenceCache`](crate::cache::ReferenceCache);
//! per-card history and portfolio rows are always fetched fresh.

pub mod cards;
pub mod movers;
pub mod portfolio;
pub mod prices;

pub use cards::CardQuery;
pub use movers::MoversQuery;
pub use portfolio::PortfolioQuery;
pub use prices::PriceQuery;
