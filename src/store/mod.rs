//! Tabular store access.
//!
//! [`PriceStore`] is the seam between the SDK and wherever the card and price
//! tables live. [`DuckDbStore`] keeps them in an embedded DuckDB database
//! (local use, ingestion, tests); [`RestStore`] talks to the hosted
//! PostgREST endpoint the scraper writes to.

pub mod embedded;
pub mod records;
pub mod rest;

pub use embedded::DuckDbStore;
pub use rest::RestStore;

use crate::error::Result;
use crate::models::{Card, Holding, PriceObservation, UserSession};

/// Read access to card and price data plus portfolio persistence.
///
/// Implementations validate rows into typed models before returning them.
/// Missing data is an empty result, never an error.
pub trait PriceStore: Send {
    /// All reference cards.
    fn cards(&self) -> Result<Vec<Card>>;

    /// Full price history of one card, oldest first.
    fn card_history(&self, card_id: &str) -> Result<Vec<PriceObservation>>;

    /// The `limit` newest observations across all cards, newest first.
    fn recent_prices(&self, limit: usize) -> Result<Vec<PriceObservation>>;

    /// Holdings of the session's user, ordered by card id.
    fn holdings(&self, session: &UserSession) -> Result<Vec<Holding>>;

    /// Insert or replace the holding keyed on (user, card).
    ///
    /// An existing row is overwritten, quantities are never summed.
    fn upsert_holding(&self, session: &UserSession, holding: &Holding) -> Result<()>;

    /// Delete the session user's holding of `card_id`, if any.
    fn delete_holding(&self, session: &UserSession, card_id: &str) -> Result<()>;
}

/// Reject writes of a holding on behalf of another user.
pub(crate) fn check_owner(session: &UserSession, holding: &Holding) -> Result<()> {
    if holding.user_id != session.user_id {
        return Err(crate::error::MarketError::InvalidArgument(format!(
            "holding belongs to user {}, session is {}",
            holding.user_id, session.user_id
        )));
    }
    Ok(())
}
