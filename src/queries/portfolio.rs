//! Portfolio persistence and valuation for one signed-in user.

use crate::analytics::trend::market_series;
use crate::analytics::valuation::value_portfolio;
use crate::error::{MarketError, Result};
use crate::models::{Holding, PortfolioValuation, UserSession};
use crate::MarketSdk;

/// Query interface for the holdings of the session's user.
pub struct PortfolioQuery<'a> {
    sdk: &'a MarketSdk,
    session: &'a UserSession,
}

impl<'a> PortfolioQuery<'a> {
    pub fn new(sdk: &'a MarketSdk, session: &'a UserSession) -> Self {
        Self { sdk, session }
    }

    /// Record the user's holding of a card.
    ///
    /// Saving a card already held replaces its quantity and purchase price;
    /// nothing is added to the previous quantity. Cards missing from the
    /// catalogue are rejected with [`MarketError::NotFound`].
    pub fn save(&self, card_id: &str, quantity: u32, purchase_price: f64) -> Result<Holding> {
        let holding = Holding::new(&self.session.user_id, card_id, quantity, purchase_price)?;
        if !self.sdk.catalogue()?.iter().any(|c| c.card_id == holding.card_id) {
            return Err(MarketError::NotFound(format!("unknown card: {}", card_id)));
        }
        self.sdk.store.upsert_holding(self.session, &holding)?;
        Ok(holding)
    }

    /// All holdings of the user, ordered by card id.
    pub fn list(&self) -> Result<Vec<Holding>> {
        self.sdk.store.holdings(self.session)
    }

    pub fn get(&self, card_id: &str) -> Result<Option<Holding>> {
        Ok(self.list()?.into_iter().find(|h| h.card_id == card_id))
    }

    /// Delete the user's holding of a card. Unknown cards are a no-op.
    pub fn remove(&self, card_id: &str) -> Result<()> {
        self.sdk.store.delete_holding(self.session, card_id)
    }

    /// Value every holding at its latest price in the configured valuation
    /// market.
    pub fn valuation(&self) -> Result<PortfolioValuation> {
        self.valuation_in(&self.sdk.config.valuation_market)
    }

    /// Value every holding at its latest price in `market`.
    ///
    /// Holdings without a price in that market are reported as unpriced.
    pub fn valuation_in(&self, market: &str) -> Result<PortfolioValuation> {
        let holdings = self.list()?;
        let mut latest = Vec::with_capacity(holdings.len());
        for holding in &holdings {
            let series = market_series(&self.sdk.store.card_history(&holding.card_id)?, market);
            latest.push((holding.card_id.clone(), series.last().map(|o| o.price_low)));
        }
        Ok(value_portfolio(&holdings, |card_id| {
            latest
                .iter()
                .find(|(id, _)| id == card_id)
                .and_then(|(_, price)| *price)
        }))
    }
}
