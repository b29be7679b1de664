//! Market movers across all cards of one market.

use crate::analytics::movers::{compute_movers, rank_movers};
use crate::error::Result;
use crate::models::{normalize_market, MoversReport};
use crate::MarketSdk;

/// Query interface for top gainers and losers.
pub struct MoversQuery<'a> {
    sdk: &'a MarketSdk,
}

impl<'a> MoversQuery<'a> {
    pub fn new(sdk: &'a MarketSdk) -> Self {
        Self { sdk }
    }

    /// Gainers and losers of `market` over the cached recent-price window.
    ///
    /// Cards are named by their display name, or their id when the
    /// catalogue does not know them.
    pub fn for_market(&self, market: &str) -> Result<MoversReport> {
        self.top(market, self.sdk.config.movers_limit)
    }

    /// Like [`for_market`](Self::for_market) with an explicit list length.
    pub fn top(&self, market: &str, limit: usize) -> Result<MoversReport> {
        let market = normalize_market(market);
        let recent = self.sdk.recent_snapshot()?;
        let cards = self.sdk.catalogue()?;

        let movers = compute_movers(&recent, &market, |card_id| {
            cards
                .iter()
                .find(|c| c.card_id == card_id)
                .map(|c| c.display_name())
                .unwrap_or_else(|| card_id.to_string())
        });
        tracing::debug!(%market, eligible = movers.len(), "ranked market movers");
        Ok(rank_movers(&market, movers, limit))
    }
}
