//! Card catalogue queries over the cached reference data.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::models::Card;
use crate::MarketSdk;

// ---------------------------------------------------------------------------
// CardQuery
// ---------------------------------------------------------------------------

/// Query interface for the card catalogue.
pub struct CardQuery<'a> {
    sdk: &'a MarketSdk,
}

impl<'a> CardQuery<'a> {
    /// Create a new `CardQuery` bound to the given SDK.
    pub fn new(sdk: &'a MarketSdk) -> Self {
        Self { sdk }
    }

    /// Every card, ordered by name.
    pub fn all(&self) -> Result<Vec<Card>> {
        self.sdk.catalogue()
    }

    /// Look up a card by id.
    pub fn get(&self, card_id: &str) -> Result<Option<Card>> {
        Ok(self
            .sdk
            .catalogue()?
            .into_iter()
            .find(|c| c.card_id == card_id))
    }

    /// Look up a card by the name shown in pickers (see [`Card::display_name`]).
    pub fn get_by_display_name(&self, display_name: &str) -> Result<Option<Card>> {
        Ok(self
            .sdk
            .catalogue()?
            .into_iter()
            .find(|c| c.display_name() == display_name))
    }

    /// Cards of one set, or all cards when `set_code` is `None`.
    pub fn in_set(&self, set_code: Option<&str>) -> Result<Vec<Card>> {
        let cards = self.sdk.catalogue()?;
        Ok(match set_code {
            Some(code) => cards
                .into_iter()
                .filter(|c| c.set_code.eq_ignore_ascii_case(code))
                .collect(),
            None => cards,
        })
    }

    /// Distinct set codes, sorted.
    pub fn set_codes(&self) -> Result<Vec<String>> {
        let codes: BTreeSet<String> = self
            .sdk
            .catalogue()?
            .into_iter()
            .map(|c| c.set_code)
            .filter(|code| !code.is_empty())
            .collect();
        Ok(codes.into_iter().collect())
    }

    /// Distinct display names of the cards in `set_code` (or all), sorted.
    pub fn display_names(&self, set_code: Option<&str>) -> Result<Vec<String>> {
        let names: BTreeSet<String> = self
            .in_set(set_code)?
            .iter()
            .map(Card::display_name)
            .collect();
        Ok(names.into_iter().collect())
    }
}
