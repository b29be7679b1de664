use serde::{Deserialize, Serialize};

use crate::error::{MarketError, Result};

// ---------------------------------------------------------------------------
// UserSession: Authenticated user context
// ---------------------------------------------------------------------------

/// The signed-in user a portfolio operation acts for.
///
/// `user_id` partitions portfolio rows. `access_token` is forwarded to the
/// hosted store so its row-level policies apply; the local store ignores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub user_id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl UserSession {
    pub fn new(user_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            access_token: None,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Holding: A user's position in one card
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub user_id: String,
    pub card_id: String,
    pub quantity: u32,
    pub purchase_price: f64,
}

impl Holding {
    /// Build a holding, rejecting negative or non-finite purchase prices.
    pub fn new(
        user_id: impl Into<String>,
        card_id: impl Into<String>,
        quantity: u32,
        purchase_price: f64,
    ) -> Result<Self> {
        if !purchase_price.is_finite() || purchase_price < 0.0 {
            return Err(MarketError::InvalidArgument(format!(
                "purchase price must be a non-negative amount, got {}",
                purchase_price
            )));
        }
        let card_id = card_id.into();
        if card_id.trim().is_empty() {
            return Err(MarketError::InvalidArgument("card id must not be empty".into()));
        }
        Ok(Self {
            user_id: user_id.into(),
            card_id,
            quantity,
            purchase_price,
        })
    }
}

// ---------------------------------------------------------------------------
// Valuation: Mark-to-market of one holding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    pub card_id: String,
    pub quantity: u32,
    pub purchase_price: f64,
    pub latest_price: f64,
    pub cost_basis: f64,
    pub current_value: f64,
    pub profit: f64,
    /// Profit relative to cost basis in percent; `None` for a zero cost basis.
    pub profit_pct: Option<f64>,
}

// ---------------------------------------------------------------------------
// PortfolioValuation: Totals over all holdings of a user
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PortfolioValuation {
    pub lines: Vec<Valuation>,
    /// Card ids held but without any known price.
    pub unpriced: Vec<String>,
    pub total_cost: f64,
    pub total_value: f64,
    pub total_profit: f64,
}
