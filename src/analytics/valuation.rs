//! Mark-to-market of portfolio holdings.

use crate::models::{Holding, PortfolioValuation, Valuation};

/// Value one holding at `latest_price`.
pub fn value_holding(holding: &Holding, latest_price: f64) -> Valuation {
    let quantity = f64::from(holding.quantity);
    let cost_basis = quantity * holding.purchase_price;
    let current_value = quantity * latest_price;
    let profit = current_value - cost_basis;
    let profit_pct = if cost_basis > 0.0 {
        Some(profit / cost_basis * 100.0)
    } else {
        None
    };

    Valuation {
        card_id: holding.card_id.clone(),
        quantity: holding.quantity,
        purchase_price: holding.purchase_price,
        latest_price,
        cost_basis,
        current_value,
        profit,
        profit_pct,
    }
}

/// Value every holding with a known price and total the results.
///
/// Holdings for which `price_of` returns `None` are listed as unpriced and
/// left out of the totals.
pub fn value_portfolio<F>(holdings: &[Holding], mut price_of: F) -> PortfolioValuation
where
    F: FnMut(&str) -> Option<f64>,
{
    let mut out = PortfolioValuation::default();
    for holding in holdings {
        match price_of(&holding.card_id) {
            Some(price) => {
                let line = value_holding(holding, price);
                out.total_cost += line.cost_basis;
                out.total_value += line.current_value;
                out.total_profit += line.profit;
                out.lines.push(line);
            }
            None => out.unpriced.push(holding.card_id.clone()),
        }
    }
    out
}
