//! Portfolio valuator tests.

use riftbound_market::analytics::valuation::{value_holding, value_portfolio};
use riftbound_market::models::Holding;
use riftbound_market::MarketError;

fn holding(card_id: &str, quantity: u32, price: f64) -> Holding {
    Holding::new("user-1", card_id, quantity, price).unwrap()
}

#[test]
fn value_and_profit_of_a_holding() {
    let v = value_holding(&holding("OGN-001", 2, 5.0), 8.0);
    assert_eq!(v.current_value, 16.0);
    assert_eq!(v.cost_basis, 10.0);
    assert_eq!(v.profit, 6.0);
    assert_eq!(v.profit_pct, Some(60.0));
    assert_eq!(v.latest_price, 8.0);
}

#[test]
fn losses_are_negative_profit() {
    let v = value_holding(&holding("OGN-001", 4, 10.0), 7.5);
    assert_eq!(v.current_value, 30.0);
    assert_eq!(v.profit, -10.0);
    assert_eq!(v.profit_pct, Some(-25.0));
}

#[test]
fn zero_quantity_is_worth_nothing() {
    let v = value_holding(&holding("OGN-001", 0, 5.0), 8.0);
    assert_eq!(v.current_value, 0.0);
    assert_eq!(v.profit, 0.0);
    assert_eq!(v.profit_pct, None);
}

#[test]
fn free_acquisitions_have_no_profit_percentage() {
    let v = value_holding(&holding("OGN-001", 3, 0.0), 2.0);
    assert_eq!(v.profit, 6.0);
    assert_eq!(v.profit_pct, None);
}

#[test]
fn portfolio_totals_cover_priced_holdings_only() {
    let holdings = vec![
        holding("A", 2, 5.0),
        holding("B", 1, 20.0),
        holding("C", 10, 1.0),
    ];
    let valuation = value_portfolio(&holdings, |id| match id {
        "A" => Some(8.0),
        "B" => Some(15.0),
        _ => None,
    });
    assert_eq!(valuation.lines.len(), 2);
    assert_eq!(valuation.unpriced, vec!["C".to_string()]);
    assert_eq!(valuation.total_value, 31.0);
    assert_eq!(valuation.total_cost, 30.0);
    assert_eq!(valuation.total_profit, 1.0);
}

#[test]
fn empty_portfolio_values_to_zero() {
    let valuation = value_portfolio(&[], |_| Some(1.0));
    assert!(valuation.lines.is_empty());
    assert_eq!(valuation.total_value, 0.0);
}

#[test]
fn holdings_reject_negative_or_non_finite_prices() {
    assert!(matches!(
        Holding::new("u", "A", 1, -0.5),
        Err(MarketError::InvalidArgument(_))
    ));
    assert!(matches!(
        Holding::new("u", "A", 1, f64::NAN),
        Err(MarketError::InvalidArgument(_))
    ));
    assert!(matches!(
        Holding::new("u", " ", 1, 1.0),
        Err(MarketError::InvalidArgument(_))
    ));
}
