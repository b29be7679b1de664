//! Movers ranker tests over hand-built observation sets.

mod common;

use common::obs;
use riftbound_market::analytics::movers::{compute_movers, rank_movers};
use riftbound_market::models::PriceObservation;

fn id_name(card_id: &str) -> String {
    format!("name-{}", card_id)
}

fn ids(movers: &[riftbound_market::models::MarketMover]) -> Vec<&str> {
    movers.iter().map(|m| m.card_id.as_str()).collect()
}

#[test]
fn change_is_computed_from_the_two_newest_observations() {
    let data = vec![
        obs("X", "EN", 1, 50.0),
        obs("X", "EN", 3, 12.0),
        obs("X", "EN", 2, 10.0),
    ];
    let movers = compute_movers(&data, "EN", id_name);
    assert_eq!(movers.len(), 1);
    assert_eq!(movers[0].pct_change, 20.0);
    assert_eq!(movers[0].latest_price, 12.0);
    assert_eq!(movers[0].name, "name-X");
}

#[test]
fn change_is_rounded_to_two_decimals() {
    let data = vec![obs("X", "EN", 1, 3.0), obs("X", "EN", 2, 4.0)];
    let movers = compute_movers(&data, "EN", id_name);
    assert_eq!(movers[0].pct_change, 33.33);
}

#[test]
fn single_observation_cards_are_excluded() {
    let data = vec![obs("Y", "EN", 1, 10.0), obs("X", "EN", 1, 10.0), obs("X", "EN", 2, 11.0)];
    let movers = compute_movers(&data, "EN", id_name);
    assert_eq!(ids(&movers), vec!["X"]);
}

#[test]
fn non_positive_previous_price_is_excluded() {
    let data = vec![
        obs("Z", "EN", 1, 0.0),
        obs("Z", "EN", 2, 5.0),
        obs("X", "EN", 1, 5.0),
        obs("X", "EN", 2, 0.0),
    ];
    let movers = compute_movers(&data, "EN", id_name);
    // X falls to zero but its previous price was positive
    assert_eq!(ids(&movers), vec!["X"]);
    assert_eq!(movers[0].pct_change, -100.0);
}

#[test]
fn other_markets_are_ignored() {
    let data = vec![
        obs("X", "CN", 1, 1.0),
        obs("X", "CN", 2, 2.0),
        obs("X", "EN", 2, 2.0),
    ];
    assert!(compute_movers(&data, "EN", id_name).is_empty());
    assert_eq!(compute_movers(&data, "cn", id_name).len(), 1);
}

#[test]
fn no_eligible_cards_gives_empty_lists() {
    let data: Vec<PriceObservation> = vec![obs("X", "EN", 1, 1.0)];
    let report = rank_movers("EN", compute_movers(&data, "EN", id_name), 5);
    assert!(report.is_empty());
    assert_eq!(report.market, "EN");
}

#[test]
fn gainers_and_losers_are_ranked_and_truncated() {
    let mut data = Vec::new();
    for (id, prev, curr) in [
        ("A", 10.0, 15.0), // +50
        ("B", 10.0, 9.0),  // -10
        ("C", 10.0, 12.0), // +20
        ("D", 10.0, 5.0),  // -50
        ("E", 10.0, 10.0), // 0
    ] {
        data.push(obs(id, "EN", 1, prev));
        data.push(obs(id, "EN", 2, curr));
    }
    let report = rank_movers("EN", compute_movers(&data, "EN", id_name), 3);
    assert_eq!(ids(&report.gainers), vec!["A", "C", "E"]);
    assert_eq!(ids(&report.losers), vec!["D", "B", "E"]);
}

#[test]
fn ties_break_by_card_id() {
    let mut data = Vec::new();
    for id in ["M", "B", "K"] {
        data.push(obs(id, "EN", 1, 10.0));
        data.push(obs(id, "EN", 2, 11.0));
    }
    let report = rank_movers("EN", compute_movers(&data, "EN", id_name), 5);
    assert_eq!(ids(&report.gainers), vec!["B", "K", "M"]);
    assert_eq!(ids(&report.losers), vec!["B", "K", "M"]);
}

#[test]
fn second_newest_price_is_never_non_positive_in_output() {
    let mut data = Vec::new();
    for (i, prev) in [-3.0, 0.0, 0.01, 2.0, 7.5].iter().enumerate() {
        let id = format!("C{}", i);
        data.push(obs(&id, "EN", 1, 100.0));
        data.push(obs(&id, "EN", 2, *prev));
        data.push(obs(&id, "EN", 3, 4.0));
    }
    let movers = compute_movers(&data, "EN", id_name);
    assert_eq!(ids(&movers), vec!["C2", "C3", "C4"]);
}
