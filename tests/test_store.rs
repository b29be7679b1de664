//! DuckDB store integration tests: raw SQL, ingestion, boundary validation
//! and portfolio persistence.

mod common;

use common::{card, obs, obs_with_trend, setup_sample_store, ts};
use riftbound_market::models::{Holding, UserSession};
use riftbound_market::{DuckDbStore, PriceStore, TrendWindow};

// ---------------------------------------------------------------------------
// execute
// ---------------------------------------------------------------------------

#[test]
fn execute_returns_correct_rows() {
    let store = setup_sample_store();

    let rows = store
        .execute("SELECT * FROM cards ORDER BY card_id", &[])
        .unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0]["card_id"], "OGN-001");
    assert_eq!(rows[1]["card_id"], "OGN-001S");
    assert_eq!(rows[1]["is_showcase"], true);
}

#[test]
fn execute_with_params() {
    let store = setup_sample_store();

    let rows = store
        .execute(
            "SELECT * FROM card_prices WHERE card_id = ?",
            &["OGN-001".to_string()],
        )
        .unwrap();
    assert_eq!(rows.len(), 5);
}

#[test]
fn execute_aggregates_come_back_as_numbers() {
    let store = setup_sample_store();

    let rows = store
        .execute("SELECT COUNT(*) AS n FROM card_prices", &[])
        .unwrap();
    assert_eq!(rows[0]["n"].as_i64().unwrap(), 11);
}

#[test]
fn execute_returns_no_rows_for_unknown_ids() {
    let store = setup_sample_store();

    let rows = store
        .execute(
            "SELECT card_id FROM cards WHERE card_id = ?",
            &["nonexistent".to_string()],
        )
        .unwrap();
    assert!(rows.is_empty());
}

// ---------------------------------------------------------------------------
// cards / history / recent
// ---------------------------------------------------------------------------

#[test]
fn cards_are_typed_and_ordered_by_name() {
    let store = setup_sample_store();

    let cards = store.cards().unwrap();
    assert_eq!(cards.len(), 5);
    assert_eq!(cards[0].name, "Ahri, Alluring");
    assert_eq!(cards[0].cost, Some(3));
}

#[test]
fn missing_showcase_flag_defaults_to_false() {
    let store = DuckDbStore::open_in_memory().unwrap();
    store
        .raw()
        .execute_batch("INSERT INTO cards (card_id, name, set_code) VALUES ('X-1', 'Teemo', 'OGN')")
        .unwrap();

    let cards = store.cards().unwrap();
    assert_eq!(cards.len(), 1);
    assert!(!cards[0].is_showcase);
    assert_eq!(cards[0].rarity, None);
}

#[test]
fn history_is_ascending_and_contains_all_markets() {
    let store = setup_sample_store();

    let history = store.card_history("OGN-001").unwrap();
    assert_eq!(history.len(), 5);
    assert!(history.windows(2).all(|w| w[0].recorded_at <= w[1].recorded_at));
    assert!(history.iter().any(|o| o.market == "CN"));
}

#[test]
fn history_of_unknown_card_is_empty() {
    let store = setup_sample_store();
    assert!(store.card_history("nonexistent").unwrap().is_empty());
}

#[test]
fn recent_prices_are_newest_first_and_limited() {
    let store = setup_sample_store();

    let recent = store.recent_prices(3).unwrap();
    assert_eq!(recent.len(), 3);
    assert_eq!(recent[0].recorded_at, ts(3));
    assert_eq!(recent[1].recorded_at, ts(3));
    assert_eq!(recent[2].recorded_at, ts(2));

    let all = store.recent_prices(1000).unwrap();
    assert_eq!(all.len(), 11);
    assert!(all.windows(2).all(|w| w[0].recorded_at >= w[1].recorded_at));
}

#[test]
fn invalid_price_rows_are_skipped() {
    let store = setup_sample_store();
    store
        .raw()
        .execute_batch(
            "INSERT INTO card_prices VALUES ('OGN-002', 'EN', 'not a date', 1.0, NULL);
             INSERT INTO card_prices VALUES ('OGN-002', 'EN', '2025-01-04', -2.0, NULL);
             INSERT INTO card_prices VALUES ('OGN-002', 'en', '2025-01-05 08:30:00', 4.0, NULL);",
        )
        .unwrap();

    let history = store.card_history("OGN-002").unwrap();
    assert_eq!(history.len(), 3);
    let last = history.last().unwrap();
    assert_eq!(last.market, "EN");
    assert_eq!(last.price_low, 4.0);
}

// ---------------------------------------------------------------------------
// record_observation
// ---------------------------------------------------------------------------

#[test]
fn record_observation_derives_trend_when_missing() {
    let store = setup_sample_store();

    // OGN-002 EN holds 20.0 and 16.0
    let stored = store.record_observation(&obs("OGN-002", "en", 3, 15.0)).unwrap();
    assert_eq!(stored.market, "EN");
    assert_eq!(stored.price_trend, Some(17.0));

    let history = store.card_history("OGN-002").unwrap();
    let trends: Vec<Option<f64>> = history.iter().map(|o| o.price_trend).collect();
    assert_eq!(trends, vec![Some(20.0), Some(18.0), Some(17.0)]);
}

#[test]
fn record_observation_keeps_a_supplied_trend() {
    let store = setup_sample_store();
    let stored = store
        .record_observation(&obs_with_trend("OGN-002", "EN", 3, 15.0, 99.0))
        .unwrap();
    assert_eq!(stored.price_trend, Some(99.0));
}

#[test]
fn record_observation_uses_the_configured_window() {
    let store = DuckDbStore::open_in_memory()
        .unwrap()
        .with_trend_window(TrendWindow::Observations(2))
        .unwrap();
    for (day, price) in [(1, 10.0), (2, 20.0), (3, 40.0)] {
        store.record_observation(&obs("C", "EN", day, price)).unwrap();
    }
    let last = store.card_history("C").unwrap().pop().unwrap();
    assert_eq!(last.price_trend, Some(30.0));
}

#[test]
fn record_observation_with_huge_day_window() {
    let store = DuckDbStore::open_in_memory()
        .unwrap()
        .with_trend_window(TrendWindow::Days(1_000_000_000))
        .unwrap();
    for (day, price) in [(1, 10.0), (2, 20.0)] {
        store.record_observation(&obs("C", "EN", day, price)).unwrap();
    }
    let last = store.card_history("C").unwrap().pop().unwrap();
    assert_eq!(last.price_trend, Some(15.0));
}

#[test]
fn record_observation_rejects_negative_prices() {
    let store = DuckDbStore::open_in_memory().unwrap();
    assert!(store.record_observation(&obs("C", "EN", 1, -1.0)).is_err());
}

#[test]
fn insert_card_replaces_existing_row() {
    let store = setup_sample_store();
    let mut updated = card("OGN-002", "Annie, Fiery", "OGN", false);
    updated.rarity = Some("Epic".to_string());
    store.insert_card(&updated).unwrap();

    let cards = store.cards().unwrap();
    assert_eq!(cards.len(), 5);
    let annie = cards.iter().find(|c| c.card_id == "OGN-002").unwrap();
    assert_eq!(annie.rarity.as_deref(), Some("Epic"));
}

// ---------------------------------------------------------------------------
// Portfolio persistence
// ---------------------------------------------------------------------------

#[test]
fn upsert_replaces_instead_of_accumulating() {
    let store = setup_sample_store();
    let session = UserSession::new("user-1", "one@example.com");

    store
        .upsert_holding(&session, &Holding::new("user-1", "OGN-001", 3, 5.0).unwrap())
        .unwrap();
    store
        .upsert_holding(&session, &Holding::new("user-1", "OGN-001", 5, 6.5).unwrap())
        .unwrap();

    let holdings = store.holdings(&session).unwrap();
    assert_eq!(holdings.len(), 1);
    assert_eq!(holdings[0].quantity, 5);
    assert_eq!(holdings[0].purchase_price, 6.5);
}

#[test]
fn holdings_are_partitioned_by_user() {
    let store = setup_sample_store();
    let alice = UserSession::new("alice", "alice@example.com");
    let bob = UserSession::new("bob", "bob@example.com");

    store
        .upsert_holding(&alice, &Holding::new("alice", "OGN-001", 1, 1.0).unwrap())
        .unwrap();
    store
        .upsert_holding(&bob, &Holding::new("bob", "OGN-001", 7, 2.0).unwrap())
        .unwrap();

    assert_eq!(store.holdings(&alice).unwrap()[0].quantity, 1);
    assert_eq!(store.holdings(&bob).unwrap()[0].quantity, 7);
}

#[test]
fn upsert_rejects_holdings_of_another_user() {
    let store = setup_sample_store();
    let session = UserSession::new("alice", "alice@example.com");
    let result = store.upsert_holding(&session, &Holding::new("bob", "OGN-001", 1, 1.0).unwrap());
    assert!(result.is_err());
    assert!(store.holdings(&session).unwrap().is_empty());
}

#[test]
fn delete_holding_removes_only_that_card() {
    let store = setup_sample_store();
    let session = UserSession::new("user-1", "one@example.com");
    for id in ["OGN-001", "OGN-002"] {
        store
            .upsert_holding(&session, &Holding::new("user-1", id, 1, 1.0).unwrap())
            .unwrap();
    }

    store.delete_holding(&session, "OGN-001").unwrap();
    store.delete_holding(&session, "nonexistent").unwrap();

    let holdings = store.holdings(&session).unwrap();
    assert_eq!(holdings.len(), 1);
    assert_eq!(holdings[0].card_id, "OGN-002");
}

// ---------------------------------------------------------------------------
// File-backed database
// ---------------------------------------------------------------------------

#[test]
fn file_database_persists_between_opens() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = tmp_dir.path().join("nested").join("market.duckdb");

    {
        let store = DuckDbStore::open(&path).unwrap();
        store.insert_card(&card("OGN-001", "Jinx, Rebel", "OGN", false)).unwrap();
        store.record_observation(&obs("OGN-001", "EN", 1, 4.0)).unwrap();
    }

    let store = DuckDbStore::open(&path).unwrap();
    assert_eq!(store.cards().unwrap().len(), 1);
    assert_eq!(store.card_history("OGN-001").unwrap().len(), 1);
}
