//! Shared test fixtures for the market SDK integration tests.
//!
//! Provides `setup_sample_store()`, an in-memory DuckDB store seeded with a
//! handful of cards and price observations in the EN and CN markets, and
//! `setup_sample_sdk()` which wraps it in a `MarketSdk`.
//!
//! Seeded prices (EN unless noted):
//! - OGN-001  10.0, 10.0, 12.0 (stored trend 10.0 on the last row); CN 8.0, 9.0
//! - OGN-002  20.0, 16.0 (trend derived on insert)
//! - OGN-001S 30.0 (single observation)
//! - SFD-010  0.0, 5.0 (previous price zero)
//! - OGN-050  3.0 with a stored trend of 0.0

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use riftbound_market::models::{Card, PriceObservation};
use riftbound_market::{DuckDbStore, MarketSdk};

pub fn ts(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, day, 10, 0, 0).unwrap()
}

pub fn obs(card_id: &str, market: &str, day: u32, price: f64) -> PriceObservation {
    PriceObservation {
        card_id: card_id.to_string(),
        market: market.to_string(),
        recorded_at: ts(day),
        price_low: price,
        price_trend: None,
    }
}

pub fn obs_with_trend(card_id: &str, market: &str, day: u32, price: f64, trend: f64) -> PriceObservation {
    PriceObservation {
        price_trend: Some(trend),
        ..obs(card_id, market, day, price)
    }
}

pub fn card(card_id: &str, name: &str, set_code: &str, is_showcase: bool) -> Card {
    Card {
        card_id: card_id.to_string(),
        name: name.to_string(),
        is_showcase,
        set_code: set_code.to_string(),
        rarity: Some("Rare".to_string()),
        domain: Some("Chaos".to_string()),
        cost: Some(3),
        ability: None,
        image_url: Some(format!("https://img.example/{}.png", card_id)),
    }
}

pub fn setup_sample_store() -> DuckDbStore {
    let store = DuckDbStore::open_in_memory().unwrap();

    // -- cards ------------------------------------------------------------------
    for c in [
        card("OGN-001", "Jinx, Rebel", "OGN", false),
        card("OGN-001S", "Jinx, Rebel", "OGN", true),
        card("OGN-002", "Annie, Fiery", "OGN", false),
        card("OGN-050", "Poro Snax", "OGN", false),
        card("SFD-010", "Ahri, Alluring", "SFD", false),
    ] {
        store.insert_card(&c).unwrap();
    }

    // -- card_prices ------------------------------------------------------------
    for o in [
        obs_with_trend("OGN-001", "EN", 1, 10.0, 10.0),
        obs_with_trend("OGN-001", "EN", 2, 10.0, 10.0),
        obs_with_trend("OGN-001", "EN", 3, 12.0, 10.0),
        obs("OGN-001", "CN", 1, 8.0),
        obs("OGN-001", "CN", 2, 9.0),
        obs("OGN-002", "EN", 1, 20.0),
        obs("OGN-002", "EN", 2, 16.0),
        obs("OGN-001S", "EN", 3, 30.0),
        obs("SFD-010", "EN", 1, 0.0),
        obs("SFD-010", "EN", 2, 5.0),
        obs_with_trend("OGN-050", "EN", 2, 3.0, 0.0),
    ] {
        store.record_observation(&o).unwrap();
    }

    store
}

pub fn setup_sample_sdk() -> MarketSdk {
    MarketSdk::builder()
        .store(setup_sample_store())
        .build()
        .unwrap()
}
