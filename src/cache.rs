//! Short-lived cache of reference data fetched from the store.
//!
//! Holds the card catalogue and the recent-price snapshot used for market
//! movers. Entries expire after their TTL and are dropped wholesale by
//! [`ReferenceCache::invalidate`]. Nothing keeps the cache coherent with
//! concurrent writers: rows appended by the scraper show up only after expiry
//! or an explicit invalidation.

use std::time::{Duration, Instant};

use crate::config;
use crate::models::{Card, PriceObservation};

struct Entry<T> {
    data: T,
    fetched_at: Instant,
}

impl<T> Entry<T> {
    fn new(data: T) -> Self {
        Self {
            data,
            fetched_at: Instant::now(),
        }
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// TTL cache for the card catalogue and the recent-price snapshot.
pub struct ReferenceCache {
    cards: Option<Entry<Vec<Card>>>,
    recent: Option<Entry<Vec<PriceObservation>>>,
    /// Lifetime of the card catalogue.
    pub cards_ttl: Duration,
    /// Lifetime of the recent-price snapshot.
    pub recent_ttl: Duration,
}

impl Default for ReferenceCache {
    fn default() -> Self {
        Self::new(config::CARDS_TTL, config::RECENT_PRICES_TTL)
    }
}

impl ReferenceCache {
    pub fn new(cards_ttl: Duration, recent_ttl: Duration) -> Self {
        Self {
            cards: None,
            recent: None,
            cards_ttl,
            recent_ttl,
        }
    }

    /// Cached catalogue, if present and not expired.
    pub fn cards(&self) -> Option<&[Card]> {
        self.cards
            .as_ref()
            .filter(|e| e.is_fresh(self.cards_ttl))
            .map(|e| e.data.as_slice())
    }

    pub fn put_cards(&mut self, cards: Vec<Card>) {
        self.cards = Some(Entry::new(cards));
    }

    /// Cached recent-price snapshot, if present and not expired.
    pub fn recent_prices(&self) -> Option<&[PriceObservation]> {
        self.recent
            .as_ref()
            .filter(|e| e.is_fresh(self.recent_ttl))
            .map(|e| e.data.as_slice())
    }

    pub fn put_recent_prices(&mut self, prices: Vec<PriceObservation>) {
        self.recent = Some(Entry::new(prices));
    }

    /// Drop every cached entry.
    pub fn invalidate(&mut self) {
        self.cards = None;
        self.recent = None;
    }

    /// True when nothing fresh is cached.
    pub fn is_empty(&self) -> bool {
        self.cards().is_none() && self.recent_prices().is_none()
    }
}
