//! Top gainers and losers between the two newest observations of each card.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::models::{MarketMover, MoversReport, PriceObservation};

/// Percent change of every card in `market` with at least two observations.
///
/// Observations may arrive in any order. Cards whose previous price is zero
/// or negative have no defined change and are left out. `name_of` resolves a
/// card id to the name shown for it. The result is ordered by card id.
pub fn compute_movers<F>(
    observations: &[PriceObservation],
    market: &str,
    name_of: F,
) -> Vec<MarketMover>
where
    F: Fn(&str) -> String,
{
    let mut by_card: BTreeMap<&str, Vec<&PriceObservation>> = BTreeMap::new();
    for obs in observations.iter().filter(|o| o.is_in_market(market)) {
        by_card.entry(obs.card_id.as_str()).or_default().push(obs);
    }

    let mut movers = Vec::new();
    for (card_id, mut group) in by_card {
        if group.len() < 2 {
            continue;
        }
        group.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        let curr = group[0].price_low;
        let prev = group[1].price_low;
        if prev <= 0.0 {
            tracing::debug!(card_id, prev, "skipping mover with non-positive previous price");
            continue;
        }
        movers.push(MarketMover {
            card_id: card_id.to_string(),
            name: name_of(card_id),
            pct_change: round_to_cents((curr - prev) / prev * 100.0),
            latest_price: curr,
        });
    }
    movers
}

/// Split movers into the `limit` biggest gainers and losers.
///
/// Ties are broken by card id so the lists are deterministic.
pub fn rank_movers(market: &str, movers: Vec<MarketMover>, limit: usize) -> MoversReport {
    let mut gainers = movers.clone();
    gainers.sort_by(|a, b| by_pct(b, a).then_with(|| a.card_id.cmp(&b.card_id)));
    gainers.truncate(limit);

    let mut losers = movers;
    losers.sort_by(|a, b| by_pct(a, b).then_with(|| a.card_id.cmp(&b.card_id)));
    losers.truncate(limit);

    MoversReport {
        market: market.to_string(),
        gainers,
        losers,
    }
}

fn by_pct(a: &MarketMover, b: &MarketMover) -> Ordering {
    a.pct_change.total_cmp(&b.pct_change)
}

/// Two decimals, halves rounded away from zero (`0.125` becomes `0.13`).
fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
