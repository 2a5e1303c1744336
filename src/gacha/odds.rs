use super::economy::ActiveBoosts;
use super::tiers::{self, Tier};
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierOdds<'a> {
    pub tier: &'a Tier,
    pub weight: f64,
    pub percentage: f64,
}

pub fn effective_odds<'a>(tiers: &'a [Tier], boosts: &ActiveBoosts) -> Vec<TierOdds<'a>> {
    let guaranteed_index = boosts
        .guaranteed
        .as_deref()
        .and_then(|key| tiers::tier_index(tiers, key));

    let weights: Vec<f64> = match guaranteed_index {
        Some(index) => {
            let share = 100.0 / (tiers.len() - index) as f64;
            (0..tiers.len())
                .map(|i| if i < index { 0.0 } else { share })
                .collect()
        }
        None => tiers
            .iter()
            .map(|tier| tier.weight + boosts.bonus_for(tier.key))
            .collect(),
    };

    let total: f64 = weights.iter().sum();
    tiers
        .iter()
        .zip(weights)
        .map(|(tier, weight)| TierOdds {
            tier,
            weight,
            percentage: percentage_of(weight, total),
        })
        .collect()
}

pub fn odds_for_draw<'a>(tiers: &'a [Tier], boosts: &mut ActiveBoosts) -> Vec<TierOdds<'a>> {
    let odds = effective_odds(tiers, boosts);
    if boosts.take_guaranteed().is_some() {
        log::debug!("guaranteed tier consumed by draw");
    }
    odds
}

fn percentage_of(weight: f64, total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    (weight / total * 1000.0).round() / 10.0
}

pub fn draw<'a>(odds: &[TierOdds<'a>], rng: &mut impl Rng) -> &'a Tier {
    let total: f64 = odds.iter().map(|entry| entry.weight).sum();
    let mut remaining = rng.r#gen::<f64>() * total;
    for entry in odds.iter().filter(|entry| entry.weight > 0.0) {
        remaining -= entry.weight;
        if remaining <= 0.0 {
            return entry.tier;
        }
    }
    odds.iter()
        .rev()
        .find(|entry| entry.weight > 0.0)
        .or_else(|| odds.last())
        .map(|entry| entry.tier)
        .unwrap_or(&tiers::TIERS[tiers::TIERS.len() - 1])
}
