use super::tiers::{self, Tier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

pub const DEFAULT_HISTORY_CAPACITY: usize = 50;
pub const MAX_MULTIPULL: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EconomyError {
    #[error("not enough currency (requires {needed}, have {available})")]
    InsufficientFunds { needed: u64, available: u64 },
}

/// Odds modifiers bought in the shop.
///
/// `guaranteed` and `multipull` are one-shot: they are taken out by the pull
/// that uses them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveBoosts {
    #[serde(default)]
    pub bonuses: BTreeMap<String, f64>,
    #[serde(default)]
    pub guaranteed: Option<String>,
    #[serde(default)]
    pub multipull: Option<u32>,
}

impl ActiveBoosts {
    pub fn bonus_for(&self, tier_key: &str) -> f64 {
        self.bonuses.get(tier_key).copied().unwrap_or(0.0)
    }

    pub fn take_guaranteed(&mut self) -> Option<String> {
        self.guaranteed.take()
    }

    pub fn take_multipull(&mut self) -> Option<u32> {
        self.multipull.take()
    }

    pub fn is_empty(&self) -> bool {
        self.bonuses.is_empty() && self.guaranteed.is_none() && self.multipull.is_none()
    }

    pub fn sanitize(&mut self) {
        self.bonuses
            .retain(|key, bonus| tiers::is_known_tier(key) && bonus.is_finite() && *bonus >= 0.0);
        if let Some(key) = &self.guaranteed {
            if !tiers::is_known_tier(key) {
                self.guaranteed = None;
            }
        }
        self.multipull = self
            .multipull
            .filter(|count| (1..=MAX_MULTIPULL).contains(count));
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomyState {
    pub currency: u64,
    pub currency_multiplier: f64,
    pub history_capacity: usize,
    pub has_tag_mastery: bool,
}

impl Default for EconomyState {
    fn default() -> Self {
        Self {
            currency: 0,
            currency_multiplier: 1.0,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            has_tag_mastery: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Economy {
    pub state: EconomyState,
    pub boosts: ActiveBoosts,
}

impl Economy {
    pub fn new(state: EconomyState, boosts: ActiveBoosts) -> Self {
        Self { state, boosts }
    }

    pub fn currency(&self) -> u64 {
        self.state.currency
    }

    pub fn credit(&mut self, amount: u64) {
        self.state.currency = self.state.currency.saturating_add(amount);
    }

    pub fn can_afford(&self, amount: u64) -> bool {
        self.state.currency >= amount
    }

    pub fn debit(&mut self, amount: u64) -> Result<(), EconomyError> {
        if !self.can_afford(amount) {
            return Err(EconomyError::InsufficientFunds {
                needed: amount,
                available: self.state.currency,
            });
        }
        self.state.currency -= amount;
        Ok(())
    }

    pub fn apply_boost(&mut self, tier_key: &str, amount: f64) {
        *self.boosts.bonuses.entry(tier_key.to_string()).or_insert(0.0) += amount;
    }

    pub fn set_guaranteed(&mut self, tier_key: &str) {
        self.boosts.guaranteed = Some(tier_key.to_string());
    }

    pub fn set_multipull(&mut self, count: u32) {
        self.boosts.multipull = Some(count.clamp(1, MAX_MULTIPULL));
    }

    pub fn increase_currency_multiplier(&mut self, pct: f64) {
        self.state.currency_multiplier += pct / 100.0;
    }

    pub fn set_history_capacity(&mut self, capacity: usize) {
        self.state.history_capacity = capacity.max(1);
    }

    pub fn set_tag_mastery(&mut self) {
        self.state.has_tag_mastery = true;
    }

    pub fn reward_for(&self, tier: &Tier) -> u64 {
        coin_reward(tier, self.state.currency_multiplier)
    }

    pub fn sanitize(&mut self) {
        if !self.state.currency_multiplier.is_finite() || self.state.currency_multiplier < 1.0 {
            self.state.currency_multiplier = 1.0;
        }
        if self.state.history_capacity == 0 {
            self.state.history_capacity = DEFAULT_HISTORY_CAPACITY;
        }
        self.boosts.sanitize();
    }
}

pub fn coin_reward(tier: &Tier, multiplier: f64) -> u64 {
    (tier.value as f64 * multiplier).floor() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gacha::tiers::TIERS;

    #[test]
    fn debit_rejects_overdraw_without_change() {
        let mut economy = Economy::default();
        economy.credit(50);
        assert_eq!(
            economy.debit(100),
            Err(EconomyError::InsufficientFunds {
                needed: 100,
                available: 50
            })
        );
        assert_eq!(economy.currency(), 50);
        economy.debit(50).expect("exact balance should be spendable");
        assert_eq!(economy.currency(), 0);
    }

    #[test]
    fn boosts_accumulate_and_one_shots_overwrite() {
        let mut economy = Economy::default();
        economy.apply_boost("rare", 5.0);
        economy.apply_boost("rare", 5.0);
        economy.set_guaranteed("rare");
        economy.set_guaranteed("epic");
        economy.set_multipull(3);
        economy.set_multipull(5);
        assert_eq!(economy.boosts.bonus_for("rare"), 10.0);
        assert_eq!(economy.boosts.bonus_for("common"), 0.0);
        assert_eq!(economy.boosts.guaranteed.as_deref(), Some("epic"));
        assert_eq!(economy.boosts.take_multipull(), Some(5));
        assert_eq!(economy.boosts.multipull, None);
    }

    #[test]
    fn multiplier_accumulates_and_floors_rewards() {
        let mut economy = Economy::default();
        economy.increase_currency_multiplier(25.0);
        economy.increase_currency_multiplier(50.0);
        assert!((economy.state.currency_multiplier - 1.75).abs() < f64::EPSILON);
        // 5 * 1.75 = 8.75
        assert_eq!(economy.reward_for(&TIERS[1]), 8);
        assert_eq!(economy.reward_for(&TIERS[3]), 175);
    }

    #[test]
    fn capacity_overwrites_and_mastery_is_one_way() {
        let mut economy = Economy::default();
        economy.set_history_capacity(100);
        economy.set_history_capacity(75);
        assert_eq!(economy.state.history_capacity, 75);
        economy.set_tag_mastery();
        economy.set_tag_mastery();
        assert!(economy.state.has_tag_mastery);
    }

    #[test]
    fn sanitize_repairs_loaded_values() {
        let mut economy = Economy::default();
        economy.state.currency_multiplier = 0.2;
        economy.state.history_capacity = 0;
        economy.boosts.bonuses.insert("mythic".to_string(), 4.0);
        economy.boosts.bonuses.insert("rare".to_string(), 4.0);
        economy.boosts.guaranteed = Some("mythic".to_string());
        economy.boosts.multipull = Some(0);
        economy.sanitize();
        assert_eq!(economy.state.currency_multiplier, 1.0);
        assert_eq!(economy.state.history_capacity, DEFAULT_HISTORY_CAPACITY);
        assert_eq!(economy.boosts.bonuses.len(), 1);
        assert!(economy.boosts.guaranteed.is_none());
        assert!(economy.boosts.multipull.is_none());

        economy.boosts.multipull = Some(4_000_000_000);
        economy.sanitize();
        assert!(economy.boosts.multipull.is_none());
        economy.boosts.multipull = Some(MAX_MULTIPULL);
        economy.sanitize();
        assert_eq!(economy.boosts.multipull, Some(MAX_MULTIPULL));
    }

    #[test]
    fn multipull_is_capped_when_set() {
        let mut economy = Economy::default();
        economy.set_multipull(1_000);
        assert_eq!(economy.boosts.multipull, Some(MAX_MULTIPULL));
        economy.set_multipull(0);
        assert_eq!(economy.boosts.multipull, Some(1));
    }
}
