use super::collection::History;
use super::economy::{Economy, EconomyError};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShopEffect {
    TierBonus(&'static [(&'static str, f64)]),
    Guaranteed(&'static str),
    Multipull(u32),
    CurrencyBonusPct(f64),
    Capacity(usize),
    Reroll,
    TagMastery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopCategory {
    Boost,
    Multipull,
    Currency,
    Utility,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShopItem {
    pub id: u32,
    pub name: &'static str,
    pub description: &'static str,
    pub price: u64,
    pub effect: ShopEffect,
    pub category: ShopCategory,
}

impl ShopItem {
    pub fn stays_available(&self) -> bool {
        self.effect == ShopEffect::Reroll || self.category == ShopCategory::Utility
    }
}

pub static SHOP_ITEMS: [ShopItem; 14] = [
    ShopItem {
        id: 1,
        name: "Common Boost",
        description: "+5% Common chance",
        price: 50,
        effect: ShopEffect::TierBonus(&[("common", 5.0)]),
        category: ShopCategory::Boost,
    },
    ShopItem {
        id: 2,
        name: "Rare Boost",
        description: "+5% Rare chance",
        price: 100,
        effect: ShopEffect::TierBonus(&[("rare", 5.0)]),
        category: ShopCategory::Boost,
    },
    ShopItem {
        id: 3,
        name: "Epic Boost",
        description: "+3% Epic chance",
        price: 250,
        effect: ShopEffect::TierBonus(&[("epic", 3.0)]),
        category: ShopCategory::Boost,
    },
    ShopItem {
        id: 4,
        name: "Legendary Boost",
        description: "+1% Legendary chance",
        price: 500,
        effect: ShopEffect::TierBonus(&[("legendary", 1.0)]),
        category: ShopCategory::Boost,
    },
    ShopItem {
        id: 5,
        name: "Lucky Pull",
        description: "Guaranteed Rare or better",
        price: 150,
        effect: ShopEffect::Guaranteed("rare"),
        category: ShopCategory::Boost,
    },
    ShopItem {
        id: 6,
        name: "Super Lucky Pull",
        description: "Guaranteed Epic or better",
        price: 300,
        effect: ShopEffect::Guaranteed("epic"),
        category: ShopCategory::Boost,
    },
    ShopItem {
        id: 7,
        name: "Ultra Lucky Pull",
        description: "Guaranteed Legendary",
        price: 750,
        effect: ShopEffect::Guaranteed("legendary"),
        category: ShopCategory::Boost,
    },
    ShopItem {
        id: 8,
        name: "Multi-Pull",
        description: "Pull 3 GIFs at once",
        price: 200,
        effect: ShopEffect::Multipull(3),
        category: ShopCategory::Multipull,
    },
    ShopItem {
        id: 9,
        name: "Mega Pull",
        description: "Pull 5 GIFs at once",
        price: 400,
        effect: ShopEffect::Multipull(5),
        category: ShopCategory::Multipull,
    },
    ShopItem {
        id: 10,
        name: "Currency Boost",
        description: "+25% currency from pulls",
        price: 300,
        effect: ShopEffect::CurrencyBonusPct(25.0),
        category: ShopCategory::Currency,
    },
    ShopItem {
        id: 11,
        name: "Super Currency Boost",
        description: "+50% currency from pulls",
        price: 600,
        effect: ShopEffect::CurrencyBonusPct(50.0),
        category: ShopCategory::Currency,
    },
    ShopItem {
        id: 12,
        name: "Reroll",
        description: "Reroll your last pull",
        price: 100,
        effect: ShopEffect::Reroll,
        category: ShopCategory::Utility,
    },
    ShopItem {
        id: 13,
        name: "Tag Mastery",
        description: "Unlock advanced tag filtering",
        price: 250,
        effect: ShopEffect::TagMastery,
        category: ShopCategory::Utility,
    },
    ShopItem {
        id: 14,
        name: "Collection Expansion",
        description: "Increase history capacity to 100",
        price: 350,
        effect: ShopEffect::Capacity(100),
        category: ShopCategory::Utility,
    },
];

pub fn item_by_id(id: u32) -> Option<&'static ShopItem> {
    SHOP_ITEMS.iter().find(|item| item.id == id)
}

pub fn default_item_ids() -> Vec<u32> {
    SHOP_ITEMS.iter().map(|item| item.id).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShopError {
    #[error("not enough currency (requires {needed}, have {available})")]
    InsufficientFunds { needed: u64, available: u64 },
    #[error("no pull to reroll")]
    NoHistoryToReroll,
    #[error("unknown shop item")]
    UnknownItem,
    #[error("{item} is no longer available")]
    SoldOut { item: &'static str },
}

impl From<EconomyError> for ShopError {
    fn from(err: EconomyError) -> Self {
        match err {
            EconomyError::InsufficientFunds { needed, available } => {
                ShopError::InsufficientFunds { needed, available }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub item: &'static ShopItem,
    pub rerolled: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shop {
    available: Vec<u32>,
}

impl Default for Shop {
    fn default() -> Self {
        Self {
            available: default_item_ids(),
        }
    }
}

impl Shop {
    pub fn from_ids(ids: Vec<u32>) -> Self {
        let mut available = Vec::with_capacity(ids.len());
        for id in ids {
            if item_by_id(id).is_some() && !available.contains(&id) {
                available.push(id);
            }
        }
        Self { available }
    }

    pub fn ids(&self) -> &[u32] {
        &self.available
    }

    pub fn items(&self) -> Vec<&'static ShopItem> {
        self.available.iter().filter_map(|id| item_by_id(*id)).collect()
    }

    pub fn is_available(&self, id: u32) -> bool {
        self.available.contains(&id)
    }

    pub fn purchase(
        &mut self,
        id: u32,
        economy: &mut Economy,
        history: &mut History,
    ) -> Result<Receipt, ShopError> {
        let item = item_by_id(id).ok_or(ShopError::UnknownItem)?;
        if !self.is_available(id) {
            return Err(ShopError::SoldOut { item: item.name });
        }

        let mut total = item.price;
        if item.effect == ShopEffect::Reroll {
            let last = history.latest().ok_or(ShopError::NoHistoryToReroll)?;
            total = total.saturating_add(last.coin_value);
        }
        if !economy.can_afford(total) {
            return Err(ShopError::InsufficientFunds {
                needed: total,
                available: economy.currency(),
            });
        }

        economy.debit(item.price)?;
        let mut rerolled = None;
        match item.effect {
            ShopEffect::Guaranteed(tier) => economy.set_guaranteed(tier),
            ShopEffect::Multipull(count) => economy.set_multipull(count),
            ShopEffect::CurrencyBonusPct(pct) => economy.increase_currency_multiplier(pct),
            ShopEffect::Capacity(capacity) => economy.set_history_capacity(capacity),
            ShopEffect::TagMastery => economy.set_tag_mastery(),
            ShopEffect::Reroll => {
                if let Some(last) = history.pop_latest() {
                    economy.debit(last.coin_value)?;
                    rerolled = Some(last.id);
                }
            }
            ShopEffect::TierBonus(bonuses) => {
                for (tier, amount) in bonuses {
                    economy.apply_boost(tier, *amount);
                }
            }
        }

        if !item.stays_available() {
            self.available.retain(|available| *available != id);
        }
        log::info!("purchased {} for {total}", item.name);
        Ok(Receipt { item, rerolled })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gacha::pull::PullRecord;

    fn record(id: u64, coin_value: u64) -> PullRecord {
        PullRecord {
            id,
            identity: format!("gif-{id}"),
            tier_key: "epic".to_string(),
            tier_label: "Epic".to_string(),
            tier_color: "#8b5cf6".to_string(),
            source: "GIF".to_string(),
            tags: Vec::new(),
            coin_value,
            timestamp: 0,
            is_favorite: false,
        }
    }

    fn funded(amount: u64) -> Economy {
        let mut economy = Economy::default();
        economy.credit(amount);
        economy
    }

    #[test]
    fn insufficient_funds_changes_nothing() {
        let mut shop = Shop::default();
        let mut economy = funded(50);
        let mut history = History::default();
        let result = shop.purchase(2, &mut economy, &mut history);
        assert_eq!(
            result,
            Err(ShopError::InsufficientFunds {
                needed: 100,
                available: 50
            })
        );
        assert_eq!(economy.currency(), 50);
        assert!(economy.boosts.is_empty());
        assert!(shop.is_available(2));
    }

    #[test]
    fn boost_purchase_applies_and_leaves_shelf() {
        let mut shop = Shop::default();
        let mut economy = funded(1_000);
        let mut history = History::default();
        shop.purchase(2, &mut economy, &mut history)
            .expect("rare boost should be purchasable");
        assert_eq!(economy.currency(), 900);
        assert_eq!(economy.boosts.bonus_for("rare"), 5.0);
        assert!(!shop.is_available(2));
        assert!(matches!(
            shop.purchase(2, &mut economy, &mut history),
            Err(ShopError::SoldOut { .. })
        ));
    }

    #[test]
    fn one_shot_and_currency_items_are_removed_utilities_stay() {
        let mut shop = Shop::default();
        let mut economy = funded(10_000);
        let mut history = History::default();
        for id in [6, 8, 10, 13, 14] {
            shop.purchase(id, &mut economy, &mut history)
                .expect("purchase should succeed");
        }
        assert_eq!(economy.boosts.guaranteed.as_deref(), Some("epic"));
        assert_eq!(economy.boosts.multipull, Some(3));
        assert!((economy.state.currency_multiplier - 1.25).abs() < f64::EPSILON);
        assert!(economy.state.has_tag_mastery);
        assert_eq!(economy.state.history_capacity, 100);
        for id in [6, 8, 10] {
            assert!(!shop.is_available(id));
        }
        for id in [12, 13, 14] {
            assert!(shop.is_available(id));
        }
        shop.purchase(13, &mut economy, &mut history)
            .expect("utility items can be bought again");
    }

    #[test]
    fn reroll_reverses_reward_and_drops_latest() {
        let mut shop = Shop::default();
        let mut economy = funded(200);
        let mut history = History::default();
        history.push_batch(&[record(1, 5), record(2, 15)], 50);

        let receipt = shop
            .purchase(12, &mut economy, &mut history)
            .expect("reroll should succeed");
        assert_eq!(receipt.rerolled, Some(2));
        assert_eq!(economy.currency(), 85);
        assert_eq!(history.latest().map(|r| r.id), Some(1));
        assert!(shop.is_available(12));
    }

    #[test]
    fn reroll_requires_history_and_full_cost() {
        let mut shop = Shop::default();
        let mut economy = funded(500);
        let mut history = History::default();
        assert_eq!(
            shop.purchase(12, &mut economy, &mut history),
            Err(ShopError::NoHistoryToReroll)
        );
        assert_eq!(economy.currency(), 500);

        let mut poor = funded(110);
        history.push_batch(&[record(1, 15)], 50);
        assert!(matches!(
            shop.purchase(12, &mut poor, &mut history),
            Err(ShopError::InsufficientFunds { needed: 115, .. })
        ));
        assert_eq!(poor.currency(), 110);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn from_ids_filters_unknown_and_duplicates() {
        let shop = Shop::from_ids(vec![3, 99, 3, 12]);
        assert_eq!(shop.ids(), &[3, 12]);
        assert_eq!(shop.items().len(), 2);
    }
}
