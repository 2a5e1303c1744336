#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tier {
    pub key: &'static str,
    pub label: &'static str,
    pub weight: f64,
    pub color: &'static str,
    pub value: u64,
}

pub static TIERS: [Tier; 4] = [
    Tier {
        key: "common",
        label: "Common",
        weight: 70.0,
        color: "#6b7280",
        value: 1,
    },
    Tier {
        key: "rare",
        label: "Rare",
        weight: 24.0,
        color: "#3b82f6",
        value: 5,
    },
    Tier {
        key: "epic",
        label: "Epic",
        weight: 5.0,
        color: "#8b5cf6",
        value: 15,
    },
    Tier {
        key: "legendary",
        label: "Legendary",
        weight: 1.0,
        color: "#f59e0b",
        value: 100,
    },
];

pub fn tier_by_key(key: &str) -> Option<&'static Tier> {
    TIERS.iter().find(|tier| tier.key == key)
}

pub fn tier_index(tiers: &[Tier], key: &str) -> Option<usize> {
    tiers.iter().position(|tier| tier.key == key)
}

pub fn is_known_tier(key: &str) -> bool {
    tier_by_key(key).is_some()
}
