use super::catalog::ArtifactCatalog;
use super::economy::Economy;
use super::tiers::{self, Tier};
use crate::media::Artifact;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const FALLBACK_TAGS: [&str; 8] = [
    "funny", "cats", "dogs", "reaction", "meme", "anime", "cartoon", "game",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PullError {
    #[error("a pull is already in progress")]
    ConcurrentPullRejected,
    #[error("failed to fetch a new artifact")]
    FetchExhausted,
    #[error("pull abandoned after a reset")]
    Abandoned,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRecord {
    pub id: u64,
    pub identity: String,
    pub tier_key: String,
    pub tier_label: String,
    pub tier_color: String,
    pub source: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub coin_value: u64,
    pub timestamp: i64,
    #[serde(default)]
    pub is_favorite: bool,
}

impl PullRecord {
    pub fn new(id: u64, artifact: Artifact, tier: &Tier, coin_value: u64, timestamp: i64) -> Self {
        Self {
            id,
            identity: artifact.identity,
            tier_key: tier.key.to_string(),
            tier_label: tier.label.to_string(),
            tier_color: tier.color.to_string(),
            source: artifact.source,
            tags: artifact.tags,
            coin_value,
            timestamp,
            is_favorite: false,
        }
    }
}

pub fn reconcile_tier(
    catalog: &mut ArtifactCatalog,
    identity: &str,
    drawn: &'static Tier,
) -> &'static Tier {
    if let Some(known) = catalog.resolve(identity) {
        match tiers::tier_by_key(known) {
            Some(tier) => {
                if tier.key != drawn.key {
                    log::debug!(
                        "{identity} already catalogued as {}, overriding drawn {}",
                        tier.key,
                        drawn.key
                    );
                }
                return tier;
            }
            None => log::warn!("{identity} catalogued under unknown tier {known}"),
        }
    }
    catalog.register(identity, drawn.key);
    drawn
}

pub fn settle_unit(
    catalog: &mut ArtifactCatalog,
    economy: &mut Economy,
    artifact: Artifact,
    drawn: &'static Tier,
    id: u64,
    timestamp: i64,
) -> PullRecord {
    let tier = reconcile_tier(catalog, &artifact.identity, drawn);
    let coins = economy.reward_for(tier);
    economy.credit(coins);
    PullRecord::new(id, artifact, tier, coins, timestamp)
}

pub fn pick_fallback_tag(rng: &mut impl Rng) -> &'static str {
    FALLBACK_TAGS.choose(rng).copied().unwrap_or("funny")
}

pub fn normalize_tag_filter(raw: &str, tag_mastery: bool) -> Option<String> {
    let terms: Vec<&str> = raw
        .split(|c: char| c == ':' || c == ',' || c.is_whitespace())
        .filter(|term| !term.is_empty())
        .collect();
    if terms.is_empty() {
        return None;
    }
    if tag_mastery {
        Some(terms.join(" "))
    } else {
        Some(terms[0].to_string())
    }
}
