use super::catalog::ArtifactCatalog;
use super::collection::{Collection, History};
use super::economy::{
    ActiveBoosts, DEFAULT_HISTORY_CAPACITY, Economy, EconomyState, MAX_MULTIPULL,
};
use super::odds::{self, TierOdds};
use super::pull::{self, PullRecord};
use super::shop::{self, Receipt, Shop, ShopError};
use super::tiers::{self, TIERS, Tier};
use crate::media::Artifact;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

fn default_multiplier() -> f64 {
    1.0
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub history: Vec<PullRecord>,
    #[serde(default)]
    pub collection: Vec<PullRecord>,
    #[serde(default)]
    pub currency: u64,
    #[serde(default)]
    pub active_boosts: ActiveBoosts,
    #[serde(default = "shop::default_item_ids")]
    pub shop_items: Vec<u32>,
    #[serde(default = "default_multiplier")]
    pub currency_multiplier: f64,
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    #[serde(default)]
    pub has_tag_mastery: bool,
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default)]
    pub catalog: Vec<(String, String)>,
    #[serde(default)]
    pub next_record_id: u64,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            history: Vec::new(),
            collection: Vec::new(),
            currency: 0,
            active_boosts: ActiveBoosts::default(),
            shop_items: shop::default_item_ids(),
            currency_multiplier: default_multiplier(),
            history_capacity: default_history_capacity(),
            has_tag_mastery: false,
            dark_mode: false,
            catalog: Vec::new(),
            next_record_id: 0,
        }
    }
}

pub struct Session {
    economy: Economy,
    catalog: ArtifactCatalog,
    history: History,
    collection: Collection,
    shop: Shop,
    current_pull: Option<PullRecord>,
    dark_mode: bool,
    next_record_id: u64,
    generation: u64,
    rng: StdRng,
}

impl Session {
    pub fn fresh(rng: StdRng) -> Self {
        Self::from_snapshot(Snapshot::default(), rng)
    }

    pub fn from_snapshot(snapshot: Snapshot, rng: StdRng) -> Self {
        let mut economy = Economy::new(
            EconomyState {
                currency: snapshot.currency,
                currency_multiplier: snapshot.currency_multiplier,
                history_capacity: snapshot.history_capacity,
                has_tag_mastery: snapshot.has_tag_mastery,
            },
            snapshot.active_boosts,
        );
        economy.sanitize();

        let known_pairs: Vec<(String, String)> = snapshot
            .catalog
            .into_iter()
            .filter(|(identity, tier)| {
                let known = tiers::is_known_tier(tier);
                if !known {
                    log::warn!("dropping catalog entry {identity} with unknown tier {tier}");
                }
                known
            })
            .collect();
        let catalog = ArtifactCatalog::from_pairs(known_pairs);

        let highest_id = snapshot
            .history
            .iter()
            .chain(snapshot.collection.iter())
            .map(|record| record.id)
            .max();
        let next_record_id = match highest_id {
            Some(id) => snapshot.next_record_id.max(id + 1),
            None => snapshot.next_record_id,
        };

        let history = History::from_records(snapshot.history, economy.state.history_capacity);
        let collection = Collection::from_records(snapshot.collection);
        let shop = Shop::from_ids(snapshot.shop_items);

        Self {
            economy,
            catalog,
            history,
            collection,
            shop,
            current_pull: None,
            dark_mode: snapshot.dark_mode,
            next_record_id,
            generation: 0,
            rng,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            history: self.history.records().to_vec(),
            collection: self.collection.records().to_vec(),
            currency: self.economy.state.currency,
            active_boosts: self.economy.boosts.clone(),
            shop_items: self.shop.ids().to_vec(),
            currency_multiplier: self.economy.state.currency_multiplier,
            history_capacity: self.economy.state.history_capacity,
            has_tag_mastery: self.economy.state.has_tag_mastery,
            dark_mode: self.dark_mode,
            catalog: self.catalog.pairs(),
            next_record_id: self.next_record_id,
        }
    }

    pub fn economy(&self) -> &Economy {
        &self.economy
    }

    pub fn economy_mut(&mut self) -> &mut Economy {
        &mut self.economy
    }

    pub fn catalog(&self) -> &ArtifactCatalog {
        &self.catalog
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn shop(&self) -> &Shop {
        &self.shop
    }

    pub fn current_pull(&self) -> Option<&PullRecord> {
        self.current_pull.as_ref()
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    // Bumped by every reset so in-flight work can tell it is stale.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.dark_mode
    }

    pub fn odds_preview(&self) -> Vec<TierOdds<'static>> {
        odds::effective_odds(&TIERS, &self.economy.boosts)
    }

    pub fn tag_query(&self, raw: &str) -> Option<String> {
        pull::normalize_tag_filter(raw, self.economy.state.has_tag_mastery)
    }

    pub fn begin_batch(&mut self) -> u32 {
        match self.economy.boosts.take_multipull() {
            Some(count) => count.clamp(1, MAX_MULTIPULL),
            None => 1,
        }
    }

    pub fn draw_tier(&mut self) -> &'static Tier {
        let odds = odds::odds_for_draw(&TIERS, &mut self.economy.boosts);
        odds::draw(&odds, &mut self.rng)
    }

    pub fn catalog_identities(&self) -> HashSet<String> {
        self.catalog.identities()
    }

    pub fn fallback_tag(&mut self) -> &'static str {
        pull::pick_fallback_tag(&mut self.rng)
    }

    pub fn settle(&mut self, artifact: Artifact, drawn: &'static Tier) -> PullRecord {
        let id = self.next_record_id;
        self.next_record_id += 1;
        let timestamp = chrono::Utc::now().timestamp_millis();
        pull::settle_unit(
            &mut self.catalog,
            &mut self.economy,
            artifact,
            drawn,
            id,
            timestamp,
        )
    }

    pub fn finish_batch(&mut self, records: &[PullRecord]) {
        if let Some(latest) = records.last() {
            self.current_pull = Some(latest.clone());
        }
        self.history
            .push_batch(records, self.economy.state.history_capacity);
    }

    pub fn purchase(&mut self, item_id: u32) -> Result<Receipt, ShopError> {
        let receipt = self
            .shop
            .purchase(item_id, &mut self.economy, &mut self.history)?;
        if let Some(rerolled) = receipt.rerolled {
            if self.current_pull.as_ref().map(|record| record.id) == Some(rerolled) {
                self.current_pull = None;
            }
        }
        // Capacity may have changed.
        self.history.truncate(self.economy.state.history_capacity);
        Ok(receipt)
    }

    pub fn find_record(&self, id: u64) -> Option<&PullRecord> {
        self.history
            .find(id)
            .or_else(|| self.current_pull.as_ref().filter(|record| record.id == id))
            .or_else(|| self.collection.records().iter().find(|record| record.id == id))
    }

    pub fn favorite(&mut self, record: &PullRecord) -> bool {
        if !self.collection.add(record) {
            return false;
        }
        self.mark_favorite(record.id, true);
        true
    }

    pub fn favorite_by_id(&mut self, id: u64) -> bool {
        match self.find_record(id).cloned() {
            Some(record) => self.favorite(&record),
            None => false,
        }
    }

    pub fn unfavorite(&mut self, id: u64) -> bool {
        let removed = self.collection.remove(id).is_some();
        self.mark_favorite(id, false);
        removed
    }

    fn mark_favorite(&mut self, id: u64, favorite: bool) {
        self.history.set_favorite(id, favorite);
        if let Some(current) = self.current_pull.as_mut().filter(|record| record.id == id) {
            current.is_favorite = favorite;
        }
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn reset(&mut self) {
        self.economy = Economy::default();
        self.catalog.clear();
        self.history.clear();
        self.collection.clear();
        self.shop = Shop::default();
        self.current_pull = None;
        self.generation = self.generation.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn session() -> Session {
        Session::fresh(StdRng::seed_from_u64(42))
    }

    fn artifact(identity: &str) -> Artifact {
        Artifact {
            identity: identity.to_string(),
            source: "GIF".to_string(),
            tags: Vec::new(),
        }
    }

    fn pull_one(session: &mut Session, identity: &str) -> PullRecord {
        let tier = session.draw_tier();
        let record = session.settle(artifact(identity), tier);
        session.finish_batch(std::slice::from_ref(&record));
        record
    }

    #[test]
    fn favorites_survive_history_clear() {
        let mut session = session();
        let first = pull_one(&mut session, "a.gif");
        pull_one(&mut session, "b.gif");

        assert!(session.favorite_by_id(first.id));
        assert!(!session.favorite_by_id(first.id));
        assert!(session.history().find(first.id).map(|r| r.is_favorite).unwrap_or(false));

        session.clear_history();
        assert!(session.history().is_empty());
        assert_eq!(session.collection().len(), 1);
        assert!(session.collection().records()[0].is_favorite);
        assert!(session.catalog().contains("a.gif"));
    }

    #[test]
    fn unfavorite_clears_history_flag() {
        let mut session = session();
        let record = pull_one(&mut session, "a.gif");
        session.favorite(&record);
        assert!(session.current_pull().map(|r| r.is_favorite).unwrap_or(false));
        assert!(session.unfavorite(record.id));
        assert!(!session.history().records()[0].is_favorite);
        assert!(!session.current_pull().map(|r| r.is_favorite).unwrap_or(true));
        assert!(!session.unfavorite(record.id));
    }

    #[test]
    fn reroll_keeps_collected_copy() {
        let mut session = session();
        let record = pull_one(&mut session, "a.gif");
        session.favorite(&record);
        session.economy_mut().credit(1_000);
        session.purchase(12).expect("reroll should succeed");
        assert!(session.history().is_empty());
        assert!(session.current_pull().is_none());
        assert!(session.collection().contains_id(record.id));
    }

    #[test]
    fn snapshot_restores_state_and_resumes_ids() {
        let mut session = session();
        session.economy_mut().credit(500);
        session.purchase(2).expect("rare boost");
        let record = pull_one(&mut session, "a.gif");
        session.favorite(&record);
        session.toggle_dark_mode();

        let mut snapshot = session.snapshot();
        snapshot.next_record_id = 0;
        snapshot.catalog.push(("ghost.gif".to_string(), "mythic".to_string()));
        let restored = Session::from_snapshot(snapshot, StdRng::seed_from_u64(1));

        assert_eq!(restored.economy().boosts.bonus_for("rare"), 5.0);
        assert!(!restored.shop().is_available(2));
        assert_eq!(restored.catalog().resolve("a.gif"), Some(record.tier_key.as_str()));
        assert!(!restored.catalog().contains("ghost.gif"));
        assert_eq!(restored.collection().len(), 1);
        assert!(restored.dark_mode());
        assert_eq!(restored.snapshot().next_record_id, record.id + 1);
    }

    #[test]
    fn corrupt_multipull_does_not_survive_loading() {
        let mut snapshot = Snapshot::default();
        snapshot.active_boosts.multipull = Some(4_000_000_000);
        let mut restored = Session::from_snapshot(snapshot, StdRng::seed_from_u64(1));
        assert_eq!(restored.begin_batch(), 1);

        restored.economy_mut().boosts.multipull = Some(u32::MAX);
        assert_eq!(restored.begin_batch(), MAX_MULTIPULL);
    }

    #[test]
    fn loaded_history_is_capped() {
        let mut session = session();
        for i in 0..5 {
            pull_one(&mut session, &format!("{i}.gif"));
        }
        let mut snapshot = session.snapshot();
        snapshot.history_capacity = 2;
        let restored = Session::from_snapshot(snapshot, StdRng::seed_from_u64(1));
        let ids: Vec<u64> = restored.history().records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![4, 3]);
    }

    #[test]
    fn reset_returns_to_defaults() {
        let mut session = session();
        session.economy_mut().credit(1_000);
        session.purchase(14).expect("capacity upgrade");
        session.purchase(1).expect("common boost");
        let record = pull_one(&mut session, "a.gif");
        session.favorite(&record);
        session.toggle_dark_mode();
        let generation = session.generation();

        session.reset();
        assert_eq!(session.generation(), generation + 1);
        assert_eq!(session.economy(), &Economy::default());
        assert!(session.catalog().is_empty());
        assert!(session.history().is_empty());
        assert!(session.collection().is_empty());
        assert_eq!(session.shop().ids(), shop::default_item_ids().as_slice());
        assert!(session.current_pull().is_none());
        assert!(session.dark_mode());
    }
}
