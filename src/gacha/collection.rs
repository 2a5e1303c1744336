use super::pull::PullRecord;
use super::tiers::{TIERS, Tier};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    records: Vec<PullRecord>,
}

impl History {
    pub fn from_records(records: Vec<PullRecord>, capacity: usize) -> Self {
        let mut history = Self { records };
        history.truncate(capacity);
        history
    }

    pub fn push_batch(&mut self, batch: &[PullRecord], capacity: usize) {
        let mut records: Vec<PullRecord> = batch.iter().rev().cloned().collect();
        records.append(&mut self.records);
        self.records = records;
        self.truncate(capacity);
    }

    pub fn truncate(&mut self, capacity: usize) {
        self.records.truncate(capacity);
    }

    pub fn latest(&self) -> Option<&PullRecord> {
        self.records.first()
    }

    pub fn pop_latest(&mut self) -> Option<PullRecord> {
        if self.records.is_empty() {
            None
        } else {
            Some(self.records.remove(0))
        }
    }

    pub fn find(&self, id: u64) -> Option<&PullRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn set_favorite(&mut self, id: u64, favorite: bool) {
        for record in self.records.iter_mut().filter(|record| record.id == id) {
            record.is_favorite = favorite;
        }
    }

    pub fn records(&self) -> &[PullRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    records: Vec<PullRecord>,
}

impl Collection {
    pub fn from_records(records: Vec<PullRecord>) -> Self {
        let mut collection = Self::default();
        for mut record in records {
            if !collection.contains_identity(&record.identity) {
                record.is_favorite = true;
                collection.records.push(record);
            }
        }
        collection
    }

    pub fn contains_identity(&self, identity: &str) -> bool {
        self.records.iter().any(|record| record.identity == identity)
    }

    pub fn contains_id(&self, id: u64) -> bool {
        self.records.iter().any(|record| record.id == id)
    }

    pub fn add(&mut self, record: &PullRecord) -> bool {
        if self.contains_identity(&record.identity) {
            return false;
        }
        let mut favorite = record.clone();
        favorite.is_favorite = true;
        self.records.insert(0, favorite);
        true
    }

    pub fn remove(&mut self, id: u64) -> Option<PullRecord> {
        let index = self.records.iter().position(|record| record.id == id)?;
        Some(self.records.remove(index))
    }

    pub fn records(&self) -> &[PullRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn leaderboard(&self) -> Vec<(&'static Tier, usize)> {
        leaderboard(&self.records)
    }
}

pub fn leaderboard(records: &[PullRecord]) -> Vec<(&'static Tier, usize)> {
    let mut board: Vec<(&'static Tier, usize)> = TIERS
        .iter()
        .map(|tier| {
            let count = records
                .iter()
                .filter(|record| record.tier_key == tier.key)
                .count();
            (tier, count)
        })
        .collect();
    board.sort_by(|a, b| b.1.cmp(&a.1));
    board
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, identity: &str, tier_key: &str) -> PullRecord {
        PullRecord {
            id,
            identity: identity.to_string(),
            tier_key: tier_key.to_string(),
            tier_label: tier_key.to_string(),
            tier_color: "#000000".to_string(),
            source: "GIF".to_string(),
            tags: Vec::new(),
            coin_value: 1,
            timestamp: 0,
            is_favorite: false,
        }
    }

    #[test]
    fn batches_are_prepended_newest_first_and_capped() {
        let mut history = History::default();
        history.push_batch(&[record(1, "a", "common"), record(2, "b", "common")], 3);
        history.push_batch(&[record(3, "c", "rare"), record(4, "d", "rare")], 3);
        let ids: Vec<u64> = history.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![4, 3, 2]);
        assert_eq!(history.latest().map(|r| r.id), Some(4));
    }

    #[test]
    fn collection_dedupes_by_identity() {
        let mut collection = Collection::default();
        assert!(collection.add(&record(1, "a", "rare")));
        assert!(!collection.add(&record(2, "a", "rare")));
        assert_eq!(collection.len(), 1);
        assert!(collection.records()[0].is_favorite);
        assert!(collection.remove(1).is_some());
        assert!(collection.remove(1).is_none());
    }

    #[test]
    fn loading_keeps_order() {
        let collection =
            Collection::from_records(vec![record(5, "e", "rare"), record(3, "c", "common")]);
        let ids: Vec<u64> = collection.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![5, 3]);
        assert!(collection.records().iter().all(|r| r.is_favorite));
    }

    #[test]
    fn leaderboard_sorts_by_count_and_keeps_table_order_on_ties() {
        let collection = Collection::from_records(vec![
            record(1, "a", "epic"),
            record(2, "b", "epic"),
            record(3, "c", "rare"),
        ]);
        let board: Vec<(&str, usize)> = collection
            .leaderboard()
            .into_iter()
            .map(|(tier, count)| (tier.key, count))
            .collect();
        assert_eq!(
            board,
            vec![("epic", 2), ("rare", 1), ("common", 0), ("legendary", 0)]
        );
    }
}
