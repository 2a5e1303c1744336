use std::collections::{HashMap, HashSet};

/// Remembers which tier every artifact was first assigned.
///
/// Entries are write-once: registering an identity that is already known
/// returns the recorded tier and leaves it untouched. Only `clear` removes
/// entries.
#[derive(Debug, Clone, Default)]
pub struct ArtifactCatalog {
    entries: HashMap<String, String>,
}

impl ArtifactCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut catalog = Self::new();
        for (identity, tier) in pairs {
            catalog.register(&identity, &tier);
        }
        catalog
    }

    pub fn resolve(&self, identity: &str) -> Option<&str> {
        self.entries.get(identity).map(String::as_str)
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.entries.contains_key(identity)
    }

    pub fn register(&mut self, identity: &str, tier_key: &str) -> &str {
        self.entries
            .entry(identity.to_string())
            .or_insert_with(|| tier_key.to_string())
    }

    pub fn identities(&self) -> HashSet<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<_> = self
            .entries
            .iter()
            .map(|(identity, tier)| (identity.clone(), tier.clone()))
            .collect();
        pairs.sort();
        pairs
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_registration_wins() {
        let mut catalog = ArtifactCatalog::new();
        assert_eq!(catalog.register("a.gif", "epic"), "epic");
        assert_eq!(catalog.register("a.gif", "common"), "epic");
        assert_eq!(catalog.resolve("a.gif"), Some("epic"));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn from_pairs_keeps_first_duplicate() {
        let catalog = ArtifactCatalog::from_pairs(vec![
            ("x".to_string(), "rare".to_string()),
            ("x".to_string(), "legendary".to_string()),
            ("y".to_string(), "common".to_string()),
        ]);
        assert_eq!(catalog.resolve("x"), Some("rare"));
        assert_eq!(
            catalog.pairs(),
            vec![
                ("x".to_string(), "rare".to_string()),
                ("y".to_string(), "common".to_string()),
            ]
        );
    }

    #[test]
    fn clear_empties_everything() {
        let mut catalog = ArtifactCatalog::new();
        catalog.register("a", "rare");
        catalog.clear();
        assert!(catalog.is_empty());
        assert!(!catalog.contains("a"));
        assert!(catalog.identities().is_empty());
    }
}
