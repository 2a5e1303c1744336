mod offline;
mod tenor;

pub use offline::OfflineFetcher;
pub use tenor::TenorFetcher;

use async_trait::async_trait;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub identity: String,
    pub source: String,
    pub tags: Vec<String>,
}

#[async_trait]
pub trait MediaFetcher: Send + Sync {
    async fn fetch_candidate(
        &self,
        tag: Option<&str>,
        exclude: &HashSet<String>,
    ) -> Option<Artifact>;
}

pub fn choose_new(
    candidates: Vec<Artifact>,
    exclude: &HashSet<String>,
    rng: &mut impl Rng,
) -> Option<Artifact> {
    let fresh: Vec<Artifact> = candidates
        .into_iter()
        .filter(|candidate| !exclude.contains(&candidate.identity))
        .collect();
    fresh.choose(rng).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn choose_new_skips_excluded() {
        let candidates = vec![
            Artifact {
                identity: "a".to_string(),
                source: "GIF".to_string(),
                tags: Vec::new(),
            },
            Artifact {
                identity: "b".to_string(),
                source: "GIF".to_string(),
                tags: Vec::new(),
            },
        ];
        let exclude: HashSet<String> = ["a".to_string()].into_iter().collect();
        let mut rng = StdRng::seed_from_u64(5);
        let chosen = choose_new(candidates.clone(), &exclude, &mut rng);
        assert_eq!(chosen.map(|a| a.identity).as_deref(), Some("b"));

        let all: HashSet<String> = ["a".to_string(), "b".to_string()].into_iter().collect();
        assert!(choose_new(candidates, &all, &mut rng).is_none());
    }
}
