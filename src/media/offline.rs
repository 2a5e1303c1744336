use super::{Artifact, MediaFetcher, choose_new};
use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

const SOURCE_NAME: &str = "Offline";
const BATCH_LIMIT: usize = 50;

#[derive(Debug)]
pub struct OfflineFetcher {
    pool_size: u32,
    rng: Mutex<StdRng>,
}

impl OfflineFetcher {
    pub fn new(pool_size: u32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            pool_size: pool_size.max(1),
            rng: Mutex::new(rng),
        }
    }

    fn batch(&self, tag: Option<&str>) -> Vec<Artifact> {
        let topic = tag.unwrap_or("random");
        let mut rng = self.rng.lock();
        (0..BATCH_LIMIT)
            .map(|_| {
                let n = rng.gen_range(0..self.pool_size);
                Artifact {
                    identity: format!("offline://{topic}/{n:04}.gif"),
                    source: SOURCE_NAME.to_string(),
                    tags: vec![topic.to_string()],
                }
            })
            .collect()
    }
}

#[async_trait]
impl MediaFetcher for OfflineFetcher {
    async fn fetch_candidate(
        &self,
        tag: Option<&str>,
        exclude: &HashSet<String>,
    ) -> Option<Artifact> {
        let candidates = self.batch(tag);
        let mut rng = self.rng.lock();
        choose_new(candidates, exclude, &mut *rng)
    }
}
