use super::odds::TierOdds;
use super::pull::{PullError, PullRecord};
use super::session::{Session, Snapshot};
use super::shop::{Receipt, ShopError};
use crate::media::{Artifact, MediaFetcher};
use crate::notify::Notifier;
use crate::persist::SnapshotStore;
use parking_lot::{Mutex, MutexGuard};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

const RESET_PROMPT: &str = "Reset all progress? This cannot be undone.";

struct PullGuard<'a> {
    busy: &'a AtomicBool,
}

impl<'a> PullGuard<'a> {
    fn acquire(busy: &'a AtomicBool) -> Option<Self> {
        busy.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { busy })
    }
}

impl Drop for PullGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone)]
pub struct View {
    pub snapshot: Snapshot,
    pub current_pull: Option<PullRecord>,
    pub odds: Vec<TierOdds<'static>>,
    pub pulling: bool,
}

/// Runs the game against its collaborators.
///
/// Session state sits behind a mutex that is only held between awaits, so
/// each operation is atomic with respect to the others. At most one pull runs
/// at a time; a second request is rejected rather than queued.
pub struct GachaEngine {
    session: Mutex<Session>,
    fetcher: Arc<dyn MediaFetcher>,
    store: Box<dyn SnapshotStore>,
    notifier: Arc<dyn Notifier>,
    pulling: AtomicBool,
}

impl GachaEngine {
    pub fn new(
        session: Session,
        fetcher: Arc<dyn MediaFetcher>,
        store: Box<dyn SnapshotStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            session: Mutex::new(session),
            fetcher,
            store,
            notifier,
            pulling: AtomicBool::new(false),
        }
    }

    pub fn is_pulling(&self) -> bool {
        self.pulling.load(Ordering::Acquire)
    }

    pub fn view(&self) -> View {
        let session = self.session.lock();
        View {
            snapshot: session.snapshot(),
            current_pull: session.current_pull().cloned(),
            odds: session.odds_preview(),
            pulling: self.is_pulling(),
        }
    }

    pub fn odds_preview(&self) -> Vec<TierOdds<'static>> {
        self.session.lock().odds_preview()
    }

    pub async fn pull(&self, tag_filter: &str) -> Result<Vec<PullRecord>, PullError> {
        let Some(_guard) = PullGuard::acquire(&self.pulling) else {
            log::debug!("pull rejected: another pull is in flight");
            self.notifier
                .notify(&PullError::ConcurrentPullRejected.to_string());
            return Err(PullError::ConcurrentPullRejected);
        };

        let (batch_size, tag, generation) = {
            let mut session = self.session.lock();
            let tag = session.tag_query(tag_filter);
            (session.begin_batch(), tag, session.generation())
        };
        if batch_size > 1 {
            self.persist();
        }
        log::info!("pulling batch of {batch_size} (tag: {tag:?})");

        let mut records = Vec::with_capacity(batch_size as usize);
        for unit in 0..batch_size {
            let (drawn, exclude) = {
                let mut session = self.current_session(generation)?;
                (session.draw_tier(), session.catalog_identities())
            };
            self.persist();

            let Some(artifact) = self.fetch_with_fallback(tag.as_deref(), &exclude).await else {
                log::warn!("pull unit {unit} exhausted its fetches");
                self.notifier.notify(&PullError::FetchExhausted.to_string());
                continue;
            };

            let record = self.current_session(generation)?.settle(artifact, drawn);
            log::info!(
                "pulled {} as {} (+{})",
                record.identity,
                record.tier_key,
                record.coin_value
            );
            self.persist();
            records.push(record);
        }

        if records.is_empty() {
            return Err(PullError::FetchExhausted);
        }
        self.current_session(generation)?.finish_batch(&records);
        self.persist();
        Ok(records)
    }

    // A reset while a fetch was pending makes the rest of the batch stale.
    fn current_session(&self, generation: u64) -> Result<MutexGuard<'_, Session>, PullError> {
        let session = self.session.lock();
        if session.generation() != generation {
            log::info!("dropping pull results from before a reset");
            return Err(PullError::Abandoned);
        }
        Ok(session)
    }

    async fn fetch_with_fallback(
        &self,
        tag: Option<&str>,
        exclude: &HashSet<String>,
    ) -> Option<Artifact> {
        if let Some(artifact) = self.fetcher.fetch_candidate(tag, exclude).await {
            return Some(artifact);
        }
        if tag.is_some() {
            return None;
        }
        let fallback = self.session.lock().fallback_tag();
        log::info!("nothing new unscoped; retrying with tag {fallback}");
        self.fetcher.fetch_candidate(Some(fallback), exclude).await
    }

    pub fn purchase(&self, item_id: u32) -> Result<Receipt, ShopError> {
        let result = self.session.lock().purchase(item_id);
        match &result {
            Ok(receipt) => {
                self.persist();
                if receipt.rerolled.is_some() {
                    self.notifier.notify("Your last pull has been rerolled!");
                }
                self.notifier
                    .notify(&format!("Purchased {}!", receipt.item.name));
            }
            Err(err) => {
                log::info!("purchase of item {item_id} failed: {err}");
                self.notifier.notify(&purchase_failure_message(err));
            }
        }
        result
    }

    pub fn favorite(&self, record_id: u64) -> bool {
        let added = self.session.lock().favorite_by_id(record_id);
        if added {
            self.persist();
        }
        added
    }

    pub fn unfavorite(&self, record_id: u64) -> bool {
        let removed = self.session.lock().unfavorite(record_id);
        self.persist();
        removed
    }

    pub fn clear_history(&self) {
        self.session.lock().clear_history();
        self.persist();
    }

    pub fn toggle_dark_mode(&self) -> bool {
        let dark = self.session.lock().toggle_dark_mode();
        self.persist();
        dark
    }

    pub fn reset_all(&self) -> bool {
        if !self.notifier.confirm(RESET_PROMPT) {
            return false;
        }
        self.session.lock().reset();
        if let Err(err) = self.store.clear() {
            log::warn!("failed to purge snapshot: {err}");
        }
        log::info!("progress reset");
        self.notifier.notify("All progress has been reset.");
        true
    }

    pub fn persist(&self) {
        let snapshot = self.session.lock().snapshot();
        if let Err(err) = self.store.save(&snapshot) {
            log::warn!("failed to save snapshot: {err}");
        }
    }
}

fn purchase_failure_message(err: &ShopError) -> String {
    match err {
        ShopError::InsufficientFunds { .. } => "Not enough currency!".to_string(),
        other => format!("Purchase failed: {other}"),
    }
}
