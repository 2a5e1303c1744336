mod load;
mod save;

pub use load::load_snapshot;
pub use save::save_snapshot;

use crate::gacha::session::Snapshot;
use parking_lot::Mutex;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_SAVE_FILE: &str = "gif-gacha.ron";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("snapshot io failed: {0}")]
    Io(#[from] io::Error),
    #[error("snapshot encoding failed: {0}")]
    Encode(#[from] ron::Error),
}

pub trait SnapshotStore: Send + Sync {
    fn load(&self) -> Result<Option<Snapshot>, PersistError>;
    fn save(&self, snapshot: &Snapshot) -> Result<(), PersistError>;
    fn clear(&self) -> Result<(), PersistError>;
}

#[derive(Debug, Clone)]
pub struct RonFileStore {
    path: PathBuf,
}

impl RonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for RonFileStore {
    fn default() -> Self {
        Self::new(DEFAULT_SAVE_FILE)
    }
}

impl SnapshotStore for RonFileStore {
    fn load(&self) -> Result<Option<Snapshot>, PersistError> {
        load_snapshot(&self.path)
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), PersistError> {
        save_snapshot(&self.path, snapshot)
    }

    fn clear(&self) -> Result<(), PersistError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Mutex<Option<Snapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Snapshot> {
        self.snapshot.lock().clone()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<Snapshot>, PersistError> {
        Ok(self.current())
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), PersistError> {
        *self.snapshot.lock() = Some(snapshot.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistError> {
        *self.snapshot.lock() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!("gif-gacha-{name}-{}-{nanos}.ron", std::process::id()))
    }

    #[test]
    fn file_store_round_trips_and_clears() {
        let store = RonFileStore::new(temp_path("roundtrip"));
        assert!(store.load().expect("missing file is not an error").is_none());

        let mut snapshot = Snapshot::default();
        snapshot.currency = 321;
        snapshot.catalog.push(("a.gif".to_string(), "epic".to_string()));
        snapshot.active_boosts.guaranteed = Some("rare".to_string());
        store.save(&snapshot).expect("save should succeed");

        let loaded = store.load().expect("load should succeed").expect("snapshot present");
        assert_eq!(loaded, snapshot);

        store.clear().expect("clear should succeed");
        store.clear().expect("clearing twice is fine");
        assert!(store.load().expect("load after clear").is_none());
    }

    #[test]
    fn memory_store_clears() {
        let store = MemoryStore::new();
        store.save(&Snapshot::default()).expect("save");
        assert!(store.load().expect("load").is_some());
        store.clear().expect("clear");
        assert!(store.current().is_none());
    }
}
