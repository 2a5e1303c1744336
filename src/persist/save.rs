use crate::gacha::session::Snapshot;
use ron::ser::PrettyConfig;
use std::fs;
use std::path::Path;

use super::PersistError;

pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), PersistError> {
    let pretty = PrettyConfig::new();
    let serialized = ron::ser::to_string_pretty(snapshot, pretty)?;
    fs::write(path, serialized)?;
    Ok(())
}
