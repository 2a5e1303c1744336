use crate::gacha::session::Snapshot;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::PersistError;

pub fn load_snapshot(path: &Path) -> Result<Option<Snapshot>, PersistError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(decode_snapshot(&content))),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

pub fn decode_snapshot(content: &str) -> Snapshot {
    match ron::from_str::<Snapshot>(content) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            log::warn!("snapshot did not decode cleanly ({err}); salvaging fields");
            salvage(content)
        }
    }
}

fn salvage(content: &str) -> Snapshot {
    let map = match ron::from_str::<ron::Value>(content) {
        Ok(ron::Value::Map(map)) => map,
        Ok(_) => {
            log::warn!("snapshot is not a record; using defaults");
            return Snapshot::default();
        }
        Err(err) => {
            log::warn!("snapshot unreadable ({err}); using defaults");
            return Snapshot::default();
        }
    };

    let mut snapshot = Snapshot::default();
    if let Some(history) = field(&map, "history") {
        snapshot.history = history;
    }
    if let Some(collection) = field(&map, "collection") {
        snapshot.collection = collection;
    }
    if let Some(currency) = field(&map, "currency") {
        snapshot.currency = currency;
    }
    if let Some(boosts) = field(&map, "active_boosts") {
        snapshot.active_boosts = boosts;
    }
    if let Some(shop_items) = field(&map, "shop_items") {
        snapshot.shop_items = shop_items;
    }
    if let Some(multiplier) = field(&map, "currency_multiplier") {
        snapshot.currency_multiplier = multiplier;
    }
    if let Some(capacity) = field(&map, "history_capacity") {
        snapshot.history_capacity = capacity;
    }
    if let Some(mastery) = field(&map, "has_tag_mastery") {
        snapshot.has_tag_mastery = mastery;
    }
    if let Some(dark_mode) = field(&map, "dark_mode") {
        snapshot.dark_mode = dark_mode;
    }
    if let Some(catalog) = field(&map, "catalog") {
        snapshot.catalog = catalog;
    }
    if let Some(next_id) = field(&map, "next_record_id") {
        snapshot.next_record_id = next_id;
    }
    snapshot
}

fn field<T: DeserializeOwned>(map: &ron::Map, name: &str) -> Option<T> {
    let key = ron::Value::String(name.to_string());
    let (_, value) = map.iter().find(|(candidate, _)| **candidate == key)?;
    match value.clone().into_rust::<T>() {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            log::warn!("snapshot field {name} is malformed ({err}); using default");
            None
        }
    }
}
