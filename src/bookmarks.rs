//! Bookmark list persisted through the settings store.
//!
//! The whole list lives as one JSON array under the bookmarks key, so a
//! bookmark edit is a single key write like every other setting.

use crate::error::Result;
use crate::settings::{SettingKey, SettingsStore};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct Bookmark {
    pub title: String,
    pub url: String,
}

/// Read the stored bookmark list. An absent or unreadable blob is an empty
/// list, never an error.
pub fn load(settings: &dyn SettingsStore) -> Vec<Bookmark> {
    let Some(blob) = settings.get(SettingKey::Bookmarks) else {
        return Vec::new();
    };
    match serde_json::from_str(&blob) {
        Ok(bookmarks) => bookmarks,
        Err(err) => {
            tracing::warn!("ignoring unreadable bookmarks blob: {}", err);
            Vec::new()
        }
    }
}

/// Replace the stored bookmark list.
pub fn save(settings: &dyn SettingsStore, bookmarks: &[Bookmark]) -> Result<()> {
    let blob = serde_json::to_string(bookmarks).expect("bookmark list serializes");
    settings.set(SettingKey::Bookmarks, &blob)
}
