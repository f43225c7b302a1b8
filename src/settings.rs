//! Key-value settings store.
//!
//! The dashboard keeps all user state (API token, task filter, background
//! image URL, bookmarks) as independent string values under a closed set of
//! keys. The store is passed explicitly to every component that needs it so
//! tests can substitute the in-memory implementation.

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

/// The recognized settings keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    /// Todoist API token used by every client call.
    ApiToken,
    /// Task filter expression; overrides the default filter when set.
    Filter,
    /// Background image URL recorded for the dashboard header.
    BackgroundUrl,
    /// JSON blob holding the bookmark list.
    Bookmarks,
}

impl SettingKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::ApiToken => "api_token",
            SettingKey::Filter => "filter",
            SettingKey::BackgroundUrl => "background_url",
            SettingKey::Bookmarks => "bookmarks",
        }
    }
}

/// Storage facade for the recognized keys.
///
/// Reads of an unset key return `None`, never an error. Writes take effect
/// immediately, last writer wins; nothing coordinates concurrent writers.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: SettingKey) -> Option<String>;
    fn set(&self, key: SettingKey, value: &str) -> Result<()>;
    fn remove(&self, key: SettingKey) -> Result<()>;
}

/// Settings backed by a TOML file under the user's config directory.
///
/// Every read loads the file fresh and every write replaces it whole via a
/// temp file and rename, so separate keys stay independent and a partial
/// write never lands on disk.
pub struct FileSettings {
    path: PathBuf,
}

impl FileSettings {
    pub fn open(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default location: `<config_dir>/tabdash/settings.toml`.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(Error::NoConfigDir)?;
        Ok(config_dir.join("tabdash").join("settings.toml"))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn load(&self) -> BTreeMap<String, String> {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };
        match toml::from_str(&content) {
            Ok(map) => map,
            Err(err) => {
                tracing::warn!("ignoring unreadable settings file {:?}: {}", self.path, err);
                BTreeMap::new()
            }
        }
    }

    fn store(&self, map: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string(map)?;
        let temp = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        fs::rename(temp, &self.path)?;
        Ok(())
    }
}

impl SettingsStore for FileSettings {
    fn get(&self, key: SettingKey) -> Option<String> {
        self.load().get(key.as_str()).cloned()
    }

    fn set(&self, key: SettingKey, value: &str) -> Result<()> {
        let mut map = self.load();
        map.insert(key.as_str().to_string(), value.to_string());
        self.store(&map)
    }

    fn remove(&self, key: SettingKey) -> Result<()> {
        let mut map = self.load();
        if map.remove(key.as_str()).is_some() {
            self.store(&map)?;
        }
        Ok(())
    }
}

/// In-memory settings, primarily for tests.
#[derive(Default)]
pub struct MemorySettings {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(key: SettingKey, value: &str) -> Self {
        let store = Self::new();
        store
            .set(key, value)
            .expect("in-memory settings writes cannot fail");
        store
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: SettingKey) -> Option<String> {
        self.values.lock().unwrap().get(key.as_str()).cloned()
    }

    fn set(&self, key: SettingKey, value: &str) -> Result<()> {
        self.values
            .lock()
            .unwrap()
            .insert(key.as_str().to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: SettingKey) -> Result<()> {
        self.values.lock().unwrap().remove(key.as_str());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_settings() -> (tempfile::TempDir, FileSettings) {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings = FileSettings::open(dir.path().join("settings.toml"));
        (dir, settings)
    }

    #[test]
    fn unset_keys_read_as_none() {
        let (_dir, settings) = file_settings();
        assert_eq!(settings.get(SettingKey::ApiToken), None);
        assert_eq!(settings.get(SettingKey::Filter), None);
    }

    #[test]
    fn set_then_get_round_trips_through_the_file() {
        let (_dir, settings) = file_settings();
        settings.set(SettingKey::Filter, "p1").unwrap();
        settings
            .set(SettingKey::BackgroundUrl, "https://example.com/bg.png")
            .unwrap();

        assert_eq!(settings.get(SettingKey::Filter).as_deref(), Some("p1"));

        // A second handle on the same path sees the write.
        let reopened = FileSettings::open(settings.path().clone());
        assert_eq!(
            reopened.get(SettingKey::BackgroundUrl).as_deref(),
            Some("https://example.com/bg.png")
        );
    }

    #[test]
    fn writes_are_independent_per_key() {
        let (_dir, settings) = file_settings();
        settings.set(SettingKey::ApiToken, "tok-1").unwrap();
        settings.set(SettingKey::Filter, "today").unwrap();
        settings.set(SettingKey::ApiToken, "tok-2").unwrap();

        assert_eq!(settings.get(SettingKey::ApiToken).as_deref(), Some("tok-2"));
        assert_eq!(settings.get(SettingKey::Filter).as_deref(), Some("today"));
    }

    #[test]
    fn remove_clears_a_key() {
        let (_dir, settings) = file_settings();
        settings.set(SettingKey::Filter, "p1").unwrap();
        settings.remove(SettingKey::Filter).unwrap();
        assert_eq!(settings.get(SettingKey::Filter), None);
    }

    #[test]
    fn unreadable_file_reads_as_empty() {
        let (_dir, settings) = file_settings();
        fs::write(settings.path(), "not valid toml [[[").unwrap();
        assert_eq!(settings.get(SettingKey::ApiToken), None);
    }

    #[test]
    fn memory_settings_round_trip() {
        let settings = MemorySettings::with(SettingKey::ApiToken, "token");
        assert_eq!(settings.get(SettingKey::ApiToken).as_deref(), Some("token"));
        settings.remove(SettingKey::ApiToken).unwrap();
        assert_eq!(settings.get(SettingKey::ApiToken), None);
    }
}
