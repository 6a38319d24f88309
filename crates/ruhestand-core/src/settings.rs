//! Preference persistence through a flat key-value store.
//!
//! Mirrors browser-style local storage: flat string keys, values that
//! survive restarts, and absence of a key meaning "use the default".
//! The binary persists to `~/.config/ruhestand/settings.json`; tests use
//! the in-memory store.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;

use crate::countdown::DEFAULT_TARGET;
use crate::i18n::Language;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "ruhestand";

/// Settings file name
const SETTINGS_FILE: &str = "settings.json";

pub const KEY_TARGET_DATE: &str = "target_date";
pub const KEY_BG_COLOR: &str = "bg_color";
pub const KEY_ACCENT_COLOR: &str = "accent_color";
pub const KEY_CUSTOM_TITLE: &str = "custom_title";
pub const KEY_LANGUAGE: &str = "language";

/// Key-value persistence boundary. Each mutation is written through
/// synchronously.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
    /// Drop every stored key.
    fn clear(&mut self) -> Result<()>;
}

/// Per-user config directory for this application.
pub fn config_dir() -> Result<PathBuf> {
    let config_dir =
        dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
    Ok(config_dir.join(APP_NAME))
}

/// Per-user cache directory for this application.
pub fn cache_dir() -> Result<PathBuf> {
    let cache_dir =
        dirs::cache_dir().ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
    Ok(cache_dir.join(APP_NAME))
}

/// JSON-file-backed store used by the binary.
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    pub fn open_default() -> Result<Self> {
        Self::open(config_dir()?.join(SETTINGS_FILE))
    }

    pub fn open(path: PathBuf) -> Result<Self> {
        let values = if path.exists() {
            serde_json::from_str(&std::fs::read_to_string(&path)?)?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&self.values)?)?;
        Ok(())
    }
}

impl SettingsStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        self.persist()
    }

    fn clear(&mut self) -> Result<()> {
        self.values.clear();
        self.persist()
    }
}

/// In-memory store for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.values.clear();
        Ok(())
    }
}

/// Display preferences with defaults applied for absent keys.
///
/// Derived view over the store; never written back as a block. Color and
/// title stay optional so the frontend can fall back to its palette and
/// the localized default title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub target_date: String,
    pub bg_color: Option<String>,
    pub accent_color: Option<String>,
    pub custom_title: Option<String>,
    pub language: Language,
}

impl Preferences {
    pub fn load(store: &dyn SettingsStore) -> Self {
        Self {
            target_date: store
                .get(KEY_TARGET_DATE)
                .unwrap_or_else(|| DEFAULT_TARGET.to_string()),
            bg_color: store.get(KEY_BG_COLOR),
            accent_color: store.get(KEY_ACCENT_COLOR),
            custom_title: store.get(KEY_CUSTOM_TITLE),
            language: store
                .get(KEY_LANGUAGE)
                .map(|code| Language::from_code(&code))
                .unwrap_or_default(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_when_store_is_empty() {
        let store = MemoryStore::default();
        let prefs = Preferences::load(&store);
        assert_eq!(prefs.target_date, DEFAULT_TARGET);
        assert_eq!(prefs.language, Language::De);
        assert_eq!(prefs.bg_color, None);
        assert_eq!(prefs.custom_title, None);
    }

    #[test]
    fn test_stored_keys_override_defaults() {
        let mut store = MemoryStore::default();
        store.set(KEY_TARGET_DATE, "2030-01-01").unwrap();
        store.set(KEY_LANGUAGE, "en").unwrap();
        store.set(KEY_ACCENT_COLOR, "#61afef").unwrap();

        let prefs = Preferences::load(&store);
        assert_eq!(prefs.target_date, "2030-01-01");
        assert_eq!(prefs.language, Language::En);
        assert_eq!(prefs.accent_color.as_deref(), Some("#61afef"));
    }

    #[test]
    fn test_clear_restores_defaults() {
        let mut store = MemoryStore::default();
        store.set(KEY_CUSTOM_TITLE, "Feierabend").unwrap();
        store.clear().unwrap();
        assert_eq!(Preferences::load(&store), Preferences::load(&MemoryStore::default()));
    }

    #[test]
    fn test_json_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        {
            let mut store = JsonFileStore::open(path.clone()).unwrap();
            store.set(KEY_TARGET_DATE, "2031-06-15").unwrap();
            store.set(KEY_BG_COLOR, "#002b36").unwrap();
            store.remove(KEY_BG_COLOR).unwrap();
        }

        let store = JsonFileStore::open(path).unwrap();
        assert_eq!(store.get(KEY_TARGET_DATE).as_deref(), Some("2031-06-15"));
        assert_eq!(store.get(KEY_BG_COLOR), None);
    }
}
