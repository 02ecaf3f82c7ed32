//! Key-value persistence behind generated settings screens.
//!
//! Backends implement [`SettingsStore`]; generated code only talks to [`Storage`],
//! one typed handle per persisted member.
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{PrototypeError, Result};

/// Backend for persisted settings. Values are stored as JSON.
pub trait SettingsStore: Send + Sync {
    fn load(&self, key: &str) -> anyhow::Result<Option<serde_json::Value>>;
    fn save(&self, key: &str, value: serde_json::Value) -> anyhow::Result<()>;
    fn remove(&self, key: &str) -> anyhow::Result<()>;
}

pub type SharedStore = Arc<dyn SettingsStore>;

/// Process-local store, mostly for tests and previews.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, serde_json::Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<MemoryStore> {
        Arc::new(Self::new())
    }

    pub fn snapshot(&self) -> BTreeMap<String, serde_json::Value> {
        self.entries.read().clone()
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self, key: &str) -> anyhow::Result<Option<serde_json::Value>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn save(&self, key: &str, value: serde_json::Value) -> anyhow::Result<()> {
        self.entries.write().insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// Single JSON object on disk, rewritten on every change.
pub struct JsonFileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, serde_json::Value>>,
}

impl JsonFileStore {
    /// Opens `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading settings file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing settings file {}", path.display()))?
        } else {
            BTreeMap::new()
        };
        tracing::debug!(path = %path.display(), "settings file opened");
        Ok(JsonFileStore {
            path,
            entries: RwLock::new(entries),
        })
    }

    fn flush(&self, entries: &BTreeMap<String, serde_json::Value>) -> anyhow::Result<()> {
        let raw = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("writing settings file {}", self.path.display()))
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self, key: &str) -> anyhow::Result<Option<serde_json::Value>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn save(&self, key: &str, value: serde_json::Value) -> anyhow::Result<()> {
        let mut entries = self.entries.write();
        entries.insert(key.to_owned(), value);
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        let mut entries = self.entries.write();
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}

/// Typed handle on one persisted key with a fallback default.
pub struct Storage<T> {
    key: &'static str,
    default: T,
    store: SharedStore,
}

impl<T> Storage<T> {
    pub fn new(store: SharedStore, key: &'static str, default: T) -> Self {
        Storage {
            key,
            default,
            store,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }
}

impl<T: fmt::Debug> fmt::Debug for Storage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage")
            .field("key", &self.key)
            .field("default", &self.default)
            .finish_non_exhaustive()
    }
}

impl<T> Storage<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Stored value, or the default when missing or unreadable.
    pub fn get(&self) -> T {
        match self.store.load(self.key) {
            Ok(Some(raw)) => match serde_json::from_value(raw) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(key = self.key, error = %e, "stored setting has unexpected shape; using default");
                    self.default.clone()
                }
            },
            Ok(None) => self.default.clone(),
            Err(e) => {
                tracing::warn!(key = self.key, error = %e, "settings store read failed; using default");
                self.default.clone()
            }
        }
    }

    pub fn set(&self, value: T) -> Result {
        let raw = serde_json::to_value(&value).map_err(|e| PrototypeError::Storage {
            key: self.key.to_owned(),
            message: e.to_string(),
        })?;
        self.store
            .save(self.key, raw)
            .map_err(|e| PrototypeError::Storage {
                key: self.key.to_owned(),
                message: format!("{e:#}"),
            })?;
        tracing::debug!(key = self.key, "setting persisted");
        Ok(())
    }

    /// Forgets the stored value so the default applies again.
    pub fn reset(&self) -> Result {
        self.store
            .remove(self.key)
            .map_err(|e| PrototypeError::Storage {
                key: self.key.to_owned(),
                message: format!("{e:#}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_falls_back_to_default() {
        let store = MemoryStore::shared();
        let limit = Storage::new(store.clone(), "General.limit", 10_i64);
        assert_eq!(limit.get(), 10);
        limit.set(25).unwrap();
        assert_eq!(limit.get(), 25);
        assert_eq!(store.snapshot()["General.limit"], serde_json::json!(25));
        limit.reset().unwrap();
        assert_eq!(limit.get(), 10);
    }

    #[test]
    fn unreadable_values_use_default() {
        let store = MemoryStore::shared();
        store
            .save("General.enabled", serde_json::json!("not a bool"))
            .unwrap();
        let enabled = Storage::new(store, "General.enabled", true);
        assert!(enabled.get());
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        {
            let store: SharedStore = Arc::new(JsonFileStore::open(&path).unwrap());
            let name = Storage::new(store, "Profile.name", String::new());
            name.set("Ada".to_owned()).unwrap();
        }
        let store: SharedStore = Arc::new(JsonFileStore::open(&path).unwrap());
        let name = Storage::new(store, "Profile.name", String::new());
        assert_eq!(name.get(), "Ada");
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"{ nope").unwrap();
        assert!(JsonFileStore::open(file.path()).is_err());
    }
}
