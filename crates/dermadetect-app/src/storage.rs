//! Device key-value storage.
//!
//! A small string-to-string store that survives restarts. The auth session
//! lives here under [`AUTH_TOKEN_KEY`] and [`AUTH_USER_KEY`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::config;

pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// JSON-encoded [`dermadetect_core::models::user::User`].
pub const AUTH_USER_KEY: &str = "auth_user";

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> eyre::Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> eyre::Result<()>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> eyre::Result<()>;
}

/// All entries in one JSON object on disk, rewritten atomically on every
/// change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// `storage.json` next to the config file.
    pub fn default_location() -> eyre::Result<Self> {
        Ok(Self::new(config::config_dir()?.join("storage.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> eyre::Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            eyre::eyre!("failed to read storage at {}: {e}", self.path.display())
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> eyre::Result<()> {
        let json = serde_json::to_string_pretty(entries)?;
        config::write_private(&self.path, json.as_bytes())
    }

    fn update<R>(&self, f: impl FnOnce(&mut BTreeMap<String, String>) -> R) -> eyre::Result<R> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| eyre::eyre!("storage lock poisoned"))?;
        let mut entries = self.read()?;
        let result = f(&mut entries);
        self.write(&entries)?;
        Ok(result)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> eyre::Result<Option<String>> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| eyre::eyre!("storage lock poisoned"))?;
        Ok(self.read()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> eyre::Result<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })?;
        tracing::debug!(key, path = %self.path.display(), "storage entry written");
        Ok(())
    }

    fn remove(&self, key: &str) -> eyre::Result<()> {
        let removed = self.update(|entries| entries.remove(key).is_some())?;
        if removed {
            tracing::debug!(key, path = %self.path.display(), "storage entry removed");
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> eyre::Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| eyre::eyre!("storage lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> eyre::Result<()> {
        self.entries
            .lock()
            .map_err(|_| eyre::eyre!("storage lock poisoned"))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> eyre::Result<()> {
        self.entries
            .lock()
            .map_err(|_| eyre::eyre!("storage lock poisoned"))?
            .remove(key);
        Ok(())
    }
}
