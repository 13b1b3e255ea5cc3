//! Session-scoped persistence for the task collection.
//!
//! The whole board is stored as one JSON array under a single key in a
//! key-value store. Reads never fail from the caller's point of view: a
//! missing key, an unreadable store, or a malformed blob all load as an
//! empty board.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::config::Config;
use crate::task::Task;
use crate::{qlog_debug, qlog_error, qlog_warn, Error, Result};

/// String key-value store with session lifetime.
pub trait KeyValueStore: Send {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Where items live, for log lines.
    fn location(&self) -> String {
        "memory".to_string()
    }
}

/// One file per key inside a session directory.
pub struct SessionDirStore {
    dir: PathBuf,
}

impl SessionDirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File backing `key`. Keys name a single file inside the session
    /// directory, so separators and `..` are rejected.
    fn item_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.contains("..") {
            return Err(Error::Validation(format!("Invalid storage key: {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for SessionDirStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.item_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.item_path(key)?;
        if !self.dir.exists() {
            qlog_debug!("Creating session directory: {}", self.dir.display());
            fs::create_dir_all(&self.dir)?;
        }

        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, value)?;
        fs::rename(&temp_path, &path)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.item_path(key)?;
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    fn location(&self) -> String {
        self.dir.display().to_string()
    }
}

/// In-process store; contents vanish with the process.
#[derive(Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map still holds valid strings.
        self.items.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items().remove(key);
        Ok(())
    }
}

/// Loads and saves the task collection under one key.
///
/// Without a backing store (no session context) every call is a no-op.
pub struct Persistence {
    store: Option<Box<dyn KeyValueStore>>,
    key: String,
}

impl Persistence {
    pub fn new(store: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store: Some(store),
            key: key.into(),
        }
    }

    /// Persistence with no session context.
    pub fn detached() -> Self {
        Self {
            store: None,
            key: String::new(),
        }
    }

    /// In-memory persistence under the default key.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()), Config::default().effective_storage_key())
    }

    /// Build persistence from configuration: the session directory when
    /// one exists, detached otherwise.
    pub fn from_config(config: &Config) -> Self {
        let key = config.effective_storage_key();
        match config.session_dir() {
            Some(dir) => {
                qlog_debug!("Persistence: session dir={} key={}", dir.display(), key);
                Self::new(Box::new(SessionDirStore::new(dir)), key)
            }
            None => {
                qlog_warn!("Persistence: no session directory available, tasks will not be saved");
                Self::detached()
            }
        }
    }

    pub fn is_attached(&self) -> bool {
        self.store.is_some()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Human-readable description of where the board is kept.
    pub fn location(&self) -> String {
        match &self.store {
            Some(store) => store.location(),
            None => "nowhere (not saved)".to_string(),
        }
    }

    /// Read the stored collection. Missing or unreadable data loads as empty.
    pub fn load(&self) -> Vec<Task> {
        let Some(store) = &self.store else {
            return Vec::new();
        };

        let raw = match store.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                qlog_debug!("Persistence::load key={} not found", self.key);
                return Vec::new();
            }
            Err(e) => {
                qlog_error!("Failed to read saved tasks: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Task>>(&raw) {
            Ok(tasks) => {
                qlog_debug!("Persistence::load key={} tasks={}", self.key, tasks.len());
                tasks
            }
            Err(e) => {
                qlog_warn!("Failed to parse saved tasks: {}", e);
                Vec::new()
            }
        }
    }

    /// Replace the stored collection with `tasks`.
    pub fn save(&self, tasks: &[Task]) -> Result<()> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        let contents = serde_json::to_string(tasks)?;
        store.set_item(&self.key, &contents)?;
        qlog_debug!("Persistence::save key={} tasks={}", self.key, tasks.len());
        Ok(())
    }

    /// Remove the stored collection entirely.
    pub fn clear(&self) -> Result<()> {
        match &self.store {
            Some(store) => store.remove_item(&self.key),
            None => Ok(()),
        }
    }
}
