//! Usage: Durable string key-value storage backing the session (`token`, `user`, `serverUrl`).

use crate::shared::fs::{read_optional_to_string, write_file_atomic};
use crate::shared::mutex_ext::MutexExt;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), String>;
    fn remove(&self, key: &str) -> Result<(), String>;
}

/// A JSON object of strings on disk, mirrored in memory. Every mutation rewrites the file.
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    pub fn open(path: &Path) -> Result<Self, String> {
        let entries = match read_optional_to_string(path)? {
            Some(content) if !content.trim().is_empty() => {
                serde_json::from_str::<BTreeMap<String, String>>(&content)
                    .map_err(|e| format!("failed to parse {}: {e}", path.display()))?
            }
            _ => BTreeMap::new(),
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "kv store opened");

        Ok(Self {
            path: path.to_path_buf(),
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), String> {
        let bytes = serde_json::to_vec_pretty(entries)
            .map_err(|e| format!("failed to serialize kv store: {e}"))?;
        write_file_atomic(&self.path, &bytes)
    }
}

impl KvStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock_or_recover().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        let mut entries = self.entries.lock_or_recover();
        let previous = entries.insert(key.to_string(), value.to_string());
        if let Err(err) = self.persist(&entries) {
            match previous {
                Some(previous) => entries.insert(key.to_string(), previous),
                None => entries.remove(key),
            };
            return Err(err);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        let mut entries = self.entries.lock_or_recover();
        let Some(previous) = entries.remove(key) else {
            return Ok(());
        };
        if let Err(err) = self.persist(&entries) {
            entries.insert(key.to_string(), previous);
            return Err(err);
        }
        Ok(())
    }
}

/// Non-persistent store with the same contract; state is lost on exit.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock_or_recover().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        self.entries
            .lock_or_recover()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        self.entries.lock_or_recover().remove(key);
        Ok(())
    }
}
