use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use dashmap::DashMap;

use super::KeyValueStore;

/// Persistent store backed by a single JSON object on disk.
///
/// The whole file is read once on open and rewritten after every mutation.
#[derive(Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: Arc<DashMap<String, String>>,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let path = path.as_ref().to_path_buf();
        let entries = DashMap::new();

        if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("Could not read store file {}", path.display()))?;

            if !raw.trim().is_empty() {
                let stored: HashMap<String, String> = serde_json::from_str(&raw)
                    .with_context(|| format!("Malformed store file {}", path.display()))?;
                for (key, value) in stored {
                    entries.insert(key, value);
                }
            }
        } else if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        log::debug!("Opened store at {} ({} keys).", path.display(), entries.len());

        Ok(FileStore {
            path,
            entries: Arc::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), anyhow::Error> {
        let snapshot: BTreeMap<String, String> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        let raw = serde_json::to_string_pretty(&snapshot)?;

        fs::write(&self.path, raw)
            .with_context(|| format!("Could not write store file {}", self.path.display()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, anyhow::Error> {
        Ok(self.entries.get(key).map(|value| value.clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), anyhow::Error> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&self, key: &str) -> Result<(), anyhow::Error> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Tab-scoped store. Nothing survives a restart.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, anyhow::Error> {
        Ok(self.entries.get(key).map(|value| value.clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), anyhow::Error> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), anyhow::Error> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let store = FileStore::open(&path).unwrap();
        store.set("currentUser", "{\"name\":\"Asha\"}").unwrap();
        store.set("savedPlans", "[]").unwrap();
        store.remove("savedPlans").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("currentUser").unwrap().as_deref(),
            Some("{\"name\":\"Asha\"}")
        );
        assert_eq!(reopened.get("savedPlans").unwrap(), None);
    }

    #[test]
    fn file_store_rejects_garbage_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();

        assert!(FileStore::open(&path).is_err());
    }

    #[test]
    fn memory_store_last_write_wins() {
        let store = MemoryStore::new();
        store.set("loginMobile", "9876543210").unwrap();
        store.set("loginMobile", "9123456780").unwrap();

        assert_eq!(store.get("loginMobile").unwrap().as_deref(), Some("9123456780"));

        store.remove("loginMobile").unwrap();
        assert_eq!(store.get("loginMobile").unwrap(), None);
    }
}
