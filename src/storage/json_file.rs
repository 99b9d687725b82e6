use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use super::{KeyValueStore, Result};
use crate::utils::atomic;

/// Key-value store persisted as a single JSON object on disk.
///
/// Entries are cached in memory after [`JsonFileStore::open`]; every mutation
/// rewrites the file through a temporary sibling that is renamed into place.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Opens the store at `path`. A missing, unreadable or malformed file
    /// opens as an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match read_entries(&path) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "Ignoring unreadable session file");
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if self.entries.is_empty() {
            if self.path.exists() {
                fs::remove_file(&self.path)?;
            }
            return Ok(());
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        atomic::write_atomic(&self.path, &json)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let previous = self.entries.insert(key.to_string(), value.to_string());
        if previous.as_deref() == Some(value) && self.path.exists() {
            return Ok(());
        }
        if let Err(err) = self.flush() {
            // Roll back so the cache matches the file.
            match previous {
                Some(old) => self.entries.insert(key.to_string(), old),
                None => self.entries.remove(key),
            };
            return Err(err);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let Some(previous) = self.entries.remove(key) else {
            return Ok(());
        };
        if let Err(err) = self.flush() {
            self.entries.insert(key.to_string(), previous);
            return Err(err);
        }
        Ok(())
    }
}

fn read_entries(path: &Path) -> Result<BTreeMap<String, String>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::atomic::tmp_path;
    use tempfile::tempdir;

    #[test]
    fn values_survive_reopening() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut store = JsonFileStore::open(&path);
        store.set("prostep_current_step", "3").unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path);
        assert_eq!(
            reopened.get("prostep_current_step").unwrap().as_deref(),
            Some("3")
        );
    }

    #[test]
    fn malformed_file_opens_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        let store = JsonFileStore::open(&path);
        assert_eq!(store.get("anything").unwrap(), None);
    }

    #[test]
    fn removing_the_last_key_deletes_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let mut store = JsonFileStore::open(&path);
        store.set("a", "1").unwrap();
        assert!(path.exists());
        assert!(!tmp_path(&path).exists());
        store.remove("a").unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn failed_write_keeps_the_previous_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mut store = JsonFileStore::open(&path);
        store.set("a", "1").unwrap();
        let original = fs::read_to_string(&path).unwrap();

        fs::create_dir_all(tmp_path(&path)).unwrap();
        assert!(store.set("a", "2").is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));

        fs::remove_dir(tmp_path(&path)).unwrap();
        store.set("a", "2").unwrap();
        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.get("a").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn failed_remove_keeps_the_entry_for_a_retry() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mut store = JsonFileStore::open(&path);
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();

        fs::create_dir_all(tmp_path(&path)).unwrap();
        assert!(store.remove("a").is_err());
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));

        fs::remove_dir(tmp_path(&path)).unwrap();
        store.remove("a").unwrap();
        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.get("a").unwrap(), None);
        assert_eq!(reopened.get("b").unwrap().as_deref(), Some("2"));
    }
}
