//! JSON-file backed store

use std::collections::BTreeMap;

use mapping_fs::{NormalizedPath, io};

use super::MappingStore;
use super::pattern::GlobPattern;
use crate::Result;

type Entries = BTreeMap<String, String>;

/// Store persisted as one JSON object of key to string value.
///
/// Nothing is cached between calls. Every operation takes an exclusive
/// lock on a `<path>.lock` sidecar and reads the file fresh, so several
/// processes can share one store without losing each other's writes.
#[derive(Debug)]
pub struct FileStore {
    path: NormalizedPath,
    lock_path: NormalizedPath,
}

impl FileStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<NormalizedPath>) -> Result<Self> {
        let path = path.into();
        let store = Self {
            lock_path: path.with_appended_extension("lock"),
            path,
        };
        let keys = store.read_locked(|data| data.len())?;
        tracing::debug!(path = %store.path, keys, "Opened file store");
        Ok(store)
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    fn load(&self) -> Result<Entries> {
        match io::read_text_if_exists(&self.path)? {
            Some(content) if !content.trim().is_empty() => Ok(serde_json::from_str(&content)?),
            _ => Ok(Entries::new()),
        }
    }

    fn read_locked<T>(&self, read: impl FnOnce(&Entries) -> T) -> Result<T> {
        let _lock = io::lock_exclusive(&self.lock_path)?;
        let data = self.load()?;
        Ok(read(&data))
    }

    /// Re-read, apply `update` and write back, all under the sidecar lock.
    ///
    /// The file is rewritten only when `update` reports a change.
    fn update_locked<T>(&self, update: impl FnOnce(&mut Entries) -> (T, bool)) -> Result<T> {
        let _lock = io::lock_exclusive(&self.lock_path)?;
        let mut data = self.load()?;
        let (result, changed) = update(&mut data);
        if changed {
            let content = serde_json::to_string_pretty(&data)?;
            io::write_text(&self.path, &content)?;
        }
        Ok(result)
    }
}

impl MappingStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.read_locked(|data| data.get(key).cloned())
    }

    fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        self.read_locked(|data| keys.iter().map(|k| data.get(k).cloned()).collect())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update_locked(|data| {
            data.insert(key.to_string(), value.to_string());
            ((), true)
        })
    }

    fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let glob = GlobPattern::new(pattern)?;
        self.read_locked(|data| data.keys().filter(|k| glob.matches(k)).cloned().collect())
    }

    fn del(&self, keys: &[String]) -> Result<usize> {
        self.update_locked(|data| {
            let removed = keys
                .iter()
                .filter(|k| data.remove(k.as_str()).is_some())
                .count();
            (removed, removed > 0)
        })
    }
}
