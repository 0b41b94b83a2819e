//! In-process store

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use super::MappingStore;
use super::pattern::GlobPattern;
use crate::{Error, Result};

/// Hash-map backed store.
///
/// Key enumeration order is unspecified, as with a real server.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.data.read().map_err(poisoned)?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Sorted copy of every raw key and value.
    pub fn snapshot(&self) -> Result<BTreeMap<String, String>> {
        let data = self.data.read().map_err(poisoned)?;
        Ok(data.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

fn poisoned<T>(_: T) -> Error {
    Error::store("memory store lock poisoned")
}

impl MappingStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let data = self.data.read().map_err(poisoned)?;
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut data = self.data.write().map_err(poisoned)?;
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let glob = GlobPattern::new(pattern)?;
        let data = self.data.read().map_err(poisoned)?;
        Ok(data.keys().filter(|k| glob.matches(k)).cloned().collect())
    }

    fn del(&self, keys: &[String]) -> Result<usize> {
        let mut data = self.data.write().map_err(poisoned)?;
        Ok(keys.iter().filter(|k| data.remove(k.as_str()).is_some()).count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let store = MemoryStore::new();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();

        assert_eq!(store.get("a").unwrap(), Some("1".to_string()));
        assert_eq!(store.get("z").unwrap(), None);
        assert_eq!(
            store.mget(&["b".to_string(), "z".to_string()]).unwrap(),
            vec![Some("2".to_string()), None]
        );

        let mut keys = store.keys("*").unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a", "b"]);

        assert_eq!(store.del(&["a".to_string(), "z".to_string()]).unwrap(), 1);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_poisoned_lock_is_an_error() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let poisoner = std::sync::Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.data.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(matches!(store.len(), Err(Error::Store { .. })));
        assert!(matches!(store.get("a"), Err(Error::Store { .. })));
    }
}
