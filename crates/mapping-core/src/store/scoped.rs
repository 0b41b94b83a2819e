//! Per-tenant key prefixing
//!
//! Mirrors what a prefixing store client does: the prefix is added to every
//! key sent and to every `keys` pattern, and key names returned by `keys`
//! still carry it.

use super::MappingStore;
use crate::Result;

/// A store view that prepends a fixed prefix to every key.
#[derive(Debug, Clone)]
pub struct TenantScopedStore<S> {
    inner: S,
    prefix: String,
}

impl<S: MappingStore> TenantScopedStore<S> {
    pub fn new(inner: S, prefix: impl Into<String>) -> Self {
        Self {
            inner,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    fn scoped_all(&self, keys: &[String]) -> Vec<String> {
        keys.iter().map(|k| self.scoped(k)).collect()
    }
}

impl<S: MappingStore> MappingStore for TenantScopedStore<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(&self.scoped(key))
    }

    fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        self.inner.mget(&self.scoped_all(keys))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.inner.set(&self.scoped(key), value)
    }

    fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        self.inner.keys(&self.scoped(pattern))
    }

    fn del(&self, keys: &[String]) -> Result<usize> {
        self.inner.del(&self.scoped_all(keys))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_keys_come_back_prefixed() {
        let backing = MemoryStore::new();
        let acme = TenantScopedStore::new(&backing, "tenant_acme_");
        let globex = TenantScopedStore::new(&backing, "tenant_globex_");

        acme.set("map:settings:a", "1").unwrap();
        globex.set("map:settings:a", "2").unwrap();

        assert_eq!(acme.get("map:settings:a").unwrap(), Some("1".to_string()));
        assert_eq!(
            acme.keys("*map:settings:*").unwrap(),
            vec!["tenant_acme_map:settings:a".to_string()]
        );
        assert_eq!(backing.len().unwrap(), 2);

        assert_eq!(globex.del(&["map:settings:a".to_string()]).unwrap(), 1);
        assert_eq!(backing.len().unwrap(), 1);
    }
}
