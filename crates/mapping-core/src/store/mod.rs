//! Key-value store collaborators
//!
//! The compiler only needs five string operations from a store. Values are
//! opaque strings; structured values are JSON-encoded by [`codec`].

pub mod codec;
mod file;
mod memory;
mod null;
pub mod pattern;
#[cfg(feature = "redis")]
mod redis;
mod scoped;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use null::NullStore;
#[cfg(feature = "redis")]
pub use self::redis::RedisStore;
pub use scoped::TenantScopedStore;

use crate::config::{ConnectorKind, DatabaseConfig};
use crate::Result;

/// String key-value store.
///
/// Patterns passed to [`MappingStore::keys`] use Redis glob syntax.
pub trait MappingStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        keys.iter().map(|key| self.get(key)).collect()
    }

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn keys(&self, pattern: &str) -> Result<Vec<String>>;

    /// Delete `keys`, returning how many existed.
    fn del(&self, keys: &[String]) -> Result<usize>;
}

impl<S: MappingStore + ?Sized> MappingStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        (**self).mget(keys)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        (**self).keys(pattern)
    }

    fn del(&self, keys: &[String]) -> Result<usize> {
        (**self).del(keys)
    }
}

impl<S: MappingStore + ?Sized> MappingStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        (**self).mget(keys)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        (**self).keys(pattern)
    }

    fn del(&self, keys: &[String]) -> Result<usize> {
        (**self).del(keys)
    }
}

/// Open the store selected by `database.connector`.
pub fn open(database: &DatabaseConfig) -> Result<Box<dyn MappingStore>> {
    match database.connector() {
        ConnectorKind::File => {
            let store = FileStore::open(mapping_fs::NormalizedPath::new(&database.path))?;
            Ok(Box::new(store))
        }
        #[cfg(feature = "redis")]
        ConnectorKind::Redis => Ok(Box::new(RedisStore::open(&database.url)?)),
        #[cfg(not(feature = "redis"))]
        ConnectorKind::Redis => Err(crate::Error::UnsupportedConnector {
            name: ConnectorKind::Redis.to_string(),
        }),
        ConnectorKind::Null => Ok(Box::new(NullStore)),
    }
}
