//! Store that accepts every call and keeps nothing

use super::MappingStore;
use crate::Result;

/// Stand-in store used when no real connector is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStore;

impl MappingStore for NullStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        Ok(vec![None; keys.len()])
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Ok(())
    }

    fn keys(&self, _pattern: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn del(&self, _keys: &[String]) -> Result<usize> {
        Ok(0)
    }
}
