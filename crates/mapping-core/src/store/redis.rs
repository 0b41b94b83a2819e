//! Redis-backed store

use std::sync::Mutex;

use redis::{Client, Connection};

use super::MappingStore;
use crate::{Error, Result};

/// Store talking to a Redis server over one synchronous connection.
///
/// Keys are sent as-is; tenant scoping is layered on top by
/// [`TenantScopedStore`](super::TenantScopedStore).
pub struct RedisStore {
    url: String,
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore").field("url", &self.url).finish()
    }
}

impl RedisStore {
    /// Connect to the server at `url`, e.g. `redis://127.0.0.1/`.
    pub fn open(url: &str) -> Result<Self> {
        let client = Client::open(url).map_err(redis_error)?;
        let conn = client.get_connection().map_err(redis_error)?;
        tracing::debug!(url, "Connected to redis store");
        Ok(Self {
            url: url.to_string(),
            conn: Mutex::new(conn),
        })
    }

    fn query<T: redis::FromRedisValue>(&self, cmd: &redis::Cmd) -> Result<T> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| Error::store(format!("redis connection {} poisoned", self.url)))?;
        cmd.query(&mut *conn).map_err(redis_error)
    }
}

fn redis_error(e: redis::RedisError) -> Error {
    Error::store(format!("redis: {e}"))
}

impl MappingStore for RedisStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.query(redis::cmd("GET").arg(key))
    }

    fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        // MGET with no keys is a server-side error
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        self.query(redis::cmd("MGET").arg(keys))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.query(redis::cmd("SET").arg(key).arg(value))
    }

    fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.query(redis::cmd("KEYS").arg(pattern))?;
        keys.sort();
        Ok(keys)
    }

    fn del(&self, keys: &[String]) -> Result<usize> {
        if keys.is_empty() {
            return Ok(0);
        }
        self.query(redis::cmd("DEL").arg(keys))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_url_is_a_store_error() {
        let result = RedisStore::open("not-a-redis-url");
        assert!(matches!(result, Err(Error::Store { .. })));
    }
}
