//! Configuration loading for tenancy mappings
//!
//! Reads `mapping.toml`:
//!
//! ```toml
//! directory = "./mappings"
//! mergeable = ["settings"]
//!
//! [tenancy]
//! prefix = "tenant_%tenant%_"
//!
//! [[tenancy.tenants]]
//! id = "acme"
//! type = "school"
//!
//! [database]
//! connector = "file"
//! path = ".mapping/store.json"
//! url = "redis://127.0.0.1/"
//!
//! [queue]
//! spool = ".mapping/queue"
//! ```
//!
//! Relative paths are resolved against the directory holding the file.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use mapping_fs::{NormalizedPath, io};
use serde::{Deserialize, Serialize};

use crate::tenancy::{DEFAULT_PREFIX_TEMPLATE, Tenant, TenantDirectory, TenantPrefix};
use crate::types::{MappingRegistry, MappingType};
use crate::{Error, Result};

/// Default configuration file name.
pub const CONFIG_FILE: &str = "mapping.toml";

fn default_directory() -> String {
    "./mappings".to_string()
}

fn default_mergeable() -> Vec<MappingType> {
    vec![MappingType::Settings]
}

fn default_prefix() -> String {
    DEFAULT_PREFIX_TEMPLATE.to_string()
}

fn default_connector() -> String {
    ConnectorKind::File.to_string()
}

fn default_store_path() -> String {
    ".mapping/store.json".to_string()
}

fn default_redis_url() -> String {
    "redis://127.0.0.1/".to_string()
}

fn default_spool() -> String {
    ".mapping/queue".to_string()
}

/// Store backend selected by `database.connector`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorKind {
    /// JSON file on disk
    File,
    /// Redis server, needs the `redis` cargo feature
    Redis,
    /// Accepts every call and keeps nothing
    Null,
}

impl FromStr for ConnectorKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(ConnectorKind::File),
            "redis" => Ok(ConnectorKind::Redis),
            "null" | "none" => Ok(ConnectorKind::Null),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for ConnectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectorKind::File => write!(f, "file"),
            ConnectorKind::Redis => write!(f, "redis"),
            ConnectorKind::Null => write!(f, "null"),
        }
    }
}

/// `[tenancy]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenancyConfig {
    /// Per-tenant key prefix template
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Known tenants
    #[serde(default)]
    pub tenants: Vec<Tenant>,
}

impl Default for TenancyConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            tenants: Vec::new(),
        }
    }
}

/// `[database]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connector name, see [`ConnectorKind`]
    #[serde(default = "default_connector")]
    pub connector: String,

    /// Store file used by the `file` connector
    #[serde(default = "default_store_path")]
    pub path: String,

    /// Server used by the `redis` connector
    #[serde(default = "default_redis_url")]
    pub url: String,
}

impl DatabaseConfig {
    /// Resolve the connector, falling back to [`ConnectorKind::Null`] for unknown names.
    pub fn connector(&self) -> ConnectorKind {
        self.connector.parse().unwrap_or_else(|unknown: String| {
            tracing::warn!(connector = %unknown, "Unknown store connector, falling back to null");
            ConnectorKind::Null
        })
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            connector: default_connector(),
            path: default_store_path(),
            url: default_redis_url(),
        }
    }
}

/// `[queue]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Directory holding pending compile tasks
    #[serde(default = "default_spool")]
    pub spool: String,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            spool: default_spool(),
        }
    }
}

/// Complete mapping configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Base directory holding one sub-directory per mapping type
    #[serde(default = "default_directory")]
    pub directory: String,

    /// Types whose generic sources merge under tenant overrides
    #[serde(default = "default_mergeable")]
    pub mergeable: Vec<MappingType>,

    #[serde(default)]
    pub tenancy: TenancyConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub queue: QueueConfig,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            mergeable: default_mergeable(),
            tenancy: TenancyConfig::default(),
            database: DatabaseConfig::default(),
            queue: QueueConfig::default(),
        }
    }
}

impl MappingConfig {
    /// Parse configuration from TOML content without path rebasing.
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from `path`.
    ///
    /// A missing file yields the defaults. Relative paths in the file are
    /// rebased onto the file's directory.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let mut config = match io::read_text_if_exists(path)? {
            Some(content) => Self::parse(&content).map_err(|e| Error::Config {
                path: path.to_native(),
                message: e.to_string(),
            })?,
            None => {
                tracing::debug!(%path, "No mapping config found, using defaults");
                Self::default()
            }
        };

        if let Some(root) = path.parent() {
            config.rebase(&root);
        }
        Ok(config)
    }

    /// Resolve relative paths against `root`.
    pub fn rebase(&mut self, root: &NormalizedPath) {
        for value in [
            &mut self.directory,
            &mut self.database.path,
            &mut self.queue.spool,
        ] {
            if !Path::new(value.as_str()).is_absolute() {
                *value = root.join(value.trim_start_matches("./")).to_string();
            }
        }
    }

    pub fn registry(&self) -> MappingRegistry {
        MappingRegistry::new(self.directory.as_str(), self.mergeable.iter().copied())
    }

    pub fn tenant_directory(&self) -> TenantDirectory {
        TenantDirectory::new(self.tenancy.tenants.clone())
    }

    pub fn tenant_prefix(&self) -> TenantPrefix {
        TenantPrefix::new(self.tenancy.prefix.clone())
    }

    pub fn store_path(&self) -> NormalizedPath {
        NormalizedPath::new(&self.database.path)
    }

    pub fn spool_directory(&self) -> NormalizedPath {
        NormalizedPath::new(&self.queue.spool)
    }
}
