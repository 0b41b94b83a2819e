//! Runtime context shared by every command
//!
//! Loads the configuration once, opens the configured store and wires the
//! mapping service around it.

use std::path::Path;

use mapping_core::store::{self, MappingStore};
use mapping_core::{Mapping, MappingConfig, SpoolQueue, TenantDirectory};
use mapping_fs::NormalizedPath;

use crate::error::Result;

pub struct Context {
    pub config: MappingConfig,
    pub tenants: TenantDirectory,
    pub mapping: Mapping<Box<dyn MappingStore>>,
}

impl Context {
    /// Load `config_path`, applying a connector override if given.
    pub fn load(config_path: &Path, connector: Option<&str>) -> Result<Self> {
        let mut config = MappingConfig::load(&NormalizedPath::new(config_path))?;
        if let Some(connector) = connector {
            config.database.connector = connector.to_string();
        }

        let store = store::open(&config.database)?;
        tracing::debug!(
            connector = %config.database.connector(),
            directory = %config.directory,
            "Loaded mapping context"
        );
        Ok(Self::new(config, store))
    }

    pub fn new(config: MappingConfig, store: Box<dyn MappingStore>) -> Self {
        let mapping = Mapping::from_config(store, &config);
        let tenants = config.tenant_directory();
        Self {
            config,
            tenants,
            mapping,
        }
    }

    pub fn queue(&self) -> SpoolQueue {
        SpoolQueue::new(self.config.spool_directory())
    }
}
