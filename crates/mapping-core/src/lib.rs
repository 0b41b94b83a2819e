//! Tenant-scoped configuration mapping compiler
//!
//! Mapping sources are YAML documents laid out per mapping type:
//!
//! ```text
//! {directory}/{descriptors|settings}/
//!     tenants/{tenant id}.yaml
//!     generics/{tenant type}.yaml
//!     generics/generic.yaml
//! ```
//!
//! Compiling flattens a source into dotted keys and writes them into a
//! key-value store under `map:{type}:`, scoped per tenant. Reads resolve
//! single keys or whole types back out of the store.
//!
//! # Architecture
//!
//! ```text
//!                 mapping-cli
//!                      |
//!                 mapping-core
//!                      |
//!                  mapping-fs
//! ```
//!
//! # Example
//!
//! ```ignore
//! use mapping_core::{Mapping, MappingRegistry, MappingType, Tenant, TenantPrefix};
//! use mapping_core::store::MemoryStore;
//!
//! let mapping = Mapping::new(MemoryStore::new(), MappingRegistry::default(), TenantPrefix::default());
//! let acme = Tenant::new("acme", "retail");
//! mapping.compile(&acme, MappingType::Settings)?;
//! let retries = mapping.get(&acme, MappingType::Settings, "ui.retries")?;
//! ```

pub mod batch;
pub mod config;
pub mod document;
pub mod error;
pub mod flatten;
pub mod helpers;
pub mod locator;
pub mod mapping;
pub mod store;
pub mod task;
pub mod tenancy;
pub mod types;

pub use batch::{BatchReport, BatchRunner, PairFailure, resolve_tenants, resolve_types};
pub use config::{CONFIG_FILE, MappingConfig};
pub use document::MappingDocument;
pub use error::{Error, Result};
pub use flatten::{FlatMap, FlatValue, flatten_mappings};
pub use helpers::SettingsCast;
pub use mapping::{Mapping, TenantMappings};
pub use store::MappingStore;
pub use task::{CompileTask, SpoolQueue, TaskQueue};
pub use tenancy::{Tenant, TenantDirectory, TenantPrefix};
pub use types::{MappingRegistry, MappingType, TypePolicy};
