//! Compile and resolve mappings through an injected store
//!
//! [`Mapping`] is built once per process with a store, the type registry and
//! the tenant prefix template. Every operation takes the tenant explicitly;
//! [`Mapping::for_tenant`] returns a view whose store calls are scoped to
//! that tenant.

use std::collections::BTreeMap;

use mapping_fs::NormalizedPath;
use serde_json::Value;

use crate::config::MappingConfig;
use crate::document::MappingDocument;
use crate::flatten::FlatValue;
use crate::locator;
use crate::store::{MappingStore, TenantScopedStore, codec};
use crate::tenancy::{Tenant, TenantPrefix};
use crate::types::{MappingRegistry, MappingType};
use crate::Result;

/// Mapping compiler and resolver.
#[derive(Debug)]
pub struct Mapping<S> {
    store: S,
    registry: MappingRegistry,
    tenant_prefix: TenantPrefix,
}

impl<S: MappingStore> Mapping<S> {
    pub fn new(store: S, registry: MappingRegistry, tenant_prefix: TenantPrefix) -> Self {
        Self {
            store,
            registry,
            tenant_prefix,
        }
    }

    pub fn from_config(store: S, config: &MappingConfig) -> Self {
        Self::new(store, config.registry(), config.tenant_prefix())
    }

    pub fn registry(&self) -> &MappingRegistry {
        &self.registry
    }

    pub fn tenant_prefix(&self) -> &TenantPrefix {
        &self.tenant_prefix
    }

    /// The unscoped backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Operations scoped to one tenant.
    pub fn for_tenant<'a>(&'a self, tenant: &'a Tenant) -> TenantMappings<'a, S> {
        TenantMappings {
            tenant,
            registry: &self.registry,
            store: TenantScopedStore::new(&self.store, self.tenant_prefix.for_tenant(&tenant.id)),
        }
    }

    pub fn compile(&self, tenant: &Tenant, mapping_type: MappingType) -> Result<MappingDocument> {
        self.for_tenant(tenant).compile(mapping_type)
    }

    pub fn get(&self, tenant: &Tenant, mapping_type: MappingType, key: &str) -> Result<Option<Value>> {
        self.for_tenant(tenant).get(mapping_type, key)
    }

    pub fn all(&self, tenant: &Tenant, mapping_type: MappingType) -> Result<BTreeMap<String, Value>> {
        self.for_tenant(tenant).all(mapping_type)
    }

    pub fn clear(&self, tenant: &Tenant, mapping_type: MappingType) -> Result<usize> {
        self.for_tenant(tenant).clear(mapping_type)
    }
}

/// Mapping operations for a single tenant.
pub struct TenantMappings<'a, S> {
    tenant: &'a Tenant,
    registry: &'a MappingRegistry,
    store: TenantScopedStore<&'a S>,
}

impl<'a, S: MappingStore> TenantMappings<'a, S> {
    pub fn tenant(&self) -> &Tenant {
        self.tenant
    }

    /// Rendered tenant prefix applied to every store key.
    pub fn scope_prefix(&self) -> &str {
        self.store.prefix()
    }

    /// Compile `mapping_type` for this tenant into the store.
    ///
    /// For mergeable types the existing generic sources are written first,
    /// then the tenant source, so tenant values win. Returns the tenant-level
    /// document. Nothing is written if the tenant source cannot be resolved.
    pub fn compile(&self, mapping_type: MappingType) -> Result<MappingDocument> {
        let policy = self.registry.policy(mapping_type);
        let tenant_source = locator::resolve_tenant_source(self.tenant, &policy)?;

        for source in locator::generic_sources(self.tenant, &policy) {
            self.compile_source(mapping_type, &source)?;
        }
        let document = self.compile_source(mapping_type, &tenant_source)?;

        tracing::info!(
            tenant = %self.tenant.id,
            mapping_type = %mapping_type,
            source = %tenant_source,
            "Compiled mappings"
        );
        Ok(document)
    }

    fn compile_source(&self, mapping_type: MappingType, source: &NormalizedPath) -> Result<MappingDocument> {
        let document = MappingDocument::load(source)?;
        let entries = document.flatten()?;
        tracing::debug!(%source, entries = entries.len(), "Writing mapping source");

        for (key, value) in entries.iter() {
            self.put(mapping_type, key, value)?;
        }
        Ok(document)
    }

    /// Write one flattened entry under `{type prefix}{key}`.
    pub fn put(&self, mapping_type: MappingType, key: &str, value: &FlatValue) -> Result<()> {
        let encoded = codec::encode(value)?;
        self.store
            .set(&format!("{}{}", mapping_type.prefix(), key), &encoded)
    }

    /// Resolve one dotted key. Empty and absent values are `None`.
    pub fn get(&self, mapping_type: MappingType, key: &str) -> Result<Option<Value>> {
        let raw = self.store.get(&format!("{}{}", mapping_type.prefix(), key))?;
        Ok(codec::decode(raw.as_deref()))
    }

    /// Every compiled key for `mapping_type`, sorted by key.
    ///
    /// Empty values come back as `null`.
    pub fn all(&self, mapping_type: MappingType) -> Result<BTreeMap<String, Value>> {
        let keys = self.logical_keys(mapping_type)?;
        if keys.is_empty() {
            return Ok(BTreeMap::new());
        }

        let prefix = mapping_type.prefix();
        let values = self.store.mget(&keys)?;

        Ok(keys
            .iter()
            .zip(values)
            .map(|(key, raw)| {
                let bare = key[prefix.len()..].to_string();
                let value = codec::decode(raw.as_deref()).unwrap_or(Value::Null);
                (bare, value)
            })
            .collect())
    }

    /// Delete every compiled key for `mapping_type`, returning the count.
    pub fn clear(&self, mapping_type: MappingType) -> Result<usize> {
        let keys = self.logical_keys(mapping_type)?;
        if keys.is_empty() {
            tracing::debug!(tenant = %self.tenant.id, %mapping_type, "Nothing to clear");
            return Ok(0);
        }

        let deleted = self.store.del(&keys)?;
        tracing::info!(tenant = %self.tenant.id, %mapping_type, deleted, "Cleared mappings");
        Ok(deleted)
    }

    /// Store keys for `mapping_type` with the tenant prefix removed.
    ///
    /// The scoping layer adds the prefix back on the next call, so keys
    /// returned by `keys` must be stripped before being reused.
    fn logical_keys(&self, mapping_type: MappingType) -> Result<Vec<String>> {
        let prefix = mapping_type.prefix();
        let scope = self.store.prefix();
        let raw = self.store.keys(&format!("*{prefix}*"))?;

        Ok(raw
            .into_iter()
            .filter_map(|key| {
                let logical = match key.strip_prefix(scope) {
                    Some(rest) => rest.to_string(),
                    None => key,
                };
                if logical.starts_with(&prefix) {
                    Some(logical)
                } else {
                    tracing::debug!(key = %logical, "Skipping key outside the type namespace");
                    None
                }
            })
            .collect())
    }
}
