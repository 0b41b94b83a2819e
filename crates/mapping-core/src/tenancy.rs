//! Tenants and tenant key scoping
//!
//! Tenants belong to the host application. The core only reads a tenant's
//! id and type, and renders the per-tenant key prefix that the scoping
//! layer puts in front of every store key.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Placeholder replaced with the tenant id in a prefix template.
pub const TENANT_PLACEHOLDER: &str = "%tenant%";

/// Default per-tenant key prefix template.
pub const DEFAULT_PREFIX_TEMPLATE: &str = "tenant_%tenant%_";

fn default_active() -> bool {
    true
}

/// A tenant as seen by the mapping compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    /// Opaque tenant identifier
    pub id: String,

    /// Tenant type, selects the tenant-type generic fallback
    #[serde(rename = "type")]
    pub kind: String,

    /// Inactive tenants are skipped by batch compiles
    #[serde(default = "default_active")]
    pub active: bool,
}

impl Tenant {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            active: true,
        }
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

/// The host's set of known tenants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantDirectory {
    tenants: Vec<Tenant>,
}

impl TenantDirectory {
    pub fn new(tenants: Vec<Tenant>) -> Self {
        Self { tenants }
    }

    pub fn find(&self, id: &str) -> Option<&Tenant> {
        self.tenants.iter().find(|t| t.id == id)
    }

    /// Look up a tenant, failing with [`Error::TenantNotFound`].
    pub fn get(&self, id: &str) -> Result<&Tenant> {
        self.find(id).ok_or_else(|| Error::TenantNotFound { id: id.to_string() })
    }

    pub fn all(&self) -> &[Tenant] {
        &self.tenants
    }

    pub fn active(&self) -> impl Iterator<Item = &Tenant> {
        self.tenants.iter().filter(|t| t.active)
    }

    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }
}

/// Per-tenant key prefix template, e.g. `tenant_%tenant%_`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantPrefix {
    template: String,
}

impl TenantPrefix {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Render the prefix for one tenant.
    pub fn for_tenant(&self, tenant_id: &str) -> String {
        self.template.replace(TENANT_PLACEHOLDER, tenant_id)
    }
}

impl Default for TenantPrefix {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX_TEMPLATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_renders_tenant_id() {
        let prefix = TenantPrefix::default();
        assert_eq!(prefix.for_tenant("acme"), "tenant_acme_");

        let custom = TenantPrefix::new("%tenant%:%tenant%|");
        assert_eq!(custom.for_tenant("7"), "7:7|");

        let fixed = TenantPrefix::new("shared:");
        assert_eq!(fixed.for_tenant("7"), "shared:");
    }

    #[test]
    fn test_directory_lookup() {
        let directory = TenantDirectory::new(vec![
            Tenant::new("acme", "school"),
            Tenant::new("globex", "office").with_active(false),
        ]);

        assert_eq!(directory.get("acme").unwrap().kind, "school");
        assert!(matches!(
            directory.get("initech"),
            Err(Error::TenantNotFound { ref id }) if id == "initech"
        ));
        let active: Vec<&str> = directory.active().map(|t| t.id.as_str()).collect();
        assert_eq!(active, vec!["acme"]);
        assert_eq!(directory.all().len(), 2);
    }

    #[test]
    fn test_tenant_deserializes_type_field() {
        let tenant: Tenant = toml::from_str("id = \"acme\"\ntype = \"school\"\n").unwrap();
        assert_eq!(tenant, Tenant::new("acme", "school"));
    }
}
