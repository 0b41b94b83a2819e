//! Source file resolution along the fallback chain
//!
//! For a tenant the lookup order is:
//! 1. `{type dir}/tenants/{tenant id}`
//! 2. `{type dir}/generics/{tenant type}` (mergeable types only)
//! 3. `{type dir}/generics/generic` (mergeable types only)
//!
//! Each base path is tried with every accepted extension in order.

use mapping_fs::NormalizedPath;

use crate::tenancy::Tenant;
use crate::types::TypePolicy;
use crate::{Error, Result};

/// Outcome of probing one extension-less base path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// First candidate that exists
    pub file: Option<NormalizedPath>,
    /// Every candidate probed, in order
    pub searched: Vec<NormalizedPath>,
}

impl SearchResult {
    pub fn found(&self) -> bool {
        self.file.is_some()
    }
}

/// Try `{base}.{ext}` for each extension, stopping at the first file found.
pub fn locate(base: &NormalizedPath, extensions: &[&str]) -> SearchResult {
    let mut searched = Vec::with_capacity(extensions.len());

    for ext in extensions {
        let candidate = base.with_appended_extension(ext);
        searched.push(candidate.clone());
        if candidate.is_file() {
            tracing::debug!(file = %candidate, "Found mapping source");
            return SearchResult {
                file: Some(candidate),
                searched,
            };
        }
    }

    tracing::debug!(base = %base, "No mapping source");
    SearchResult {
        file: None,
        searched,
    }
}

/// Resolve the source compiled last for `tenant`.
///
/// Fails with [`Error::MappingFileNotFound`] listing every candidate probed.
pub fn resolve_tenant_source(tenant: &Tenant, policy: &TypePolicy) -> Result<NormalizedPath> {
    let extensions = policy.valid_extensions();
    let mut searched = Vec::new();

    let mut bases = vec![policy.tenant_map_file(&tenant.id)];
    if policy.merge_generics() {
        bases.push(policy.generic_type_map_file(&tenant.kind));
        bases.push(policy.generic_map_file());
    }

    for base in &bases {
        let result = locate(base, extensions);
        searched.extend(result.searched);
        if let Some(file) = result.file {
            return Ok(file);
        }
    }

    Err(Error::MappingFileNotFound {
        searched: searched.iter().map(ToString::to_string).collect(),
    })
}

/// Existing generic sources that seed a mergeable type, most generic last.
///
/// Empty when the type does not merge generics. Missing files are skipped.
pub fn generic_sources(tenant: &Tenant, policy: &TypePolicy) -> Vec<NormalizedPath> {
    if !policy.merge_generics() {
        return Vec::new();
    }

    [
        policy.generic_type_map_file(&tenant.kind),
        policy.generic_map_file(),
    ]
    .iter()
    .filter_map(|base| locate(base, policy.valid_extensions()).file)
    .collect()
}
