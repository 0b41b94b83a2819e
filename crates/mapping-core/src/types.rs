//! Mapping type registry
//!
//! The set of mapping categories is closed. Each [`MappingType`] derives its
//! storage prefix and directory names from its string value; the parts that
//! come from configuration (base directory and whether generics merge) are
//! bound in a [`TypePolicy`] handed out by the [`MappingRegistry`].

use std::fmt;
use std::str::FromStr;

use mapping_fs::NormalizedPath;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Directory under a type directory that holds generic fallbacks.
pub const GENERIC_DIRECTORY: &str = "generics";

/// Directory under a type directory that holds per-tenant sources.
pub const TENANT_DIRECTORY: &str = "tenants";

/// File stem of the fully generic source.
pub const GENERIC_FILE: &str = "generic";

/// Accepted source extensions, tried in order.
const VALID_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Category of compiled mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingType {
    /// Human-facing labels and descriptions
    Descriptor,
    /// Behavioural settings
    Settings,
}

impl MappingType {
    /// Every mapping type in declaration order.
    pub fn all() -> &'static [MappingType] {
        &[MappingType::Descriptor, MappingType::Settings]
    }

    /// String identifier used in storage keys, paths and the CLI.
    pub fn value(&self) -> &'static str {
        match self {
            MappingType::Descriptor => "descriptor",
            MappingType::Settings => "settings",
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            MappingType::Descriptor => "Descriptor",
            MappingType::Settings => "Settings",
        }
    }

    /// Storage key prefix, `map:{value}:`.
    pub fn prefix(&self) -> String {
        format!("map:{}:", self.value())
    }

    /// Plural directory name for this type's sources.
    pub fn mapping_directory(&self) -> &'static str {
        match self {
            MappingType::Descriptor => "descriptors",
            // uncountable
            MappingType::Settings => "settings",
        }
    }

    /// Source file extensions, in lookup order.
    pub fn valid_extensions() -> &'static [&'static str] {
        VALID_EXTENSIONS
    }
}

impl FromStr for MappingType {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        MappingType::all()
            .iter()
            .copied()
            .find(|t| t.value() == s)
            .ok_or_else(|| Error::InvalidType {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for MappingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

/// A mapping type bound to its configured policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypePolicy {
    mapping_type: MappingType,
    base_directory: NormalizedPath,
    merge_generics: bool,
}

impl TypePolicy {
    pub fn mapping_type(&self) -> MappingType {
        self.mapping_type
    }

    pub fn prefix(&self) -> String {
        self.mapping_type.prefix()
    }

    /// Whether generic sources seed the store before the tenant source.
    ///
    /// Also enables the generic fallbacks when a tenant has no source of
    /// its own.
    pub fn merge_generics(&self) -> bool {
        self.merge_generics
    }

    pub fn base_directory(&self) -> &NormalizedPath {
        &self.base_directory
    }

    /// `{base}/{plural}`
    pub fn directory(&self) -> NormalizedPath {
        self.base_directory
            .join(self.mapping_type.mapping_directory())
    }

    /// `{base}/{plural}/generics/{tenant_type}` without extension
    pub fn generic_type_map_file(&self, tenant_type: &str) -> NormalizedPath {
        self.directory().join(GENERIC_DIRECTORY).join(tenant_type)
    }

    /// `{base}/{plural}/generics/generic` without extension
    pub fn generic_map_file(&self) -> NormalizedPath {
        self.directory().join(GENERIC_DIRECTORY).join(GENERIC_FILE)
    }

    /// `{base}/{plural}/tenants/{tenant_id}` without extension
    pub fn tenant_map_file(&self, tenant_id: &str) -> NormalizedPath {
        self.directory().join(TENANT_DIRECTORY).join(tenant_id)
    }

    pub fn valid_extensions(&self) -> &'static [&'static str] {
        MappingType::valid_extensions()
    }
}

/// Configured policy for every mapping type.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRegistry {
    directory: NormalizedPath,
    mergeable: Vec<MappingType>,
}

impl MappingRegistry {
    pub fn new(
        directory: impl Into<NormalizedPath>,
        mergeable: impl IntoIterator<Item = MappingType>,
    ) -> Self {
        let mut mergeable: Vec<MappingType> = mergeable.into_iter().collect();
        mergeable.sort();
        mergeable.dedup();
        Self {
            directory: directory.into(),
            mergeable,
        }
    }

    pub fn directory(&self) -> &NormalizedPath {
        &self.directory
    }

    pub fn is_mergeable(&self, mapping_type: MappingType) -> bool {
        self.mergeable.contains(&mapping_type)
    }

    pub fn policy(&self, mapping_type: MappingType) -> TypePolicy {
        TypePolicy {
            mapping_type,
            base_directory: self.directory.clone(),
            merge_generics: self.is_mergeable(mapping_type),
        }
    }
}

impl Default for MappingRegistry {
    fn default() -> Self {
        Self::new("./mappings", [MappingType::Settings])
    }
}
