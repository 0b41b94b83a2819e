//! Error types for mapping-core

use std::path::PathBuf;

/// Result type for mapping-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while compiling or resolving mappings
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No source file exists anywhere along the fallback chain
    #[error("Mapping files not found! Files searched:{}", bullet_list(.searched))]
    MappingFileNotFound { searched: Vec<String> },

    /// Mapping type filter is not `all` or a known type value
    #[error("Invalid mapping type `{value}`: expected `all` or one of {}", known_types())]
    InvalidType { value: String },

    /// Unknown return type requested from a settings lookup
    #[error("Invalid cast `{value}`: expected int, float, bool, string or array")]
    InvalidCast { value: String },

    /// Tenant id does not resolve in the tenant directory
    #[error("Tenant [{id}] not found!")]
    TenantNotFound { id: String },

    /// Mapping source could not be parsed
    #[error("Failed to parse mapping source {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Mapping source parsed but does not have the `{ mappings: { ... } }` shape
    #[error("Invalid mapping document {path}: {message}")]
    InvalidDocument { path: PathBuf, message: String },

    /// Key pattern could not be compiled
    #[error("Invalid key pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Key-value store failure
    #[error("Store error: {message}")]
    Store { message: String },

    /// Connector is known but this build cannot open it
    #[error("Store connector `{name}` is not available: rebuild with the `{name}` feature")]
    UnsupportedConnector { name: String },

    /// Configuration file is malformed
    #[error("Invalid configuration at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Task queue failure
    #[error("Queue error: {message}")]
    Queue { message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from mapping-fs
    #[error(transparent)]
    Fs(#[from] mapping_fs::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }
}

fn bullet_list(items: &[String]) -> String {
    items.iter().map(|item| format!("\n- {item}")).collect()
}

fn known_types() -> String {
    crate::MappingType::all()
        .iter()
        .map(|t| t.value())
        .collect::<Vec<_>>()
        .join(", ")
}
