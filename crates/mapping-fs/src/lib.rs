//! Filesystem helpers for tenancy mappings
//!
//! Provides slash-normalized paths for mapping sources and locked,
//! atomic writes for file-backed stores and queue spools.

pub mod error;
pub mod io;
pub mod path;

pub use error::{Error, Result};
pub use path::NormalizedPath;
