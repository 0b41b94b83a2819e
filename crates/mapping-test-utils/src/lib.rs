//! Shared test utilities for the tenancy mapping workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`mappings`]: [`TestMappings`](mappings::TestMappings) builder for
//!   mapping source trees and config files

pub mod mappings;

pub use mappings::TestMappings;
