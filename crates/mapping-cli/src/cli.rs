//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mapping_core::CONFIG_FILE;

/// Compile tenant configuration mappings into a key-value store
#[derive(Parser, Debug)]
#[command(name = "mapping")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the mapping configuration file
    #[arg(short, long, global = true, env = "MAPPING_CONFIG", default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Override the configured store connector (file, redis or null)
    #[arg(long, global = true, env = "MAPPING_DB_CONNECTOR")]
    pub connector: Option<String>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Compile mappings into the store
    ///
    /// Defaults to every active tenant. Without -t an interactive terminal
    /// asks which types to compile; otherwise every type is compiled.
    ///
    /// Examples:
    ///   mapping compile                  # All active tenants
    ///   mapping compile acme -t settings # One tenant, one type
    ///   mapping compile -t all --queue   # Defer to the worker
    ///   mapping compile --force          # Clear before compiling
    Compile {
        /// Tenant ids to compile
        tenants: Vec<String>,

        /// Mapping types to compile (`all` for every type)
        #[arg(short = 't', long = "type")]
        types: Vec<String>,

        /// Queue compile tasks instead of compiling now
        #[arg(short = 'Q', long)]
        queue: bool,

        /// Clear stored mappings before compiling
        #[arg(short, long)]
        force: bool,
    },

    /// Delete compiled mappings from the store
    ///
    /// Defaults to every tenant, active or not.
    Clear {
        /// Tenant ids to clear
        tenants: Vec<String>,

        /// Mapping types to clear (`all` for every type)
        #[arg(short = 't', long = "type")]
        types: Vec<String>,
    },

    /// Run every queued compile task
    Work,

    /// Print one resolved mapping value as JSON
    Get {
        /// Tenant id
        tenant: String,

        /// Mapping type
        mapping_type: String,

        /// Dotted mapping key
        key: String,
    },

    /// List every compiled mapping of a type
    List {
        /// Tenant id
        tenant: String,

        /// Mapping type
        mapping_type: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}
