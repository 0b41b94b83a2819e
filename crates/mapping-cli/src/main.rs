//! Tenancy mapping CLI
//!
//! Compiles per-tenant mapping sources into the configured store and reads
//! them back.

mod cli;
mod commands;
mod context;
mod error;
mod interactive;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use context::Context;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| CliError::user(format!("Failed to set tracing subscriber: {e}")))?;
        tracing::debug!("Verbose mode enabled");
    }

    let Some(command) = cli.command else {
        println!("{} Tenancy mapping compiler", "mapping".green().bold());
        println!();
        println!("Run {} for available commands.", "mapping --help".cyan());
        return Ok(());
    };

    let ctx = Context::load(&cli.config, cli.connector.as_deref())?;
    execute_command(&ctx, command)
}

fn execute_command(ctx: &Context, command: Commands) -> Result<()> {
    match command {
        Commands::Compile {
            tenants,
            types,
            queue,
            force,
        } => {
            let types = interactive::type_selectors(&types)?;
            commands::run_compile(ctx, &tenants, &types, queue, force)
        }
        Commands::Clear { tenants, types } => {
            let types = interactive::type_selectors(&types)?;
            commands::run_clear(ctx, &tenants, &types)
        }
        Commands::Work => commands::run_work(ctx),
        Commands::Get {
            tenant,
            mapping_type,
            key,
        } => commands::run_get(ctx, &tenant, &mapping_type, &key),
        Commands::List {
            tenant,
            mapping_type,
            json,
        } => commands::run_list(ctx, &tenant, &mapping_type, json),
    }
}
