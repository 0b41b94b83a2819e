//! Command implementations for mapping-cli

pub mod clear;
pub mod compile;
pub mod get;
pub mod list;
pub mod work;

pub use clear::run_clear;
pub use compile::run_compile;
pub use get::run_get;
pub use list::run_list;
pub use work::run_work;

use colored::Colorize;
use mapping_core::{BatchReport, MappingDocument};

use crate::error::{CliError, Result};

/// Print a compiled pair with any document metadata.
fn print_compiled(tenant_id: &str, mapping_type: &str, document: &MappingDocument) {
    println!(
        "{} Compiled {} for {}",
        "OK".green().bold(),
        mapping_type.cyan(),
        tenant_id.bold()
    );
    if let Some(name) = document.name() {
        println!("   {}", name);
    }
    if let Some(description) = document.description() {
        println!("   {}", description.dimmed());
    }
}

/// Print every failure in `report`, returning how many there were.
fn print_failures(report: &BatchReport) -> usize {
    for failure in &report.failures {
        eprintln!(
            "{} {} for {}: {}",
            "FAILED".red().bold(),
            failure.mapping_type.value().cyan(),
            failure.tenant_id.bold(),
            failure.error
        );
    }
    report.failures.len()
}

fn print_cleared(report: &BatchReport) {
    for (tenant_id, mapping_type, count) in &report.cleared {
        println!(
            "{} Cleared {} {} keys for {}",
            "OK".green().bold(),
            count,
            mapping_type.value().cyan(),
            tenant_id.bold()
        );
    }
}

/// Turn a failure count into the command's exit status.
fn finish(failed: usize) -> Result<()> {
    if failed == 0 {
        Ok(())
    } else {
        Err(CliError::user(format!("{failed} mapping operation(s) failed")))
    }
}
