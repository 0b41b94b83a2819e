//! List command

use colored::Colorize;
use mapping_core::MappingType;

use crate::context::Context;
use crate::error::Result;

/// Print every compiled key of a type for one tenant, sorted by key.
pub fn run_list(ctx: &Context, tenant_id: &str, mapping_type: &str, json: bool) -> Result<()> {
    let tenant = ctx.tenants.get(tenant_id)?;
    let mapping_type: MappingType = mapping_type.parse()?;
    let all = ctx.mapping.all(tenant, mapping_type)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&all)?);
        return Ok(());
    }

    println!(
        "{} for {}",
        format!("{} mappings", mapping_type.name()).bold(),
        tenant.id.cyan()
    );
    println!();

    if all.is_empty() {
        println!("  {}", "Nothing compiled".dimmed());
        return Ok(());
    }

    let width = all.keys().map(String::len).max().unwrap_or(0);
    for (key, value) in &all {
        println!("  {} {}", format!("{key:<width$}").green(), value);
    }
    println!();
    println!("{} {} keys", "Total:".dimmed(), all.len());

    Ok(())
}
