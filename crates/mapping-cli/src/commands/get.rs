//! Get command

use mapping_core::MappingType;

use crate::context::Context;
use crate::error::Result;

/// Print the resolved value of `key` as JSON, or `null` if absent.
pub fn run_get(ctx: &Context, tenant_id: &str, mapping_type: &str, key: &str) -> Result<()> {
    let tenant = ctx.tenants.get(tenant_id)?;
    let mapping_type: MappingType = mapping_type.parse()?;

    let value = ctx.mapping.get(tenant, mapping_type, key)?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
