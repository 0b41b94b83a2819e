//! Clear command

use mapping_core::{BatchRunner, resolve_tenants, resolve_types};

use super::{finish, print_cleared, print_failures};
use crate::context::Context;
use crate::error::Result;

/// Run the clear command. Defaults to every configured tenant.
pub fn run_clear(ctx: &Context, tenant_ids: &[String], type_selectors: &[String]) -> Result<()> {
    let types = resolve_types(type_selectors)?;
    let tenants = resolve_tenants(&ctx.tenants, tenant_ids, ctx.tenants.all().iter())?;

    let report = BatchRunner::new(&ctx.mapping).clear_all(&tenants, &types);
    print_cleared(&report);
    finish(print_failures(&report))
}
