//! Compile command

use colored::Colorize;
use mapping_core::{BatchRunner, resolve_tenants, resolve_types};

use super::{finish, print_cleared, print_compiled, print_failures};
use crate::context::Context;
use crate::error::Result;

/// Run the compile command
///
/// Tenant and type filters are validated before anything is compiled.
pub fn run_compile(
    ctx: &Context,
    tenant_ids: &[String],
    type_selectors: &[String],
    queue: bool,
    force: bool,
) -> Result<()> {
    let types = resolve_types(type_selectors)?;
    let tenants = resolve_tenants(&ctx.tenants, tenant_ids, ctx.tenants.active())?;

    if tenants.is_empty() {
        println!("{} No active tenants to compile", "warning:".yellow().bold());
        return Ok(());
    }

    let runner = BatchRunner::new(&ctx.mapping);
    let mut failed = 0;

    if force {
        let cleared = runner.clear_all(&tenants, &types);
        print_cleared(&cleared);
        failed += print_failures(&cleared);
    }

    if queue {
        let queue = ctx.queue();
        let report = runner.dispatch_all(&queue, &tenants, &types);
        for id in &report.dispatched {
            println!("{} Queued {}", "OK".green().bold(), id.cyan());
        }
        let skipped = tenants.len() * types.len() - report.dispatched.len() - report.failures.len();
        if skipped > 0 {
            println!("{} {} task(s) already queued", "Note:".dimmed(), skipped);
        }
        failed += print_failures(&report);
    } else {
        let report = runner.compile_all(&tenants, &types);
        for pair in &report.compiled {
            print_compiled(&pair.tenant_id, pair.mapping_type.value(), &pair.document);
        }
        failed += print_failures(&report);
    }

    finish(failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapping_core::store::MemoryStore;
    use mapping_core::{MappingConfig, MappingType, Tenant};
    use mapping_test_utils::TestMappings;
    use serde_json::json;

    fn context(fixture: &TestMappings, tenants: Vec<Tenant>) -> Context {
        let mut config = MappingConfig::default();
        config.directory = fixture.directory().to_string_lossy().into_owned();
        config.queue.spool = fixture.root().join("queue").to_string_lossy().into_owned();
        config.tenancy.tenants = tenants;
        Context::new(config, Box::new(MemoryStore::new()))
    }

    #[test]
    fn test_compile_skips_inactive_tenants() {
        let fixture = TestMappings::new();
        fixture.write_tenant("settings", "acme", "mappings:\n  a: 1\n");
        fixture.write_tenant("settings", "globex", "mappings:\n  a: 2\n");
        let acme = Tenant::new("acme", "retail");
        let globex = Tenant::new("globex", "retail").with_active(false);
        let ctx = context(&fixture, vec![acme.clone(), globex.clone()]);

        run_compile(&ctx, &[], &["settings".to_string()], false, false).unwrap();

        assert_eq!(
            ctx.mapping.get(&acme, MappingType::Settings, "a").unwrap(),
            Some(json!(1))
        );
        assert_eq!(ctx.mapping.get(&globex, MappingType::Settings, "a").unwrap(), None);
    }

    #[test]
    fn test_unknown_tenant_aborts_before_compiling() {
        let fixture = TestMappings::new();
        fixture.write_tenant("settings", "acme", "mappings:\n  a: 1\n");
        let acme = Tenant::new("acme", "retail");
        let ctx = context(&fixture, vec![acme.clone()]);

        let err = run_compile(
            &ctx,
            &["acme".to_string(), "initech".to_string()],
            &["settings".to_string()],
            false,
            false,
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "Tenant [initech] not found!");
        assert_eq!(ctx.mapping.get(&acme, MappingType::Settings, "a").unwrap(), None);
    }

    #[test]
    fn test_force_clears_stale_keys() {
        let fixture = TestMappings::new();
        fixture.write_tenant("settings", "acme", "mappings:\n  a: 1\n  stale: 1\n");
        let acme = Tenant::new("acme", "retail");
        let ctx = context(&fixture, vec![acme.clone()]);
        run_compile(&ctx, &[], &["settings".to_string()], false, false).unwrap();

        fixture.write_tenant("settings", "acme", "mappings:\n  a: 2\n");
        run_compile(&ctx, &[], &["settings".to_string()], false, true).unwrap();

        let all = ctx.mapping.all(&acme, MappingType::Settings).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all["a"], json!(2));
    }

    #[test]
    fn test_queue_defers_compilation() {
        let fixture = TestMappings::new();
        fixture.write_tenant("settings", "acme", "mappings:\n  a: 1\n");
        let acme = Tenant::new("acme", "retail");
        let ctx = context(&fixture, vec![acme.clone()]);

        run_compile(&ctx, &[], &["settings".to_string()], true, false).unwrap();

        assert_eq!(ctx.mapping.get(&acme, MappingType::Settings, "a").unwrap(), None);
        assert_eq!(ctx.queue().pending().unwrap().len(), 1);
    }

    #[test]
    fn test_pair_failure_is_reported_after_siblings() {
        let fixture = TestMappings::new();
        fixture.write_tenant("settings", "acme", "mappings:\n  a: 1\n");
        let acme = Tenant::new("acme", "retail");
        let globex = Tenant::new("globex", "retail");
        let ctx = context(&fixture, vec![globex, acme.clone()]);

        let err = run_compile(&ctx, &[], &["settings".to_string()], false, false).unwrap_err();

        assert_eq!(err.to_string(), "1 mapping operation(s) failed");
        assert_eq!(
            ctx.mapping.get(&acme, MappingType::Settings, "a").unwrap(),
            Some(json!(1))
        );
    }
}
