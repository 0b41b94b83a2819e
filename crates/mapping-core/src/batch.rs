//! Compile, dispatch or clear many (tenant, type) pairs at once
//!
//! Failures are collected per pair; one bad tenant never stops the batch.

use crate::document::MappingDocument;
use crate::mapping::Mapping;
use crate::store::MappingStore;
use crate::task::{CompileTask, TaskQueue};
use crate::tenancy::{Tenant, TenantDirectory};
use crate::types::MappingType;
use crate::{Error, Result};

/// Keyword selecting every type or every tenant.
pub const ALL: &str = "all";

/// Resolve type selectors. Empty input or `all` selects every type.
///
/// Every selector is validated before `all` is expanded.
pub fn resolve_types<I, T>(selectors: I) -> Result<Vec<MappingType>>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut types = Vec::new();
    let mut select_all = false;
    for selector in selectors {
        let selector = selector.as_ref();
        if selector == ALL {
            select_all = true;
            continue;
        }
        let ty: MappingType = selector.parse()?;
        if !types.contains(&ty) {
            types.push(ty);
        }
    }

    if select_all || types.is_empty() {
        return Ok(MappingType::all().to_vec());
    }
    Ok(types)
}

/// Resolve tenant ids against `directory`.
///
/// Empty input selects `fallback`. Unknown ids fail with
/// [`Error::TenantNotFound`].
pub fn resolve_tenants<'a, I, T>(
    directory: &'a TenantDirectory,
    ids: I,
    fallback: impl Iterator<Item = &'a Tenant>,
) -> Result<Vec<&'a Tenant>>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut tenants: Vec<&Tenant> = Vec::new();
    for id in ids {
        let tenant = directory.get(id.as_ref())?;
        if !tenants.iter().any(|t| t.id == tenant.id) {
            tenants.push(tenant);
        }
    }

    if tenants.is_empty() {
        return Ok(fallback.collect());
    }
    Ok(tenants)
}

/// A pair that compiled.
#[derive(Debug)]
pub struct CompiledPair {
    pub tenant_id: String,
    pub mapping_type: MappingType,
    pub document: MappingDocument,
}

/// A pair that failed.
#[derive(Debug)]
pub struct PairFailure {
    pub tenant_id: String,
    pub mapping_type: MappingType,
    pub error: Error,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub compiled: Vec<CompiledPair>,
    /// Unique ids of tasks newly queued
    pub dispatched: Vec<String>,
    /// Cleared pairs with their deleted key count
    pub cleared: Vec<(String, MappingType, usize)>,
    pub failures: Vec<PairFailure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn fail(&mut self, tenant: &Tenant, mapping_type: MappingType, error: Error) {
        tracing::error!(tenant = %tenant.id, %mapping_type, error = %error, "Mapping operation failed");
        self.failures.push(PairFailure {
            tenant_id: tenant.id.clone(),
            mapping_type,
            error,
        });
    }
}

/// Runs operations across tenants and types.
pub struct BatchRunner<'a, S> {
    mapping: &'a Mapping<S>,
}

impl<'a, S: MappingStore> BatchRunner<'a, S> {
    pub fn new(mapping: &'a Mapping<S>) -> Self {
        Self { mapping }
    }

    /// Compile every pair synchronously.
    pub fn compile_all(&self, tenants: &[&Tenant], types: &[MappingType]) -> BatchReport {
        let mut report = BatchReport::default();
        for tenant in tenants {
            for &mapping_type in types {
                match self.mapping.compile(tenant, mapping_type) {
                    Ok(document) => report.compiled.push(CompiledPair {
                        tenant_id: tenant.id.clone(),
                        mapping_type,
                        document,
                    }),
                    Err(e) => report.fail(tenant, mapping_type, e),
                }
            }
        }
        report
    }

    /// Queue one compile task per pair.
    pub fn dispatch_all<Q: TaskQueue>(
        &self,
        queue: &Q,
        tenants: &[&Tenant],
        types: &[MappingType],
    ) -> BatchReport {
        let mut report = BatchReport::default();
        for tenant in tenants {
            for &mapping_type in types {
                let task = CompileTask::new((*tenant).clone(), mapping_type);
                match queue.dispatch(&task) {
                    Ok(true) => report.dispatched.push(task.unique_id()),
                    Ok(false) => {}
                    Err(e) => report.fail(tenant, mapping_type, e),
                }
            }
        }
        report
    }

    /// Clear every pair.
    pub fn clear_all(&self, tenants: &[&Tenant], types: &[MappingType]) -> BatchReport {
        let mut report = BatchReport::default();
        for tenant in tenants {
            for &mapping_type in types {
                match self.mapping.clear(tenant, mapping_type) {
                    Ok(count) => report.cleared.push((tenant.id.clone(), mapping_type, count)),
                    Err(e) => report.fail(tenant, mapping_type, e),
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_types() {
        assert_eq!(resolve_types(["all"]).unwrap(), MappingType::all().to_vec());
        assert_eq!(resolve_types(Vec::<String>::new()).unwrap(), MappingType::all().to_vec());
        assert_eq!(
            resolve_types(["settings", "settings"]).unwrap(),
            vec![MappingType::Settings]
        );
        assert!(matches!(
            resolve_types(["colours"]),
            Err(Error::InvalidType { .. })
        ));
    }

    #[test]
    fn test_resolve_types_validates_before_expanding_all() {
        for selectors in [["all", "bogus"], ["bogus", "all"]] {
            assert!(matches!(
                resolve_types(selectors),
                Err(Error::InvalidType { ref value }) if value == "bogus"
            ));
        }
        assert_eq!(
            resolve_types(["settings", "all"]).unwrap(),
            MappingType::all().to_vec()
        );
    }

    #[test]
    fn test_resolve_tenants() {
        let directory = TenantDirectory::new(vec![
            Tenant::new("acme", "retail"),
            Tenant::new("globex", "wholesale").with_active(false),
        ]);

        let active = resolve_tenants(&directory, Vec::<String>::new(), directory.active()).unwrap();
        assert_eq!(active.len(), 1);

        let named = resolve_tenants(&directory, ["globex"], directory.active()).unwrap();
        assert_eq!(named[0].id, "globex");

        assert!(matches!(
            resolve_tenants(&directory, ["initech"], directory.all().iter()),
            Err(Error::TenantNotFound { .. })
        ));
    }
}
