//! Tests for batch runs and deferred compilation

use mapping_core::store::MemoryStore;
use mapping_core::{
    BatchRunner, CompileTask, Error, Mapping, MappingRegistry, MappingType, SpoolQueue, Tenant,
    TenantPrefix,
};
use mapping_test_utils::TestMappings;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

fn service(fixture: &TestMappings) -> Mapping<MemoryStore> {
    Mapping::new(
        MemoryStore::new(),
        MappingRegistry::new(fixture.directory(), [MappingType::Settings]),
        TenantPrefix::default(),
    )
}

#[test]
fn test_failure_does_not_abort_siblings() {
    let fixture = TestMappings::new();
    fixture.write_tenant("settings", "acme", "mappings:\n  a: 1\n");
    fixture.write_tenant("settings", "initech", "mappings:\n  a: 3\n");
    let mapping = service(&fixture);
    let acme = Tenant::new("acme", "retail");
    let globex = Tenant::new("globex", "wholesale");
    let initech = Tenant::new("initech", "retail");

    let report = BatchRunner::new(&mapping).compile_all(
        &[&acme, &globex, &initech],
        &[MappingType::Settings],
    );

    assert!(!report.is_success());
    assert_eq!(report.compiled.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].tenant_id, "globex");
    assert!(matches!(
        report.failures[0].error,
        Error::MappingFileNotFound { .. }
    ));
    assert_eq!(
        mapping.get(&initech, MappingType::Settings, "a").unwrap(),
        Some(json!(3))
    );
}

#[test]
fn test_every_failure_is_recorded() {
    let fixture = TestMappings::new();
    let mapping = service(&fixture);
    let acme = Tenant::new("acme", "retail");

    let report = BatchRunner::new(&mapping).compile_all(&[&acme], MappingType::all());

    assert_eq!(report.failures.len(), 2);
    assert_eq!(report.failures[0].mapping_type, MappingType::Descriptor);
    assert_eq!(report.failures[1].mapping_type, MappingType::Settings);
}

#[test]
fn test_clear_all_reports_counts() {
    let fixture = TestMappings::new();
    fixture.write_tenant("settings", "acme", "mappings:\n  a: 1\n  b: 2\n");
    let mapping = service(&fixture);
    let acme = Tenant::new("acme", "retail");
    mapping.compile(&acme, MappingType::Settings).unwrap();

    let report = BatchRunner::new(&mapping).clear_all(&[&acme], MappingType::all());

    assert!(report.is_success());
    assert_eq!(
        report.cleared,
        vec![
            ("acme".to_string(), MappingType::Descriptor, 0),
            ("acme".to_string(), MappingType::Settings, 2),
        ]
    );
}

#[test]
fn test_dispatch_then_drain_compiles() {
    let fixture = TestMappings::new();
    fixture.write_tenant("settings", "acme", "mappings:\n  a: 1\n");
    let spool = TempDir::new().unwrap();
    let queue = SpoolQueue::new(spool.path());
    let mapping = service(&fixture);
    let acme = Tenant::new("acme", "retail");
    let runner = BatchRunner::new(&mapping);

    let first = runner.dispatch_all(&queue, &[&acme], &[MappingType::Settings]);
    let second = runner.dispatch_all(&queue, &[&acme], &[MappingType::Settings]);

    assert_eq!(first.dispatched, vec!["acme:settings".to_string()]);
    assert!(second.dispatched.is_empty());
    assert_eq!(mapping.get(&acme, MappingType::Settings, "a").unwrap(), None);

    let drained = queue.drain(|task| task.run(&mapping).map(|_| ())).unwrap();

    assert!(drained.is_success());
    assert_eq!(drained.completed, vec!["acme:settings".to_string()]);
    assert!(queue.pending().unwrap().is_empty());
    assert_eq!(
        mapping.get(&acme, MappingType::Settings, "a").unwrap(),
        Some(json!(1))
    );
}

#[test]
fn test_task_serializes_as_plain_value() {
    let task = CompileTask::new(Tenant::new("acme", "retail"), MappingType::Descriptor);

    let value = serde_json::to_value(&task).unwrap();

    assert_eq!(
        value,
        json!({
            "tenant": {"id": "acme", "type": "retail", "active": true},
            "mapping_type": "descriptor"
        })
    );
}
