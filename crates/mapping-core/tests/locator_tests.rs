//! Tests for source resolution along the fallback chain

use mapping_core::locator::{generic_sources, locate, resolve_tenant_source};
use mapping_core::{Error, MappingRegistry, MappingType, Tenant};
use mapping_fs::NormalizedPath;
use mapping_test_utils::TestMappings;
use pretty_assertions::assert_eq;

fn acme() -> Tenant {
    Tenant::new("acme", "retail")
}

fn searched(err: Error) -> Vec<String> {
    match err {
        Error::MappingFileNotFound { searched } => searched,
        other => panic!("Expected MappingFileNotFound, got {other:?}"),
    }
}

#[test]
fn test_locate_prefers_first_extension() {
    let fixture = TestMappings::new();
    fixture.write_file("mappings/settings/tenants/acme.yml", "mappings: {}\n");
    fixture.write_file("mappings/settings/tenants/acme.yaml", "mappings: {}\n");

    let base = NormalizedPath::new(fixture.directory()).join("settings/tenants/acme");
    let result = locate(&base, MappingType::valid_extensions());

    assert!(result.found());
    assert_eq!(result.file, Some(base.with_appended_extension("yaml")));
    assert_eq!(result.searched.len(), 1);
}

#[test]
fn test_locate_falls_through_to_yml() {
    let fixture = TestMappings::new();
    fixture.write_file("mappings/settings/tenants/acme.yml", "mappings: {}\n");

    let base = NormalizedPath::new(fixture.directory()).join("settings/tenants/acme");
    let result = locate(&base, MappingType::valid_extensions());

    assert_eq!(result.file, Some(base.with_appended_extension("yml")));
    assert_eq!(
        result.searched,
        vec![
            base.with_appended_extension("yaml"),
            base.with_appended_extension("yml"),
        ]
    );
}

#[test]
fn test_missing_everywhere_lists_every_candidate_in_order() {
    let registry = MappingRegistry::new("no-such-dir", [MappingType::Settings]);
    let policy = registry.policy(MappingType::Settings);

    let err = resolve_tenant_source(&acme(), &policy).unwrap_err();

    assert_eq!(
        searched(err),
        vec![
            "no-such-dir/settings/tenants/acme.yaml",
            "no-such-dir/settings/tenants/acme.yml",
            "no-such-dir/settings/generics/retail.yaml",
            "no-such-dir/settings/generics/retail.yml",
            "no-such-dir/settings/generics/generic.yaml",
            "no-such-dir/settings/generics/generic.yml",
        ]
    );
}

#[test]
fn test_not_found_message() {
    let registry = MappingRegistry::new("no-such-dir", []);
    let policy = registry.policy(MappingType::Descriptor);

    let err = resolve_tenant_source(&acme(), &policy).unwrap_err();

    insta::assert_snapshot!(err.to_string(), @r"
    Mapping files not found! Files searched:
    - no-such-dir/descriptors/tenants/acme.yaml
    - no-such-dir/descriptors/tenants/acme.yml
    ");
}

#[test]
fn test_falls_back_to_fully_generic() {
    let fixture = TestMappings::new();
    let generic = fixture.write_generic("settings", "mappings:\n  a: 1\n");
    let registry = MappingRegistry::new(fixture.directory(), [MappingType::Settings]);

    let source = resolve_tenant_source(&acme(), &registry.policy(MappingType::Settings)).unwrap();

    assert_eq!(source, NormalizedPath::new(generic));
}

#[test]
fn test_tenant_type_generic_beats_fully_generic() {
    let fixture = TestMappings::new();
    fixture.write_generic("settings", "mappings:\n  a: 1\n");
    let typed = fixture.write_type_generic("settings", "retail", "mappings:\n  a: 2\n");
    let registry = MappingRegistry::new(fixture.directory(), [MappingType::Settings]);

    let source = resolve_tenant_source(&acme(), &registry.policy(MappingType::Settings)).unwrap();

    assert_eq!(source, NormalizedPath::new(typed));
}

#[test]
fn test_non_mergeable_type_ignores_generics() {
    let fixture = TestMappings::new();
    fixture.write_generic("descriptors", "mappings:\n  a: 1\n");
    fixture.write_type_generic("descriptors", "retail", "mappings:\n  a: 1\n");
    let registry = MappingRegistry::new(fixture.directory(), [MappingType::Settings]);
    let policy = registry.policy(MappingType::Descriptor);

    let err = resolve_tenant_source(&acme(), &policy).unwrap_err();

    assert_eq!(searched(err).len(), 2);
    assert!(generic_sources(&acme(), &policy).is_empty());
}

#[test]
fn test_generic_sources_skip_missing_files() {
    let fixture = TestMappings::new();
    let generic = fixture.write_generic("settings", "mappings:\n  a: 1\n");
    let registry = MappingRegistry::new(fixture.directory(), [MappingType::Settings]);

    let sources = generic_sources(&acme(), &registry.policy(MappingType::Settings));

    assert_eq!(sources, vec![NormalizedPath::new(generic)]);
}
