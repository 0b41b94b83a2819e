//! Property tests for flattening through a compile and listing cycle

use std::collections::BTreeMap;

use mapping_core::store::MemoryStore;
use mapping_core::{Mapping, MappingRegistry, MappingType, Tenant, TenantPrefix};
use mapping_test_utils::TestMappings;
use proptest::prelude::*;
use serde_json::{Value, json};

#[derive(Debug, Clone)]
enum Leaf {
    Int(i64),
    Text(String),
    List(Vec<i64>),
}

impl Leaf {
    fn to_json(&self) -> Value {
        match self {
            Leaf::Int(i) => json!(i),
            Leaf::Text(s) => json!(s),
            Leaf::List(items) => json!(items),
        }
    }
}

fn leaf() -> impl Strategy<Value = Leaf> {
    prop_oneof![
        any::<i64>().prop_map(Leaf::Int),
        "s[a-z]{1,7}".prop_map(Leaf::Text),
        prop::collection::vec(any::<i64>(), 1..4).prop_map(Leaf::List),
    ]
}

fn tree() -> impl Strategy<Value = BTreeMap<String, BTreeMap<String, Leaf>>> {
    prop::collection::btree_map(
        "k[a-z]{0,5}",
        prop::collection::btree_map("k[a-z]{0,5}", leaf(), 1..4),
        1..4,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn compile_then_all_reproduces_every_leaf(groups in tree()) {
        let mut mappings = serde_json::Map::new();
        let mut expected = BTreeMap::new();
        for (group, leaves) in &groups {
            let mut inner = serde_json::Map::new();
            for (name, leaf) in leaves {
                inner.insert(name.clone(), leaf.to_json());
                expected.insert(format!("{group}.{name}"), leaf.to_json());
            }
            mappings.insert(group.clone(), Value::Object(inner));
        }
        let source = serde_yaml::to_string(&json!({ "mappings": mappings })).unwrap();

        let fixture = TestMappings::new();
        fixture.write_tenant("settings", "acme", &source);
        let mapping = Mapping::new(
            MemoryStore::new(),
            MappingRegistry::new(fixture.directory(), []),
            TenantPrefix::default(),
        );
        let acme = Tenant::new("acme", "retail");

        mapping.compile(&acme, MappingType::Settings).unwrap();
        let all = mapping.all(&acme, MappingType::Settings).unwrap();

        prop_assert_eq!(all, expected);
    }
}
