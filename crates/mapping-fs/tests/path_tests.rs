use mapping_fs::NormalizedPath;
use proptest::prelude::*;
use rstest::rstest;

#[rstest]
#[case("mappings", "settings", "mappings/settings")]
#[case("./mappings/", "settings/generics", "./mappings/settings/generics")]
#[case("", "generic", "generic")]
#[case("C:\\maps", "tenants", "C:/maps/tenants")]
fn test_join(#[case] base: &str, #[case] segment: &str, #[case] expected: &str) {
    assert_eq!(NormalizedPath::new(base).join(segment).as_str(), expected);
}

proptest! {
    #[test]
    fn test_normalized_paths_have_no_backslashes_or_double_slashes(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        prop_assert!(!path.as_str().contains('\\'));
        prop_assert!(!path.as_str().contains("//"));

        let roundtripped = NormalizedPath::new(path.to_native());
        prop_assert_eq!(path, roundtripped);
    }

    #[test]
    fn test_appended_extension_is_a_suffix(s in "[a-z/]{1,20}", ext in "[a-z]{1,4}") {
        let path = NormalizedPath::new(&s);
        let with_ext = path.with_appended_extension(&ext);
        let expected_suffix = format!(".{}", ext);
        prop_assert!(with_ext.as_str().ends_with(&expected_suffix));
        prop_assert!(with_ext.as_str().starts_with(path.as_str()));
    }
}
