//! Tests for the reference-rule loaders.

use indexmap::IndexMap;

use scrub_store::loader::{
    load_derived_rules, load_includes_rules, load_pattern_rules, load_value_rules,
};
use scrub_store::{MemoryStore, ReferenceStore, StoreError};

#[test]
fn value_rules_load_from_csv() {
    let csv = "\
collection,field,find,replace
genericLookup,,Red,red
normLookup,color,crimson,red
";
    let mut store = MemoryStore::new();
    let count = load_value_rules(&mut store, csv.as_bytes()).expect("load");
    assert_eq!(count, 2);

    let generic = store
        .value_match("genericLookup", None, "red")
        .expect("lookup");
    assert_eq!(generic.as_deref(), Some("red"));

    let scoped = store
        .value_match("normLookup", Some("color"), "Crimson")
        .expect("lookup");
    assert_eq!(scoped.as_deref(), Some("red"));
}

#[test]
fn value_rules_reject_missing_columns() {
    let csv = "collection,find\ngenericLookup,Red\n";
    let mut store = MemoryStore::new();
    let err = load_value_rules(&mut store, csv.as_bytes()).expect_err("no replace column");
    assert!(matches!(err, StoreError::Csv { .. }), "{err}");
}

#[test]
fn value_rules_reject_blank_required_cells() {
    let csv = "\
collection,field,find,replace
genericLookup,,Red,
";
    let mut store = MemoryStore::new();
    let err = load_value_rules(&mut store, csv.as_bytes()).expect_err("blank replace");
    let message = err.to_string();
    assert!(message.contains("row 2"), "{message}");
}

#[test]
fn pattern_rules_load_and_compile() {
    let csv = "\
collection,field,pattern,replace
genericRegex,,^gr[ae]y$,gray
";
    let mut store = MemoryStore::new();
    let count = load_pattern_rules(&mut store, csv.as_bytes()).expect("load");
    assert_eq!(count, 1);

    let matched = store
        .pattern_match("genericRegex", None, "grey")
        .expect("lookup");
    assert_eq!(matched.as_deref(), Some("gray"));
}

#[test]
fn pattern_rules_fail_on_invalid_expression() {
    let csv = "\
collection,field,pattern,replace
genericRegex,,(unclosed,x
";
    let mut store = MemoryStore::new();
    let err = load_pattern_rules(&mut store, csv.as_bytes()).expect_err("bad pattern");
    assert!(matches!(err, StoreError::InvalidPattern { .. }));
}

#[test]
fn includes_rules_load_with_split_tokens() {
    let csv = "\
collection,field,contains,begins,ends,replace
normIncludes,title,sales|manager,,,Sales Manager
";
    let mut store = MemoryStore::new();
    let count = load_includes_rules(&mut store, csv.as_bytes()).expect("load");
    assert_eq!(count, 1);

    let matched = store
        .includes_match("normIncludes", Some("title"), "Regional Sales Manager")
        .expect("lookup");
    assert_eq!(matched.as_deref(), Some("Sales Manager"));

    let missed = store
        .includes_match("normIncludes", Some("title"), "Sales Rep")
        .expect("lookup");
    assert_eq!(missed, None);
}

#[test]
fn derived_rules_load_from_json() {
    let json = r#"
    [
        {
            "collection": "deriveValue",
            "field": "country",
            "inputs": {"city": "auckland"},
            "value": "New Zealand"
        }
    ]
    "#;
    let mut store = MemoryStore::new();
    let count = load_derived_rules(&mut store, json.as_bytes()).expect("load");
    assert_eq!(count, 1);

    let mut inputs = IndexMap::new();
    inputs.insert("city".to_string(), "Auckland".to_string());
    let matched = store
        .derive_match("deriveValue", "country", &inputs)
        .expect("lookup");
    assert_eq!(matched.as_deref(), Some("New Zealand"));
}
