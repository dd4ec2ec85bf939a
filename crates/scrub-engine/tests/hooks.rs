//! Hook dispatch tests.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{derive_field, derive_rule, lookup_field, one_field};

use scrub_engine::{EngineError, HookConfig, Profile};
use scrub_model::{ChangeEntry, HookPosition, Record, Stage};
use scrub_store::MemoryStore;

#[test]
fn before_hook_effects_are_visible_to_the_stage() {
    let mut store = MemoryStore::new();
    store.insert_value("genericLookup", None, "red", "RED");
    let config = one_field("color", lookup_field(&["genericLookup"]));
    // The raw value would miss; the hook rewrites it so the lookup hits.
    let hooks = HookConfig::new().on("beforeGenericValLookup", |mut record, history| {
        record.set("color", "red");
        Ok((record, history))
    });
    let profile = Profile::new("colors", store, &config, hooks).expect("valid");

    let (record, history) = profile
        .clean_record(Record::from([("color", "dark-ish red?")]))
        .expect("clean");

    assert_eq!(record.get("color"), Some("RED"));
    assert_eq!(history.len(), 1);
    assert_eq!(history.entries()[0].from, "red");
}

#[test]
fn hook_for_an_unreached_stage_never_fires() {
    let fired = Rc::new(RefCell::new(false));
    let seen = Rc::clone(&fired);

    let mut store = MemoryStore::new();
    store.insert_value("genericLookup", None, "Red", "red");
    let config = one_field("color", lookup_field(&["genericLookup"]));
    // No field uses fieldSpecificRegex, so this hook must stay silent.
    let hooks = HookConfig::new().on("beforeFieldSpecificRegex", move |record, history| {
        *seen.borrow_mut() = true;
        Ok((record, history))
    });
    let profile = Profile::new("colors", store, &config, hooks).expect("valid");

    profile
        .clean_record(Record::from([("color", "Red")]))
        .expect("clean");

    assert!(!*fired.borrow());
}

#[test]
fn before_hook_fires_once_per_record() {
    let count = Rc::new(RefCell::new(0usize));
    let seen = Rc::clone(&count);

    let mut store = MemoryStore::new();
    store.insert_value("genericLookup", None, "Red", "red");
    store.insert_value("genericLookup", None, "L", "large");
    let mut config = one_field("color", lookup_field(&["genericLookup"]));
    config.insert("size".to_string(), lookup_field(&["genericLookup"]));
    let hooks = HookConfig::new().on("beforeGenericValLookup", move |record, history| {
        *seen.borrow_mut() += 1;
        Ok((record, history))
    });
    let profile = Profile::new("colors", store, &config, hooks).expect("valid");

    let (record, _) = profile
        .clean_record(Record::from([("color", "Red"), ("size", "L")]))
        .expect("clean");

    // Two fields use the stage; the hook still fires once.
    assert_eq!(*count.borrow(), 1);
    assert_eq!(record.get("color"), Some("red"));
    assert_eq!(record.get("size"), Some("large"));
}

#[test]
fn after_all_fires_once_after_both_pipelines() {
    let count = Rc::new(RefCell::new(0usize));
    let seen = Rc::clone(&count);

    let mut store = MemoryStore::new();
    store.insert_value("genericLookup", None, "Red", "red");
    let mut config = one_field("color", lookup_field(&["genericLookup"]));
    config.insert(
        "shade".to_string(),
        derive_field(vec![derive_rule("copyValue", &["color"])]),
    );
    let hooks = HookConfig::new().on("afterAll", move |mut record, history| {
        *seen.borrow_mut() += 1;
        // Both pipelines have run by now.
        assert_eq!(record.get("color"), Some("red"));
        assert_eq!(record.get("shade"), Some("red"));
        record.set("audited", "yes");
        Ok((record, history))
    });
    let profile = Profile::new("colors", store, &config, hooks).expect("valid");

    let (record, _) = profile
        .clean_record(Record::from([("color", "Red"), ("shade", "")]))
        .expect("clean");

    assert_eq!(*count.borrow(), 1);
    assert_eq!(record.get("audited"), Some("yes"));
}

#[test]
fn after_all_fires_even_when_no_rule_ran() {
    let count = Rc::new(RefCell::new(0usize));
    let seen = Rc::clone(&count);

    let hooks = HookConfig::new().on("afterAll", move |record, history| {
        *seen.borrow_mut() += 1;
        Ok((record, history))
    });
    let profile =
        Profile::new("noop", MemoryStore::new(), &indexmap::IndexMap::new(), hooks).expect("valid");

    profile
        .clean_record(Record::from([("color", "Red")]))
        .expect("clean");

    assert_eq!(*count.borrow(), 1);
}

#[test]
fn before_derive_skipped_when_every_rule_is_gated() {
    let fired = Rc::new(RefCell::new(false));
    let seen = Rc::clone(&fired);

    let config = one_field("country", derive_field(vec![derive_rule("deriveValue", &["city"])]));
    let hooks = HookConfig::new().on("beforeDerive", move |record, history| {
        *seen.borrow_mut() = true;
        Ok((record, history))
    });
    let profile = Profile::new("geo", MemoryStore::new(), &config, hooks).expect("valid");

    // No "city" in the record, so the only derive rule never runs.
    profile
        .clean_record(Record::from([("country", "")]))
        .expect("clean");

    assert!(!*fired.borrow());
}

#[test]
fn hook_error_aborts_with_its_position() {
    let config = one_field("country", derive_field(vec![derive_rule("copyValue", &["city"])]));
    let hooks = HookConfig::new()
        .on("beforeDerive", |_record, _history| Err("reference data offline".into()));
    let profile = Profile::new("geo", MemoryStore::new(), &config, hooks).expect("valid");

    let err = profile
        .clean_record(Record::from([("city", "Auckland"), ("country", "")]))
        .expect_err("hook failure");

    match err {
        EngineError::Hook { position, source } => {
            assert_eq!(position, HookPosition::BeforeDerive);
            assert_eq!(source.to_string(), "reference data offline");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn hook_history_entries_are_adopted() {
    let hooks = HookConfig::new().on("afterAll", |record, mut history| {
        history.record(ChangeEntry {
            field: "color".to_string(),
            stage: Stage::Hook(HookPosition::AfterAll),
            from: "red".to_string(),
            to: "red".to_string(),
        });
        Ok((record, history))
    });
    let profile =
        Profile::new("audit", MemoryStore::new(), &indexmap::IndexMap::new(), hooks)
            .expect("valid");

    let (_, history) = profile
        .clean_record(Record::from([("color", "red")]))
        .expect("clean");

    assert_eq!(history.len(), 1);
    assert_eq!(history.entries()[0].stage, Stage::Hook(HookPosition::AfterAll));
}
