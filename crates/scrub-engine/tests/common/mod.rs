//! Shared fixtures for the engine test suites.
#![allow(dead_code)]

use std::cell::RefCell;

use indexmap::IndexMap;

use scrub_model::{DeriveConfig, FieldConfig};
use scrub_store::{MemoryStore, ReferenceStore, StoreError};

/// Store wrapper recording every dispatch, for asserting which rules
/// actually reach the store.
#[derive(Debug, Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    calls: RefCell<Vec<String>>,
}

impl CountingStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Every dispatch so far, formatted `family:collection:probe`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn note(&self, family: &str, collection: &str, probe: &str) {
        self.calls
            .borrow_mut()
            .push(format!("{family}:{collection}:{probe}"));
    }
}

impl ReferenceStore for CountingStore {
    fn value_match(
        &self,
        collection: &str,
        field: Option<&str>,
        probe: &str,
    ) -> Result<Option<String>, StoreError> {
        self.note("value", collection, probe);
        self.inner.value_match(collection, field, probe)
    }

    fn pattern_match(
        &self,
        collection: &str,
        field: Option<&str>,
        probe: &str,
    ) -> Result<Option<String>, StoreError> {
        self.note("pattern", collection, probe);
        self.inner.pattern_match(collection, field, probe)
    }

    fn includes_match(
        &self,
        collection: &str,
        field: Option<&str>,
        probe: &str,
    ) -> Result<Option<String>, StoreError> {
        self.note("includes", collection, probe);
        self.inner.includes_match(collection, field, probe)
    }

    fn derive_match(
        &self,
        collection: &str,
        field: &str,
        inputs: &IndexMap<String, String>,
    ) -> Result<Option<String>, StoreError> {
        self.note("derive", collection, field);
        self.inner.derive_match(collection, field, inputs)
    }
}

/// Field configured with the given lookup tokens and no derive rules.
pub fn lookup_field(tokens: &[&str]) -> FieldConfig {
    FieldConfig {
        lookup: tokens.iter().map(|token| (*token).to_string()).collect(),
        derive: vec![],
    }
}

/// Field configured with the given derive rules and no lookups.
pub fn derive_field(rules: Vec<DeriveConfig>) -> FieldConfig {
    FieldConfig {
        lookup: vec![],
        derive: rules,
    }
}

/// Derive rule with default flags.
pub fn derive_rule(kind: &str, field_set: &[&str]) -> DeriveConfig {
    DeriveConfig {
        kind: kind.to_string(),
        field_set: field_set.iter().map(|dep| (*dep).to_string()).collect(),
        overwrite: false,
        blank_if_no_match: false,
        options: vec![],
    }
}

/// Single-field configuration map.
pub fn one_field(name: &str, config: FieldConfig) -> IndexMap<String, FieldConfig> {
    let mut fields = IndexMap::new();
    fields.insert(name.to_string(), config);
    fields
}
