//! In-memory reference store.
//!
//! The reference implementation of [`ReferenceStore`] and the store used
//! in tests. Matching is case-insensitive throughout: exact-value entries
//! are keyed by lowercased probe, patterns are compiled case-insensitive,
//! containment rules compare lowercased text. The canonical replacement is
//! returned exactly as stored.

use std::collections::HashMap;

use indexmap::IndexMap;
use regex::{Regex, RegexBuilder};

use crate::error::StoreError;
use crate::store::ReferenceStore;

/// (collection, field scope); `None` scope holds the generic entries.
type ScopeKey = (String, Option<String>);

#[derive(Debug)]
struct PatternEntry {
    pattern: Regex,
    replace: String,
}

/// A containment rule: matches when the probe contains every `contains`
/// token and satisfies the optional prefix/suffix constraints.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct IncludesRule {
    #[serde(default)]
    pub contains: Vec<String>,
    #[serde(default)]
    pub begins: Option<String>,
    #[serde(default)]
    pub ends: Option<String>,
    pub replace: String,
}

impl IncludesRule {
    fn matches(&self, probe: &str) -> bool {
        let probe = probe.to_lowercase();
        self.contains
            .iter()
            .all(|token| probe.contains(&token.to_lowercase()))
            && self
                .begins
                .as_ref()
                .is_none_or(|prefix| probe.starts_with(&prefix.to_lowercase()))
            && self
                .ends
                .as_ref()
                .is_none_or(|suffix| probe.ends_with(&suffix.to_lowercase()))
    }
}

#[derive(Debug)]
struct DeriveEntry {
    /// (field, lowercased value), sorted by field name.
    inputs: Vec<(String, String)>,
    value: String,
}

/// In-memory rule collections, populated programmatically or via the
/// loaders in [`crate::loader`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<ScopeKey, HashMap<String, String>>,
    patterns: HashMap<ScopeKey, Vec<PatternEntry>>,
    includes: HashMap<ScopeKey, Vec<IncludesRule>>,
    derived: HashMap<ScopeKey, Vec<DeriveEntry>>,
}

fn scope_key(collection: &str, field: Option<&str>) -> ScopeKey {
    (collection.to_string(), field.map(str::to_string))
}

fn normalized_inputs(inputs: &IndexMap<String, String>) -> Vec<(String, String)> {
    let mut normalized: Vec<(String, String)> = inputs
        .iter()
        .map(|(field, value)| (field.clone(), value.to_lowercase()))
        .collect();
    normalized.sort();
    normalized
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an exact-value entry: `find` (case-insensitive) resolves
    /// to `replace`.
    pub fn insert_value(&mut self, collection: &str, field: Option<&str>, find: &str, replace: &str) {
        self.values
            .entry(scope_key(collection, field))
            .or_default()
            .insert(find.to_lowercase(), replace.to_string());
    }

    /// Register a pattern entry. The expression is compiled
    /// case-insensitive up front; an invalid pattern fails here, not at
    /// lookup time.
    pub fn insert_pattern(
        &mut self,
        collection: &str,
        field: Option<&str>,
        pattern: &str,
        replace: &str,
    ) -> Result<(), StoreError> {
        let compiled = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| StoreError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        self.patterns
            .entry(scope_key(collection, field))
            .or_default()
            .push(PatternEntry {
                pattern: compiled,
                replace: replace.to_string(),
            });
        Ok(())
    }

    /// Register a containment rule.
    pub fn insert_includes(&mut self, collection: &str, field: Option<&str>, rule: IncludesRule) {
        self.includes
            .entry(scope_key(collection, field))
            .or_default()
            .push(rule);
    }

    /// Register a derived-value entry for `field`, keyed by the full set
    /// of dependency values (case-insensitive, order-independent).
    pub fn insert_derived(
        &mut self,
        collection: &str,
        field: &str,
        inputs: &[(&str, &str)],
        value: &str,
    ) {
        let mut normalized: Vec<(String, String)> = inputs
            .iter()
            .map(|(input_field, input_value)| {
                (input_field.to_string(), input_value.to_lowercase())
            })
            .collect();
        normalized.sort();
        self.derived
            .entry(scope_key(collection, Some(field)))
            .or_default()
            .push(DeriveEntry {
                inputs: normalized,
                value: value.to_string(),
            });
    }
}

impl ReferenceStore for MemoryStore {
    fn value_match(
        &self,
        collection: &str,
        field: Option<&str>,
        probe: &str,
    ) -> Result<Option<String>, StoreError> {
        Ok(self
            .values
            .get(&scope_key(collection, field))
            .and_then(|entries| entries.get(&probe.to_lowercase()))
            .cloned())
    }

    fn pattern_match(
        &self,
        collection: &str,
        field: Option<&str>,
        probe: &str,
    ) -> Result<Option<String>, StoreError> {
        Ok(self
            .patterns
            .get(&scope_key(collection, field))
            .and_then(|entries| {
                entries
                    .iter()
                    .find(|entry| entry.pattern.is_match(probe))
                    .map(|entry| entry.replace.clone())
            }))
    }

    fn includes_match(
        &self,
        collection: &str,
        field: Option<&str>,
        probe: &str,
    ) -> Result<Option<String>, StoreError> {
        Ok(self
            .includes
            .get(&scope_key(collection, field))
            .and_then(|rules| {
                rules
                    .iter()
                    .find(|rule| rule.matches(probe))
                    .map(|rule| rule.replace.clone())
            }))
    }

    fn derive_match(
        &self,
        collection: &str,
        field: &str,
        inputs: &IndexMap<String, String>,
    ) -> Result<Option<String>, StoreError> {
        let probe = normalized_inputs(inputs);
        Ok(self
            .derived
            .get(&scope_key(collection, Some(field)))
            .and_then(|entries| {
                entries
                    .iter()
                    .find(|entry| entry.inputs == probe)
                    .map(|entry| entry.value.clone())
            }))
    }
}
