//! Rule-dispatch layer between the pipelines and the reference store.
//!
//! Each function resolves one field through one rule, appends a history
//! entry when the value actually changes, and returns the value the field
//! should hold afterwards. The collection probed is named by the rule
//! kind; generic kinds probe unscoped, fieldSpecific and norm kinds probe
//! scoped to the field.

use indexmap::IndexMap;

use scrub_model::{ChangeHistory, DeriveRule, LookupKind, Stage};
use scrub_store::ReferenceStore;

use crate::error::EngineError;

fn scope(kind: LookupKind, field: &str) -> Option<&str> {
    kind.field_scoped().then_some(field)
}

fn adopt(
    kind: LookupKind,
    field: &str,
    value: &str,
    matched: Option<String>,
    history: &mut ChangeHistory,
) -> String {
    match matched {
        Some(canonical) if canonical != value => {
            tracing::debug!(
                field,
                kind = kind.as_str(),
                from = value,
                to = canonical.as_str(),
                "value normalized"
            );
            history.record_change(field, Stage::Lookup(kind), value, &canonical);
            canonical
        }
        _ => value.to_string(),
    }
}

/// Resolve a field value through an exact-value collection.
pub fn value_lookup<S: ReferenceStore>(
    store: &S,
    kind: LookupKind,
    field: &str,
    value: &str,
    history: &mut ChangeHistory,
) -> Result<String, EngineError> {
    let matched = store.value_match(kind.collection(), scope(kind, field), value)?;
    Ok(adopt(kind, field, value, matched, history))
}

/// Resolve a field value through a pattern collection.
pub fn pattern_lookup<S: ReferenceStore>(
    store: &S,
    kind: LookupKind,
    field: &str,
    value: &str,
    history: &mut ChangeHistory,
) -> Result<String, EngineError> {
    let matched = store.pattern_match(kind.collection(), scope(kind, field), value)?;
    Ok(adopt(kind, field, value, matched, history))
}

/// Resolve a field value through a containment collection.
pub fn includes_lookup<S: ReferenceStore>(
    store: &S,
    kind: LookupKind,
    field: &str,
    value: &str,
    history: &mut ChangeHistory,
) -> Result<String, EngineError> {
    let matched = store.includes_match(kind.collection(), scope(kind, field), value)?;
    Ok(adopt(kind, field, value, matched, history))
}

fn adopt_derived(
    rule: &DeriveRule,
    field: &str,
    current: &str,
    matched: Option<String>,
    history: &mut ChangeHistory,
) -> String {
    match matched {
        Some(derived) => {
            if derived != current {
                tracing::debug!(
                    field,
                    kind = rule.kind.as_str(),
                    from = current,
                    to = derived.as_str(),
                    "value derived"
                );
                history.record_change(field, Stage::Derive(rule.kind), current, &derived);
            }
            derived
        }
        None if rule.blank_if_no_match && !current.is_empty() => {
            tracing::debug!(field, kind = rule.kind.as_str(), "no match, field blanked");
            history.record_change(field, Stage::Derive(rule.kind), current, "");
            String::new()
        }
        None => current.to_string(),
    }
}

/// Derive a field by exact lookup keyed by its full dependency-input map.
pub fn derive_value<S: ReferenceStore>(
    store: &S,
    field: &str,
    inputs: &IndexMap<String, String>,
    current: &str,
    rule: &DeriveRule,
    history: &mut ChangeHistory,
) -> Result<String, EngineError> {
    if !current.is_empty() && !rule.overwrite {
        return Ok(current.to_string());
    }
    let matched = store.derive_match(rule.kind.collection(), field, inputs)?;
    Ok(adopt_derived(rule, field, current, matched, history))
}

/// Copy the dependency field's value onto this field. No store access.
pub fn copy_value(
    field: &str,
    inputs: &IndexMap<String, String>,
    current: &str,
    rule: &DeriveRule,
    history: &mut ChangeHistory,
) -> String {
    if !current.is_empty() && !rule.overwrite {
        return current.to_string();
    }
    let Some(copied) = inputs.values().next() else {
        return current.to_string();
    };
    if copied != current {
        tracing::debug!(
            field,
            kind = rule.kind.as_str(),
            from = current,
            to = copied.as_str(),
            "value copied"
        );
        history.record_change(field, Stage::Derive(rule.kind), current, copied);
    }
    copied.clone()
}

/// Derive a field by pattern lookup over the dependency field's value.
pub fn derive_pattern<S: ReferenceStore>(
    store: &S,
    field: &str,
    inputs: &IndexMap<String, String>,
    current: &str,
    rule: &DeriveRule,
    history: &mut ChangeHistory,
) -> Result<String, EngineError> {
    if !current.is_empty() && !rule.overwrite {
        return Ok(current.to_string());
    }
    let Some(probe) = inputs.values().next() else {
        return Ok(current.to_string());
    };
    let matched = store.pattern_match(rule.kind.collection(), Some(field), probe)?;
    Ok(adopt_derived(rule, field, current, matched, history))
}

/// Derive a field by containment lookup over the dependency field's value.
pub fn derive_includes<S: ReferenceStore>(
    store: &S,
    field: &str,
    inputs: &IndexMap<String, String>,
    current: &str,
    rule: &DeriveRule,
    history: &mut ChangeHistory,
) -> Result<String, EngineError> {
    if !current.is_empty() && !rule.overwrite {
        return Ok(current.to_string());
    }
    let Some(probe) = inputs.values().next() else {
        return Ok(current.to_string());
    };
    let matched = store.includes_match(rule.kind.collection(), Some(field), probe)?;
    Ok(adopt_derived(rule, field, current, matched, history))
}
