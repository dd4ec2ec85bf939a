//! The derive pipeline.

use indexmap::IndexMap;

use scrub_model::{ChangeHistory, DeriveKind, FieldRuleMap, HookPosition, Record};
use scrub_store::ReferenceStore;

use crate::error::EngineError;
use crate::hooks::HookRegistry;
use crate::services;

/// Apply every configured derive rule, walking fields in the order the
/// rule map declares them.
///
/// A rule runs only when every dependency in its `fieldSet` is present in
/// the record (blank or not). Rules for a field run in declared order
/// until one actually changes the field's value; the first change wins
/// and the remaining rules for that field are skipped. A rule that leaves
/// the value untouched lets the next rule run.
///
/// The `beforeDerive` hook fires once, immediately before the first rule
/// that passes dependency gating; if every rule is gated out it never
/// fires.
pub fn apply_derives<S: ReferenceStore>(
    mut record: Record,
    fields: &FieldRuleMap,
    store: &S,
    hooks: &HookRegistry,
    mut history: ChangeHistory,
) -> Result<(Record, ChangeHistory), EngineError> {
    let mut reached = false;

    for (field, rules) in fields {
        for rule in &rules.derive {
            if !rule.field_set.iter().all(|dep| record.contains_field(dep)) {
                tracing::debug!(
                    field = field.as_str(),
                    kind = rule.kind.as_str(),
                    "dependency missing, rule skipped"
                );
                continue;
            }
            if !reached {
                reached = true;
                (record, history) = hooks.dispatch(HookPosition::BeforeDerive, record, history)?;
                if !rule.field_set.iter().all(|dep| record.contains_field(dep)) {
                    continue;
                }
            }

            let inputs: IndexMap<String, String> = rule
                .field_set
                .iter()
                .map(|dep| (dep.clone(), record.get(dep).unwrap_or_default().to_string()))
                .collect();
            let current = record.get(field).unwrap_or_default().to_string();

            let derived = match rule.kind {
                DeriveKind::DeriveValue => {
                    services::derive_value(store, field, &inputs, &current, rule, &mut history)?
                }
                DeriveKind::CopyValue => {
                    services::copy_value(field, &inputs, &current, rule, &mut history)
                }
                DeriveKind::DeriveRegex => {
                    services::derive_pattern(store, field, &inputs, &current, rule, &mut history)?
                }
                DeriveKind::DeriveIncludes => {
                    services::derive_includes(store, field, &inputs, &current, rule, &mut history)?
                }
            };

            if derived != current {
                record.set(field, derived);
                break;
            }
        }
    }

    Ok((record, history))
}
