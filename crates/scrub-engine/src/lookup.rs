//! The lookup pipeline.

use std::collections::HashSet;

use scrub_model::{ChangeHistory, FieldRuleMap, LookupFamily, Record};
use scrub_store::ReferenceStore;

use crate::error::EngineError;
use crate::hooks::HookRegistry;
use crate::services;

/// Apply every configured lookup rule to every eligible field of one
/// record.
///
/// A field is eligible when it is present in both the record and the rule
/// map and its current value is non-blank; blank fields are skipped
/// entirely. Rules run in the order declared for the field, and each
/// result is written back immediately, so later rule types observe the
/// already-updated value. Only rule types configured for a field are ever
/// applied to it.
///
/// Each before-position hook fires lazily, once per record, immediately
/// before the first dispatch of its rule stage; a stage no eligible field
/// uses never fires its hook.
pub fn apply_lookups<S: ReferenceStore>(
    mut record: Record,
    fields: &FieldRuleMap,
    store: &S,
    hooks: &HookRegistry,
    mut history: ChangeHistory,
) -> Result<(Record, ChangeHistory), EngineError> {
    let mut reached: HashSet<_> = HashSet::new();

    let eligible: Vec<String> = record
        .field_names()
        .filter(|field| fields.contains_key(*field))
        .cloned()
        .collect();

    for field in eligible {
        let Some(rules) = fields.get(&field) else {
            continue;
        };
        for &kind in &rules.lookup {
            if record.is_blank(&field) {
                break;
            }
            let position = kind.hook_position();
            if reached.insert(position) {
                (record, history) = hooks.dispatch(position, record, history)?;
                if record.is_blank(&field) {
                    break;
                }
            }
            let value = record.get(&field).unwrap_or_default().to_string();
            let new_value = match kind.family() {
                LookupFamily::Value => {
                    services::value_lookup(store, kind, &field, &value, &mut history)?
                }
                LookupFamily::Pattern => {
                    services::pattern_lookup(store, kind, &field, &value, &mut history)?
                }
                LookupFamily::Includes => {
                    services::includes_lookup(store, kind, &field, &value, &mut history)?
                }
            };
            record.set(&field, new_value);
        }
    }

    Ok((record, history))
}
