//! The immutable cleaning profile.

use indexmap::IndexMap;

use scrub_model::{
    ChangeHistory, ConfigError, FieldConfig, FieldRuleMap, HookPosition, Record, collect_fields,
};
use scrub_store::ReferenceStore;

use crate::derive::apply_derives;
use crate::error::EngineError;
use crate::hooks::{HookConfig, HookRegistry};
use crate::lookup::apply_lookups;

/// A named, validated, immutable cleaning profile: the field-rule map,
/// the hook registry, and the store handle they resolve against.
///
/// Construction is all-or-nothing; once built, the four attributes are
/// read-only and rule changes require constructing a new profile.
pub struct Profile<S> {
    name: String,
    store: S,
    fields: FieldRuleMap,
    hooks: HookRegistry,
}

impl<S: ReferenceStore> Profile<S> {
    /// Validate the candidate configuration and build the profile.
    ///
    /// Every unknown lookup type, derive type, derive option, and hook
    /// position across `fields` and `hooks` is collected into a single
    /// [`ConfigError`]; any violation aborts construction entirely, so a
    /// partially validated profile is never observable.
    pub fn new(
        name: impl Into<String>,
        store: S,
        fields: &IndexMap<String, FieldConfig>,
        hooks: HookConfig,
    ) -> Result<Self, ConfigError> {
        let (field_rules, mut violations) = collect_fields(fields);
        let (registry, hook_violations) = hooks.into_registry();
        violations.extend(hook_violations);
        if !violations.is_empty() {
            return Err(ConfigError::Invalid(violations));
        }
        Ok(Self {
            name: name.into(),
            store,
            fields: field_rules,
            hooks: registry,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn fields(&self) -> &FieldRuleMap {
        &self.fields
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    /// Clean one record: lookup pipeline, then derive pipeline, then the
    /// `afterAll` hook, threading the supplied history throughout.
    pub fn clean(
        &self,
        record: Record,
        history: ChangeHistory,
    ) -> Result<(Record, ChangeHistory), EngineError> {
        tracing::debug!(
            profile = self.name.as_str(),
            fields = record.len(),
            "cleaning record"
        );
        let (record, history) =
            apply_lookups(record, &self.fields, &self.store, &self.hooks, history)?;
        let (record, history) =
            apply_derives(record, &self.fields, &self.store, &self.hooks, history)?;
        self.hooks.dispatch(HookPosition::AfterAll, record, history)
    }

    /// Clean one record against a fresh, empty history. Every call
    /// allocates its own accumulator; histories are never shared between
    /// calls.
    pub fn clean_record(&self, record: Record) -> Result<(Record, ChangeHistory), EngineError> {
        self.clean(record, ChangeHistory::new())
    }
}

impl<S> std::fmt::Debug for Profile<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profile")
            .field("name", &self.name)
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}
