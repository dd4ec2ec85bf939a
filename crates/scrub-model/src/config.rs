//! Declarative field-rule configuration and its validation.
//!
//! Configuration has two layers. The raw layer ([`FieldConfig`],
//! [`DeriveConfig`]) is what a declarative config file deserializes into:
//! plain string tokens, unchecked. Validation compiles it into the typed
//! layer ([`FieldRules`], [`DeriveRule`]) over the closed vocabulary enums;
//! the pipelines only ever see the typed layer.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Violation};
use crate::vocabulary::{DeriveKind, DeriveOption, LookupKind};

/// Untyped per-field rule declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Lookup rule tokens, in application order.
    pub lookup: Vec<String>,
    /// Derive rule declarations, in application order.
    pub derive: Vec<DeriveConfig>,
}

/// Untyped derive rule declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeriveConfig {
    #[serde(rename = "type")]
    pub kind: String,
    /// Dependency field names; the rule only runs when all are present.
    #[serde(default)]
    pub field_set: Vec<String>,
    #[serde(default)]
    pub overwrite: bool,
    #[serde(default)]
    pub blank_if_no_match: bool,
    /// Modifier tokens; `overwrite` and `blankIfNoMatch` here switch the
    /// corresponding flags on.
    #[serde(default)]
    pub options: Vec<String>,
}

/// Validated per-field rules over the closed vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRules {
    pub lookup: Vec<LookupKind>,
    pub derive: Vec<DeriveRule>,
}

/// Validated derive rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeriveRule {
    #[serde(rename = "type")]
    pub kind: DeriveKind,
    pub field_set: Vec<String>,
    pub overwrite: bool,
    pub blank_if_no_match: bool,
    pub options: Vec<DeriveOption>,
}

/// The validated field-rule map of one cleaning profile. Insertion order
/// is the derive pipeline's field order.
pub type FieldRuleMap = IndexMap<String, FieldRules>;

/// Compile a raw field-rule configuration into the typed map, failing with
/// every violation found if any token is outside the vocabulary.
pub fn compile_fields(config: &IndexMap<String, FieldConfig>) -> Result<FieldRuleMap, ConfigError> {
    let (map, violations) = collect_fields(config);
    if violations.is_empty() {
        Ok(map)
    } else {
        Err(ConfigError::Invalid(violations))
    }
}

/// Violation-collecting form of [`compile_fields`], for constructors that
/// aggregate field violations with hook-registry violations before failing.
pub fn collect_fields(
    config: &IndexMap<String, FieldConfig>,
) -> (FieldRuleMap, Vec<Violation>) {
    let mut map = FieldRuleMap::with_capacity(config.len());
    let mut violations = Vec::new();

    for (field, field_config) in config {
        let mut lookup = Vec::with_capacity(field_config.lookup.len());
        for token in &field_config.lookup {
            match LookupKind::from_token(token) {
                Some(kind) => lookup.push(kind),
                None => violations.push(Violation::UnknownLookupType {
                    field: field.clone(),
                    token: token.clone(),
                }),
            }
        }

        let mut derive = Vec::with_capacity(field_config.derive.len());
        for (index, derive_config) in field_config.derive.iter().enumerate() {
            let kind = DeriveKind::from_token(&derive_config.kind);
            if kind.is_none() {
                violations.push(Violation::UnknownDeriveType {
                    field: field.clone(),
                    index,
                    token: derive_config.kind.clone(),
                });
            }

            let mut overwrite = derive_config.overwrite;
            let mut blank_if_no_match = derive_config.blank_if_no_match;
            let mut options = Vec::new();
            for token in &derive_config.options {
                match DeriveOption::from_token(token) {
                    Some(option) => {
                        match option {
                            DeriveOption::Overwrite => overwrite = true,
                            DeriveOption::BlankIfNoMatch => blank_if_no_match = true,
                        }
                        if !options.contains(&option) {
                            options.push(option);
                        }
                    }
                    None => violations.push(Violation::UnknownDeriveOption {
                        field: field.clone(),
                        index,
                        token: token.clone(),
                    }),
                }
            }

            if let Some(kind) = kind {
                derive.push(DeriveRule {
                    kind,
                    field_set: derive_config.field_set.clone(),
                    overwrite,
                    blank_if_no_match,
                    options,
                });
            }
        }

        map.insert(field.clone(), FieldRules { lookup, derive });
    }

    (map, violations)
}
