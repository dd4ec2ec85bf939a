//! The closed rule vocabulary.
//!
//! Every token a cleaning profile may reference lives here as a variant of a
//! field-less enum. Unknown tokens are rejected at profile construction, so
//! the pipelines only ever dispatch on these closed sets and adding or
//! removing a rule type is exhaustiveness-checked by the compiler.

use serde::{Deserialize, Serialize};

/// A lookup rule type, which doubles as the name of the reference-store
/// collection backing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LookupKind {
    /// Exact-value lookup against the shared, field-agnostic collection.
    GenericLookup,
    /// Pattern lookup against the shared, field-agnostic collection.
    GenericRegex,
    /// Exact-value lookup scoped to the field being cleaned.
    FieldSpecificLookup,
    /// Pattern lookup scoped to the field being cleaned.
    FieldSpecificRegex,
    /// Exact-value normalization lookup scoped to the field.
    NormLookup,
    /// Pattern normalization lookup scoped to the field.
    NormRegex,
    /// Containment normalization lookup scoped to the field.
    NormIncludes,
}

/// Which store service a lookup kind dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupFamily {
    /// Exact-value resolution against a reference collection.
    Value,
    /// Resolution against stored patterns.
    Pattern,
    /// Resolution against stored containment rules.
    Includes,
}

impl LookupKind {
    pub const ALL: [LookupKind; 7] = [
        LookupKind::GenericLookup,
        LookupKind::GenericRegex,
        LookupKind::FieldSpecificLookup,
        LookupKind::FieldSpecificRegex,
        LookupKind::NormLookup,
        LookupKind::NormRegex,
        LookupKind::NormIncludes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LookupKind::GenericLookup => "genericLookup",
            LookupKind::GenericRegex => "genericRegex",
            LookupKind::FieldSpecificLookup => "fieldSpecificLookup",
            LookupKind::FieldSpecificRegex => "fieldSpecificRegex",
            LookupKind::NormLookup => "normLookup",
            LookupKind::NormRegex => "normRegex",
            LookupKind::NormIncludes => "normIncludes",
        }
    }

    /// Parse a configuration token, returning `None` for anything outside
    /// the vocabulary.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == token)
    }

    pub fn family(&self) -> LookupFamily {
        match self {
            LookupKind::GenericLookup
            | LookupKind::FieldSpecificLookup
            | LookupKind::NormLookup => LookupFamily::Value,
            LookupKind::GenericRegex
            | LookupKind::FieldSpecificRegex
            | LookupKind::NormRegex => LookupFamily::Pattern,
            LookupKind::NormIncludes => LookupFamily::Includes,
        }
    }

    /// Name of the reference-store collection this rule type probes.
    pub fn collection(&self) -> &'static str {
        self.as_str()
    }

    /// Generic kinds probe their collection unscoped; fieldSpecific and
    /// norm kinds are scoped to the field being cleaned.
    pub fn field_scoped(&self) -> bool {
        !matches!(self, LookupKind::GenericLookup | LookupKind::GenericRegex)
    }

    /// The extension point that fires before this rule stage.
    pub fn hook_position(&self) -> HookPosition {
        match self {
            LookupKind::GenericLookup => HookPosition::BeforeGenericValLookup,
            LookupKind::GenericRegex => HookPosition::BeforeGenericValRegex,
            LookupKind::FieldSpecificLookup => HookPosition::BeforeFieldSpecificLookup,
            LookupKind::FieldSpecificRegex => HookPosition::BeforeFieldSpecificRegex,
            LookupKind::NormLookup => HookPosition::BeforeNormLookup,
            LookupKind::NormRegex => HookPosition::BeforeNormRegex,
            LookupKind::NormIncludes => HookPosition::BeforeNormIncludes,
        }
    }
}

impl std::fmt::Display for LookupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cross-field derivation rule type, which doubles as the name of the
/// reference-store collection backing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeriveKind {
    /// Value lookup keyed by the full dependency-input map.
    DeriveValue,
    /// Direct copy from the dependency field; no store access.
    CopyValue,
    /// Pattern-based derivation from the dependency value.
    DeriveRegex,
    /// Containment-based derivation from the dependency value.
    DeriveIncludes,
}

impl DeriveKind {
    pub const ALL: [DeriveKind; 4] = [
        DeriveKind::DeriveValue,
        DeriveKind::CopyValue,
        DeriveKind::DeriveRegex,
        DeriveKind::DeriveIncludes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeriveKind::DeriveValue => "deriveValue",
            DeriveKind::CopyValue => "copyValue",
            DeriveKind::DeriveRegex => "deriveRegex",
            DeriveKind::DeriveIncludes => "deriveIncludes",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == token)
    }

    /// Name of the reference-store collection this rule type probes.
    /// `copyValue` never touches the store.
    pub fn collection(&self) -> &'static str {
        self.as_str()
    }
}

impl std::fmt::Display for DeriveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A modifier token on a derive rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeriveOption {
    /// Allow replacing an existing non-blank value.
    Overwrite,
    /// Blank the field when no match is found.
    BlankIfNoMatch,
}

impl DeriveOption {
    pub const ALL: [DeriveOption; 2] = [DeriveOption::Overwrite, DeriveOption::BlankIfNoMatch];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeriveOption::Overwrite => "overwrite",
            DeriveOption::BlankIfNoMatch => "blankIfNoMatch",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|option| option.as_str() == token)
    }
}

impl std::fmt::Display for DeriveOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named extension point where a caller-supplied hook may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HookPosition {
    BeforeGenericValLookup,
    BeforeGenericValRegex,
    BeforeFieldSpecificLookup,
    BeforeFieldSpecificRegex,
    BeforeNormLookup,
    BeforeNormRegex,
    BeforeNormIncludes,
    BeforeDerive,
    /// Fires once, after lookup and derive processing complete for a record.
    AfterAll,
}

impl HookPosition {
    pub const ALL: [HookPosition; 9] = [
        HookPosition::BeforeGenericValLookup,
        HookPosition::BeforeGenericValRegex,
        HookPosition::BeforeFieldSpecificLookup,
        HookPosition::BeforeFieldSpecificRegex,
        HookPosition::BeforeNormLookup,
        HookPosition::BeforeNormRegex,
        HookPosition::BeforeNormIncludes,
        HookPosition::BeforeDerive,
        HookPosition::AfterAll,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HookPosition::BeforeGenericValLookup => "beforeGenericValLookup",
            HookPosition::BeforeGenericValRegex => "beforeGenericValRegex",
            HookPosition::BeforeFieldSpecificLookup => "beforeFieldSpecificLookup",
            HookPosition::BeforeFieldSpecificRegex => "beforeFieldSpecificRegex",
            HookPosition::BeforeNormLookup => "beforeNormLookup",
            HookPosition::BeforeNormRegex => "beforeNormRegex",
            HookPosition::BeforeNormIncludes => "beforeNormIncludes",
            HookPosition::BeforeDerive => "beforeDerive",
            HookPosition::AfterAll => "afterAll",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|position| position.as_str() == token)
    }
}

impl std::fmt::Display for HookPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
