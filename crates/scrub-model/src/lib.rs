//! Data model for the scrub record-cleaning engine.
//!
//! This crate defines everything the engine agrees on with its callers:
//!
//! - **vocabulary**: the closed sets of lookup types, derive types, derive
//!   options, and hook positions a profile may reference
//! - **config**: the declarative field-rule configuration and its
//!   validate-or-fail compilation into typed rules
//! - **record**: the flat field→value map being cleaned
//! - **history**: the append-only change log with rule provenance
//! - **error**: configuration-time failures

pub mod config;
pub mod error;
pub mod history;
pub mod record;
pub mod vocabulary;

pub use config::{
    DeriveConfig, DeriveRule, FieldConfig, FieldRuleMap, FieldRules, collect_fields,
    compile_fields,
};
pub use error::{ConfigError, Violation};
pub use history::{ChangeEntry, ChangeHistory, Stage};
pub use record::Record;
pub use vocabulary::{DeriveKind, DeriveOption, HookPosition, LookupFamily, LookupKind};
