use thiserror::Error;

/// One rejected token in a candidate configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("field `{field}`: unknown lookup type `{token}`")]
    UnknownLookupType { field: String, token: String },

    #[error("field `{field}`, derive rule {index}: unknown derive type `{token}`")]
    UnknownDeriveType {
        field: String,
        index: usize,
        token: String,
    },

    #[error("field `{field}`, derive rule {index}: unknown derive option `{token}`")]
    UnknownDeriveOption {
        field: String,
        index: usize,
        token: String,
    },

    #[error("unknown hook position `{token}`")]
    UnknownHookPosition { token: String },
}

/// Raised only at profile construction. Carries every violation found, so
/// a malformed configuration is reported once, in full, before any record
/// is processed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid rule configuration: {}", list_violations(.0))]
    Invalid(Vec<Violation>),
}

impl ConfigError {
    pub fn violations(&self) -> &[Violation] {
        match self {
            ConfigError::Invalid(violations) => violations,
        }
    }
}

fn list_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
