//! Append-only change history with rule provenance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::vocabulary::{DeriveKind, HookPosition, LookupKind};

/// The rule stage that produced a change. `Hook` is for hook functions
/// that record changes of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    Lookup(LookupKind),
    Derive(DeriveKind),
    Hook(HookPosition),
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Lookup(kind) => kind.as_str(),
            Stage::Derive(kind) => kind.as_str(),
            Stage::Hook(position) => position.as_str(),
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded change: which field, which rule stage, old and new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    pub field: String,
    pub stage: Stage,
    pub from: String,
    pub to: String,
}

/// Accumulator for every change made during one processing session.
///
/// Entries are only appended, never reordered or removed. A history is
/// scoped to one session; callers wanting per-record isolation supply a
/// fresh empty history per record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeHistory {
    started_at: DateTime<Utc>,
    entries: Vec<ChangeEntry>,
}

impl ChangeHistory {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            entries: Vec::new(),
        }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn record(&mut self, entry: ChangeEntry) {
        self.entries.push(entry);
    }

    pub fn record_change(&mut self, field: &str, stage: Stage, from: &str, to: &str) {
        self.record(ChangeEntry {
            field: field.to_string(),
            stage,
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    pub fn entries(&self) -> &[ChangeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries for one field, in the order they were recorded.
    pub fn changes_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a ChangeEntry> {
        self.entries.iter().filter(move |entry| entry.field == field)
    }
}

impl Default for ChangeHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_append_in_order() {
        let mut history = ChangeHistory::new();
        history.record_change("color", Stage::Lookup(LookupKind::GenericLookup), "Red", "red");
        history.record_change("size", Stage::Derive(DeriveKind::CopyValue), "", "L");
        history.record_change("color", Stage::Lookup(LookupKind::NormLookup), "red", "RED");

        assert_eq!(history.len(), 3);
        let color: Vec<_> = history.changes_for("color").collect();
        assert_eq!(color.len(), 2);
        assert_eq!(color[0].to, "red");
        assert_eq!(color[1].to, "RED");
    }

    #[test]
    fn entry_serializes_with_stage_token() {
        let entry = ChangeEntry {
            field: "color".to_string(),
            stage: Stage::Lookup(LookupKind::GenericLookup),
            from: "Red".to_string(),
            to: "red".to_string(),
        };
        let json = serde_json::to_string(&entry).expect("serialize entry");
        assert!(json.contains("genericLookup"), "{json}");
        let round: ChangeEntry = serde_json::from_str(&json).expect("deserialize entry");
        assert_eq!(round, entry);
    }
}
