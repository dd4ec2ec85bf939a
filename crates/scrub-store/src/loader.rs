//! Loaders for reference-rule files.
//!
//! Value, pattern, and includes rules load from CSV; derived-value entries
//! load from JSON. Each loader has a reader-based form and a path-based
//! form and returns the number of rules loaded. An empty `field` cell
//! registers the rule in the generic (unscoped) part of its collection.
//!
//! Expected CSV headers:
//!
//! ```text
//! values:   collection,field,find,replace
//! patterns: collection,field,pattern,replace
//! includes: collection,field,contains,begins,ends,replace
//! ```
//!
//! `contains` is `|`-separated. Header order is irrelevant; cells are
//! trimmed.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use indexmap::IndexMap;

use crate::error::StoreError;
use crate::memory::{IncludesRule, MemoryStore};

fn header_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim_start_matches('\u{feff}') == name)
}

fn get_string(row: &csv::StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| row.get(i))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

struct RuleReader<R: Read> {
    reader: csv::Reader<R>,
    headers: csv::StringRecord,
}

impl<R: Read> RuleReader<R> {
    fn new(reader: R, required_columns: &[&str]) -> Result<Self, StoreError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);
        let headers = reader
            .headers()
            .map_err(|e| StoreError::csv(e.to_string()))?
            .clone();
        for name in required_columns {
            if header_index(&headers, name).is_none() {
                return Err(StoreError::csv(format!("missing `{name}` column")));
            }
        }
        Ok(Self { reader, headers })
    }

    fn column(&self, name: &str) -> Option<usize> {
        header_index(&self.headers, name)
    }
}

fn required(row: &csv::StringRecord, idx: Option<usize>, line: usize, name: &str)
-> Result<String, StoreError> {
    get_string(row, idx).ok_or_else(|| StoreError::csv(format!("row {line}: missing `{name}`")))
}

/// Load exact-value rules from CSV.
pub fn load_value_rules<R: Read>(store: &mut MemoryStore, reader: R) -> Result<usize, StoreError> {
    let mut rules = RuleReader::new(reader, &["collection", "find", "replace"])?;
    let idx_collection = rules.column("collection");
    let idx_field = rules.column("field");
    let idx_find = rules.column("find");
    let idx_replace = rules.column("replace");

    let mut count = 0;
    for (line, row) in rules.reader.records().enumerate() {
        let row = row.map_err(|e| StoreError::csv(e.to_string()))?;
        let collection = required(&row, idx_collection, line + 2, "collection")?;
        let field = get_string(&row, idx_field);
        let find = required(&row, idx_find, line + 2, "find")?;
        let replace = required(&row, idx_replace, line + 2, "replace")?;
        store.insert_value(&collection, field.as_deref(), &find, &replace);
        count += 1;
    }
    tracing::debug!(count, "loaded value rules");
    Ok(count)
}

/// Load exact-value rules from a CSV file.
pub fn load_value_rules_from_path(
    store: &mut MemoryStore,
    path: &Path,
) -> Result<usize, StoreError> {
    let file = File::open(path).map_err(|e| StoreError::io(path, e))?;
    load_value_rules(store, file)
}

/// Load pattern rules from CSV. Patterns compile case-insensitive; an
/// invalid expression fails the whole load.
pub fn load_pattern_rules<R: Read>(
    store: &mut MemoryStore,
    reader: R,
) -> Result<usize, StoreError> {
    let mut rules = RuleReader::new(reader, &["collection", "pattern", "replace"])?;
    let idx_collection = rules.column("collection");
    let idx_field = rules.column("field");
    let idx_pattern = rules.column("pattern");
    let idx_replace = rules.column("replace");

    let mut count = 0;
    for (line, row) in rules.reader.records().enumerate() {
        let row = row.map_err(|e| StoreError::csv(e.to_string()))?;
        let collection = required(&row, idx_collection, line + 2, "collection")?;
        let field = get_string(&row, idx_field);
        let pattern = required(&row, idx_pattern, line + 2, "pattern")?;
        let replace = required(&row, idx_replace, line + 2, "replace")?;
        store.insert_pattern(&collection, field.as_deref(), &pattern, &replace)?;
        count += 1;
    }
    tracing::debug!(count, "loaded pattern rules");
    Ok(count)
}

/// Load pattern rules from a CSV file.
pub fn load_pattern_rules_from_path(
    store: &mut MemoryStore,
    path: &Path,
) -> Result<usize, StoreError> {
    let file = File::open(path).map_err(|e| StoreError::io(path, e))?;
    load_pattern_rules(store, file)
}

/// Load containment rules from CSV.
pub fn load_includes_rules<R: Read>(
    store: &mut MemoryStore,
    reader: R,
) -> Result<usize, StoreError> {
    let mut rules = RuleReader::new(reader, &["collection", "replace"])?;
    let idx_collection = rules.column("collection");
    let idx_field = rules.column("field");
    let idx_contains = rules.column("contains");
    let idx_begins = rules.column("begins");
    let idx_ends = rules.column("ends");
    let idx_replace = rules.column("replace");

    let mut count = 0;
    for (line, row) in rules.reader.records().enumerate() {
        let row = row.map_err(|e| StoreError::csv(e.to_string()))?;
        let collection = required(&row, idx_collection, line + 2, "collection")?;
        let field = get_string(&row, idx_field);
        let contains = get_string(&row, idx_contains)
            .map(|cell| {
                cell.split('|')
                    .map(str::trim)
                    .filter(|token| !token.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        let rule = IncludesRule {
            contains,
            begins: get_string(&row, idx_begins),
            ends: get_string(&row, idx_ends),
            replace: required(&row, idx_replace, line + 2, "replace")?,
        };
        store.insert_includes(&collection, field.as_deref(), rule);
        count += 1;
    }
    tracing::debug!(count, "loaded includes rules");
    Ok(count)
}

/// Load containment rules from a CSV file.
pub fn load_includes_rules_from_path(
    store: &mut MemoryStore,
    path: &Path,
) -> Result<usize, StoreError> {
    let file = File::open(path).map_err(|e| StoreError::io(path, e))?;
    load_includes_rules(store, file)
}

#[derive(Debug, serde::Deserialize)]
struct DerivedRow {
    collection: String,
    field: String,
    inputs: IndexMap<String, String>,
    value: String,
}

/// Load derived-value entries from a JSON array of
/// `{collection, field, inputs, value}` objects.
pub fn load_derived_rules<R: Read>(
    store: &mut MemoryStore,
    reader: R,
) -> Result<usize, StoreError> {
    let rows: Vec<DerivedRow> = serde_json::from_reader(reader)?;
    let count = rows.len();
    for row in rows {
        let inputs: Vec<(&str, &str)> = row
            .inputs
            .iter()
            .map(|(field, value)| (field.as_str(), value.as_str()))
            .collect();
        store.insert_derived(&row.collection, &row.field, &inputs, &row.value);
    }
    tracing::debug!(count, "loaded derived rules");
    Ok(count)
}

/// Load derived-value entries from a JSON file.
pub fn load_derived_rules_from_path(
    store: &mut MemoryStore,
    path: &Path,
) -> Result<usize, StoreError> {
    let file = File::open(path).map_err(|e| StoreError::io(path, e))?;
    load_derived_rules(store, file)
}
