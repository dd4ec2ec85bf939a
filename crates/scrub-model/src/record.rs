//! The flat field→value record being cleaned.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A flat field→value map, string-valued, with the empty string meaning
/// "no value". Insertion order is preserved so pipeline iteration and the
/// resulting change history are deterministic.
///
/// Records are owned by the caller; pipelines take ownership, mutate, and
/// return them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Insert or overwrite a field value.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// True when the field is missing or holds the empty string.
    pub fn is_blank(&self, field: &str) -> bool {
        self.get(field).is_none_or(str::is_empty)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<IndexMap<String, String>> for Record {
    fn from(fields: IndexMap<String, String>) -> Self {
        Self { fields }
    }
}

impl FromIterator<(String, String)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Record {
    fn from(pairs: [(&str, &str); N]) -> Self {
        pairs
            .into_iter()
            .map(|(field, value)| (field.to_string(), value.to_string()))
            .collect()
    }
}
