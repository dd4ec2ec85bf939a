//! The reference-store contract the cleaning engine dispatches against.

use indexmap::IndexMap;

use crate::error::StoreError;

/// Read-only handle to a reference store.
///
/// Collections are named by the rule type probing them (`genericLookup`,
/// `normRegex`, `deriveValue`, ...). `field` carries the scope for
/// field-scoped collections and is `None` for the generic ones. Every
/// method answers with the matched canonical value, or `None` when the
/// store knows nothing about the probe.
///
/// Implementations are shared immutably across invocations; the engine
/// never writes through this handle.
pub trait ReferenceStore {
    /// Exact-value lookup.
    fn value_match(
        &self,
        collection: &str,
        field: Option<&str>,
        probe: &str,
    ) -> Result<Option<String>, StoreError>;

    /// Lookup against stored patterns.
    fn pattern_match(
        &self,
        collection: &str,
        field: Option<&str>,
        probe: &str,
    ) -> Result<Option<String>, StoreError>;

    /// Lookup against stored containment rules.
    fn includes_match(
        &self,
        collection: &str,
        field: Option<&str>,
        probe: &str,
    ) -> Result<Option<String>, StoreError>;

    /// Cross-field lookup keyed by the full dependency-input map of the
    /// `field` being derived.
    fn derive_match(
        &self,
        collection: &str,
        field: &str,
        inputs: &IndexMap<String, String>,
    ) -> Result<Option<String>, StoreError>;
}

impl<S: ReferenceStore + ?Sized> ReferenceStore for &S {
    fn value_match(
        &self,
        collection: &str,
        field: Option<&str>,
        probe: &str,
    ) -> Result<Option<String>, StoreError> {
        (**self).value_match(collection, field, probe)
    }

    fn pattern_match(
        &self,
        collection: &str,
        field: Option<&str>,
        probe: &str,
    ) -> Result<Option<String>, StoreError> {
        (**self).pattern_match(collection, field, probe)
    }

    fn includes_match(
        &self,
        collection: &str,
        field: Option<&str>,
        probe: &str,
    ) -> Result<Option<String>, StoreError> {
        (**self).includes_match(collection, field, probe)
    }

    fn derive_match(
        &self,
        collection: &str,
        field: &str,
        inputs: &IndexMap<String, String>,
    ) -> Result<Option<String>, StoreError> {
        (**self).derive_match(collection, field, inputs)
    }
}
