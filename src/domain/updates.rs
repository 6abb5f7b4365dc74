// src/domain/updates.rs

use super::property::{Field, FieldValue};
use std::collections::BTreeMap;

pub type UpdateSet = BTreeMap<Field, FieldValue>;
pub type ProvenanceSet = BTreeMap<Field, String>;

/// Derived values for one record together with where each one came from.
///
/// The two maps are only written through [`Enrichment::insert`], so they
/// always share exactly the same key set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enrichment {
    updates: UpdateSet,
    provenance: ProvenanceSet,
}

impl Enrichment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, value: impl Into<FieldValue>, source: impl Into<String>) {
        self.updates.insert(field, value.into());
        self.provenance.insert(field, source.into());
    }

    /// Folds `other` into `self`; entries in `other` win on collision.
    pub fn merge(&mut self, other: Enrichment) {
        self.updates.extend(other.updates);
        self.provenance.extend(other.provenance);
    }

    #[cfg(test)]
    pub fn contains(&self, field: Field) -> bool {
        self.updates.contains_key(&field)
    }

    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.updates.get(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn updates(&self) -> &UpdateSet {
        &self.updates
    }

    pub fn provenance(&self) -> &ProvenanceSet {
        &self.provenance
    }

    #[cfg(test)]
    pub fn into_parts(self) -> (UpdateSet, ProvenanceSet) {
        (self.updates, self.provenance)
    }
}
