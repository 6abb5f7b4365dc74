pub mod property;
pub mod updates;

pub use property::{Address, Field, FieldValue, PropertyRecord, APN_UNSET};
pub use updates::{Enrichment, ProvenanceSet, UpdateSet};
