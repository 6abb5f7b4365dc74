// src/emit/statement.rs

use crate::domain::{Field, FieldValue, ProvenanceSet, UpdateSet};
use std::fmt;

pub const TARGET_TABLE: &str = "escrows";
pub const TIMESTAMP_COLUMN: &str = "updated_at";

/// One `UPDATE` for a single escrow, kept structured until it is rendered.
///
/// Column names only ever come from [`Field`]; every value goes through
/// [`sql_literal`], and comment text is flattened to one line.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    record_id: String,
    assignments: Vec<(Field, FieldValue)>,
    provenance: ProvenanceSet,
}

/// Builds the statement for `record_id`, or `None` when there is nothing to set.
pub fn emit(
    record_id: &str,
    updates: &UpdateSet,
    provenance: &ProvenanceSet,
) -> Option<UpdateStatement> {
    if updates.is_empty() {
        return None;
    }

    Some(UpdateStatement {
        record_id: record_id.to_string(),
        assignments: updates
            .iter()
            .map(|(field, value)| (*field, value.clone()))
            .collect(),
        provenance: provenance.clone(),
    })
}

impl UpdateStatement {
    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    pub fn assignments(&self) -> &[(Field, FieldValue)] {
        &self.assignments
    }

    #[cfg(test)]
    pub fn provenance(&self) -> &ProvenanceSet {
        &self.provenance
    }

    /// Columns in the SET clause, including the modification timestamp.
    pub fn assigned_columns(&self) -> Vec<&'static str> {
        self.assignments
            .iter()
            .map(|(field, _)| field.column())
            .chain(std::iter::once(TIMESTAMP_COLUMN))
            .collect()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!("-- Property ID: {}\n", comment_text(&self.record_id)));
        out.push_str("-- Data sources:\n");
        for (field, source) in &self.provenance {
            out.push_str(&format!("--   {field}: {}\n", comment_text(source)));
        }

        let set_clauses: Vec<String> = self
            .assignments
            .iter()
            .map(|(field, value)| format!("{} = {}", field.column(), sql_literal(value)))
            .chain(std::iter::once(format!("{TIMESTAMP_COLUMN} = CURRENT_TIMESTAMP")))
            .collect();

        out.push_str(&format!("UPDATE {TARGET_TABLE}\n"));
        out.push_str(&format!("SET {}\n", set_clauses.join(",\n    ")));
        out.push_str(&format!(
            "WHERE id = {};",
            quote_text(&self.record_id)
        ));
        out
    }
}

impl fmt::Display for UpdateStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// SQL literal for a value. Text is single-quoted with embedded quotes
/// doubled; non-finite reals become `NULL`.
pub fn sql_literal(value: &FieldValue) -> String {
    match value {
        FieldValue::Integer(v) => v.to_string(),
        FieldValue::Real(v) if v.is_finite() => format!("{v:?}"),
        FieldValue::Real(_) => "NULL".to_string(),
        FieldValue::Text(v) => quote_text(v),
    }
}

fn quote_text(value: &str) -> String {
    // NUL is not representable in a PostgreSQL text literal.
    let escaped = value.replace('\0', "").replace('\'', "''");
    format!("'{escaped}'")
}

fn comment_text(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}
