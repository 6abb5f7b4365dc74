// src/emit/artifact.rs

use super::UpdateStatement;
use crate::errors::EnrichError;
use chrono::{DateTime, Utc};
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

pub const ARTIFACT_PREFIX: &str = "property_updates_";

/// Numbered alternatives tried when the plain name is already taken.
const MAX_NAME_SUFFIX: u32 = 99;

/// `property_updates_<stamp>.sql`, or `property_updates_<stamp>_<n>.sql` for n > 0.
pub fn artifact_file_name(generated_at: DateTime<Utc>, suffix: u32) -> String {
    let stamp = generated_at.format("%Y%m%d_%H%M%S");
    match suffix {
        0 => format!("{ARTIFACT_PREFIX}{stamp}.sql"),
        n => format!("{ARTIFACT_PREFIX}{stamp}_{n}.sql"),
    }
}

/// Full script text: header, then every statement inside one transaction.
pub fn render_artifact(statements: &[UpdateStatement], generated_at: DateTime<Utc>) -> String {
    let body = statements
        .iter()
        .map(UpdateStatement::render)
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut out = String::new();
    out.push_str("-- Property Data Updates\n");
    out.push_str(&format!("-- Generated: {}\n", generated_at.to_rfc3339()));
    out.push_str("-- Source: Public records estimation (rule-based placeholders, review before applying)\n");
    out.push_str(&format!("-- Statements: {}\n\n", statements.len()));
    out.push_str("BEGIN;\n\n");
    if !body.is_empty() {
        out.push_str(&body);
        out.push_str("\n\n");
    }
    out.push_str("COMMIT;\n");
    out
}

/// Writes a new artifact into `dir`. Never overwrites an existing file; a
/// name already taken by an earlier run in the same second gets a suffix.
pub fn write_artifact(
    dir: &Path,
    statements: &[UpdateStatement],
    generated_at: DateTime<Utc>,
) -> Result<PathBuf, EnrichError> {
    let (path, mut file) = create_unique(dir, generated_at)?;

    file.write_all(render_artifact(statements, generated_at).as_bytes())
        .map_err(|e| EnrichError::io(&path, e))?;

    Ok(path)
}

fn create_unique(dir: &Path, generated_at: DateTime<Utc>) -> Result<(PathBuf, File), EnrichError> {
    let mut last = dir.join(artifact_file_name(generated_at, 0));

    for suffix in 0..=MAX_NAME_SUFFIX {
        let path = dir.join(artifact_file_name(generated_at, suffix));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => last = path,
            Err(e) => return Err(EnrichError::io(&path, e)),
        }
    }

    Err(EnrichError::io(
        last,
        std::io::Error::new(ErrorKind::AlreadyExists, "no free artifact file name"),
    ))
}
