// errors.rs
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an enrichment run.
///
/// Anything local to a single record (a failed geocode, a record with nothing
/// to fill) is handled inside the pipeline and never surfaces here.
#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl EnrichError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EnrichError::Io {
            path: path.into(),
            source,
        }
    }
}
