use rusqlite::{Connection, OpenFlags};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::StoreConfig;
use crate::errors::EnrichError;

/// Handle to the record store. Holds no connection itself; every call to
/// [`Database::with_conn`] opens one, runs the closure and closes it again.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.path.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs `f` against a fresh read-only connection.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, EnrichError>
    where
        F: FnOnce(&Connection) -> Result<T, EnrichError>,
    {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        f(&conn)
        // conn dropped here
    }

    /// Read-write variant, for schema bootstrap and seeding local copies.
    pub fn with_writable_conn<F, T>(&self, f: F) -> Result<T, EnrichError>
    where
        F: FnOnce(&mut Connection) -> Result<T, EnrichError>,
    {
        let mut conn = Connection::open(&self.path)?;
        f(&mut conn)
    }
}

/// Initialize database from a SQL schema file
pub fn init_db(db: &Database, schema_path: impl AsRef<Path>) -> Result<(), EnrichError> {
    let schema_path = schema_path.as_ref();
    let schema_sql =
        fs::read_to_string(schema_path).map_err(|e| EnrichError::io(schema_path, e))?;

    db.with_writable_conn(|conn| {
        conn.execute_batch(&schema_sql)?;
        Ok(())
    })?;

    info!(schema = %schema_path.display(), "database schema applied");
    Ok(())
}

/// Creates a brand-new store from `schema_path`. Refuses to touch a file that
/// already exists, so it can never alter a real record store.
pub fn bootstrap_db(db: &Database, schema_path: impl AsRef<Path>) -> Result<(), EnrichError> {
    if db.path().exists() {
        return Err(EnrichError::Config(format!(
            "refusing to apply a schema to existing store {}",
            db.path().display()
        )));
    }
    init_db(db, schema_path)
}
