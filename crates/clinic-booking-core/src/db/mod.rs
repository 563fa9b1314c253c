//! Database layer for the clinic booking store.

mod appointments;
mod doctors;
mod export;
mod patients;
mod schema;
mod services;
mod specializations;

pub use export::*;
pub use schema::*;

use rusqlite::{ffi, Connection, ErrorCode};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::StoreConfig;

/// Database errors.
///
/// Constraint failures raised by SQLite are classified into the four
/// constraint variants; everything else stays a raw `Sqlite` error.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Uniqueness violation: {0}")]
    UniquenessViolation(String),

    #[error("Check constraint violation: {0}")]
    CheckConstraintViolation(String),

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("Required field missing: {0}")]
    RequiredFieldMissing(String),

    #[error("Invalid stored value: {0}")]
    InvalidValue(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database lock poisoned")]
    LockPoisoned,
}

impl DbError {
    /// True for the four constraint variants.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DbError::UniquenessViolation(_)
                | DbError::CheckConstraintViolation(_)
                | DbError::ForeignKeyViolation(_)
                | DbError::RequiredFieldMissing(_)
        )
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        match classify(&err) {
            Some(classified) => classified,
            None => DbError::Sqlite(err),
        }
    }
}

fn classify(err: &rusqlite::Error) -> Option<DbError> {
    match err {
        rusqlite::Error::SqliteFailure(failure, message)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            let detail = message.clone().unwrap_or_else(|| failure.to_string());
            match failure.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    Some(DbError::UniquenessViolation(detail))
                }
                ffi::SQLITE_CONSTRAINT_CHECK => Some(DbError::CheckConstraintViolation(detail)),
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(DbError::ForeignKeyViolation(detail)),
                ffi::SQLITE_CONSTRAINT_NOTNULL => Some(DbError::RequiredFieldMissing(detail)),
                _ => None,
            }
        }
        rusqlite::Error::FromSqlConversionFailure(column, _, cause) => Some(DbError::InvalidValue(
            format!("column {}: {}", column, cause),
        )),
        _ => None,
    }
}

/// Convert a failed write, logging constraint rejections.
pub(crate) fn rejected(op: &'static str, err: rusqlite::Error) -> DbError {
    let err = DbError::from(err);
    if err.is_constraint_violation() {
        warn!(op, error = %err, "write rejected by constraint");
    }
    err
}

pub type DbResult<T> = Result<T, DbError>;

/// Database connection wrapper.
///
/// The store is owned by the caller and passed explicitly; there is no
/// process-wide instance.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        Self::open_with_config(&StoreConfig::at_path(path))
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        Self::open_with_config(&StoreConfig::default())
    }

    /// Open according to `config`.
    pub fn open_with_config(config: &StoreConfig) -> DbResult<Self> {
        let conn = match &config.path {
            Some(path) => Connection::open(path)?,
            None => Connection::open_in_memory()?,
        };
        conn.busy_timeout(config.busy_timeout())?;

        let db = Self { conn };
        db.initialize()?;

        info!(path = ?config.path, "clinic store opened");
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Drop every table, dependents first.
    pub fn teardown(&mut self) -> DbResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(TEARDOWN)?;
        tx.commit()?;
        info!("clinic schema dropped");
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Begin a transaction.
    pub fn transaction(&mut self) -> DbResult<rusqlite::Transaction<'_>> {
        Ok(self.conn.transaction()?)
    }

    /// Row count per table, in creation order.
    pub fn table_counts(&self) -> DbResult<Vec<(&'static str, i64)>> {
        TABLES_IN_CREATION_ORDER
            .iter()
            .map(|table| {
                let count: i64 = self.conn.query_row(
                    &format!("SELECT COUNT(*) FROM {}", table),
                    [],
                    |row| row.get(0),
                )?;
                Ok((*table, count))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_schema_initialized() {
        let db = Database::open_in_memory().unwrap();

        let tables: Vec<String> = db
            .conn()
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        for table in TABLES_IN_CREATION_ORDER {
            assert!(tables.contains(&table.to_string()), "missing {}", table);
        }
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let db = Database::open_in_memory().unwrap();
        let enabled: bool = db
            .conn()
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert!(enabled);
    }

    #[test]
    fn test_foreign_keys_enabled_for_every_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            busy_timeout_ms: 10,
            ..StoreConfig::at_path(dir.path().join("clinic.db"))
        };
        let db = Database::open_with_config(&config).unwrap();
        let enabled: bool = db
            .conn()
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert!(enabled);

        let orphan = db.conn().execute(
            "INSERT INTO doctors (first_name, last_name, email, specialization_id) VALUES ('A', 'B', 'a@b.test', 99)",
            [],
        );
        assert!(matches!(orphan.map_err(DbError::from), Err(DbError::ForeignKeyViolation(_))));
    }

    #[test]
    fn test_classify_not_null() {
        let db = Database::open_in_memory().unwrap();
        let err: DbError = db
            .conn()
            .execute("INSERT INTO doctors (first_name, last_name) VALUES ('No', 'Email')", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, DbError::RequiredFieldMissing(_)), "{:?}", err);
        assert!(err.is_constraint_violation());
    }

    #[test]
    fn test_classify_non_constraint_error() {
        let db = Database::open_in_memory().unwrap();
        let err: DbError = db
            .conn()
            .execute("INSERT INTO no_such_table VALUES (1)", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, DbError::Sqlite(_)));
        assert!(!err.is_constraint_violation());
    }

    #[test]
    fn test_teardown_then_counts_fails() {
        let mut db = Database::open_in_memory().unwrap();
        let counts = db.table_counts().unwrap();
        assert_eq!(counts.len(), 5);
        assert!(counts.iter().all(|(_, n)| *n == 0));

        db.teardown().unwrap();
        assert!(db.table_counts().is_err());
    }
}
