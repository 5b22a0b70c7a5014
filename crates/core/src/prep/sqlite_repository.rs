//! SQLite-backed prep record repository.

use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::repository::{PrepRecordRepository, RepositoryError};

/// Stores the record as one row of a key/value table.
pub struct SqlitePrepRepository {
    conn: Mutex<Connection>,
    key: String,
}

impl SqlitePrepRepository {
    /// Open (or create) the database file and table.
    pub fn new(path: &Path, key: impl Into<String>) -> Result<Self, RepositoryError> {
        let conn = Connection::open(path).map_err(|e| RepositoryError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            key: key.into(),
        })
    }

    /// Create an in-memory SQLite repository (useful for testing).
    pub fn in_memory(key: impl Into<String>) -> Result<Self, RepositoryError> {
        let conn =
            Connection::open_in_memory().map_err(|e| RepositoryError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            key: key.into(),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), RepositoryError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv_records (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| RepositoryError::Database(e.to_string()))
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, RepositoryError> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::Database(format!("connection lock poisoned: {}", e)))
    }
}

impl PrepRecordRepository for SqlitePrepRepository {
    fn load(&self) -> Result<Option<String>, RepositoryError> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT value FROM kv_records WHERE key = ?1",
            params![self.key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|e| RepositoryError::Database(e.to_string()))
    }

    fn save(&self, record: &str) -> Result<(), RepositoryError> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO kv_records (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![self.key, record, Utc::now().to_rfc3339()],
        )
        .map_err(|e| RepositoryError::Database(e.to_string()))?;
        Ok(())
    }
}
