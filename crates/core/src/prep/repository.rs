//! Storage abstraction for the persisted prep item record.

use std::sync::Mutex;

use thiserror::Error;

/// Error type for record storage.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Load/save of the single persisted record.
///
/// `save` replaces the whole record; concurrent writers are last-write-wins.
pub trait PrepRecordRepository: Send + Sync {
    /// Raw record, or `None` if nothing was ever saved.
    fn load(&self) -> Result<Option<String>, RepositoryError>;

    /// Replace the record.
    fn save(&self, record: &str) -> Result<(), RepositoryError>;
}

/// Process-local repository.
#[derive(Debug, Default)]
pub struct InMemoryPrepRepository {
    record: Mutex<Option<String>>,
    fail_saves: Mutex<Option<String>>,
}

impl InMemoryPrepRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing record.
    pub fn with_record(record: impl Into<String>) -> Self {
        Self {
            record: Mutex::new(Some(record.into())),
            fail_saves: Mutex::new(None),
        }
    }

    /// Current raw record.
    pub fn record(&self) -> Option<String> {
        self.record.lock().ok().and_then(|r| r.clone())
    }

    /// Make every subsequent save fail with `reason` (`None` to recover).
    pub fn set_save_failure(&self, reason: Option<String>) {
        if let Ok(mut fail) = self.fail_saves.lock() {
            *fail = reason;
        }
    }
}

impl PrepRecordRepository for InMemoryPrepRepository {
    fn load(&self) -> Result<Option<String>, RepositoryError> {
        self.record
            .lock()
            .map(|r| r.clone())
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))
    }

    fn save(&self, record: &str) -> Result<(), RepositoryError> {
        if let Some(reason) = self
            .fail_saves
            .lock()
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))?
            .clone()
        {
            return Err(RepositoryError::Unavailable(reason));
        }
        let mut guard = self
            .record
            .lock()
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))?;
        *guard = Some(record.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_round_trip() {
        let repo = InMemoryPrepRepository::new();
        assert!(repo.load().unwrap().is_none());
        repo.save("[]").unwrap();
        assert_eq!(repo.load().unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_save_failure_keeps_previous_record() {
        let repo = InMemoryPrepRepository::with_record("[1]");
        repo.set_save_failure(Some("quota exceeded".to_string()));
        let err = repo.save("[2]").unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
        assert_eq!(repo.record().as_deref(), Some("[1]"));

        repo.set_save_failure(None);
        repo.save("[2]").unwrap();
        assert_eq!(repo.record().as_deref(), Some("[2]"));
    }
}
