mod fs;
mod sqlite;

pub use fs::FsStore;
pub use sqlite::SqliteStore;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid key: {0:?}")]
    InvalidKey(String),
}

/// A single `put` must be atomic with respect to concurrent `get`s of the same key.
pub trait BlobStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;

    /// Deleting a key that does not exist is not an error.
    fn delete(&self, key: &str) -> Result<(), StoreError>;

    fn backend(&self) -> &'static str;
}

// Keys double as file names in the fs backend.
pub(crate) fn check_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_key() {
        assert!(check_key("leaderboard.csv").is_ok());
        assert!(check_key("leaderboard-3f2a.csv").is_ok());
        assert!(check_key("").is_err());
        assert!(check_key("../etc/passwd").is_err());
        assert!(check_key(".hidden").is_err());
        assert!(check_key("a/b").is_err());
    }
}
