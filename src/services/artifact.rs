use crate::store::{BlobStore, StoreError};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use uuid::Uuid;

pub const CURRENT_KEY: &str = "leaderboard.current";
/// Served when no pointer has been written yet, e.g. a file placed by hand
/// into the data directory.
pub const LEGACY_KEY: &str = "leaderboard.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub key: String,
    pub replaced: Option<String>,
}

/// Writes a new version, repoints `CURRENT_KEY` at it, then drops the old one.
/// Concurrent publishers: last pointer write wins, the loser's version is orphaned.
pub fn publish(store: &dyn BlobStore, bytes: &[u8]) -> Result<Published, StoreError> {
    let previous = current_key(store)?;

    let key = format!("leaderboard-{}.csv", Uuid::new_v4());
    store.put(&key, bytes)?;
    store.put(CURRENT_KEY, key.as_bytes())?;

    // With no pointer yet, the only thing to replace is a hand-placed file.
    let old = previous.as_deref().unwrap_or(LEGACY_KEY);
    if old != key {
        match store.delete(old) {
            Ok(()) => debug!(key = old, "deleted previous leaderboard"),
            Err(e) => warn!(key = old, error = %e, "failed to delete previous leaderboard"),
        }
    }

    Ok(Published {
        key,
        replaced: previous,
    })
}

pub fn fetch(store: &dyn BlobStore) -> Result<Option<Vec<u8>>, StoreError> {
    // A second pass covers a publish that deleted our target between reading
    // the pointer and reading the artifact.
    for _ in 0..2 {
        match current_key(store)? {
            Some(key) => {
                if let Some(bytes) = store.get(&key)? {
                    return Ok(Some(bytes));
                }
                debug!(key = %key, "current leaderboard vanished, re-reading pointer");
            }
            None => return store.get(LEGACY_KEY),
        }
    }
    Ok(None)
}

/// Hex SHA-256 of an artifact body.
pub fn checksum(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

fn current_key(store: &dyn BlobStore) -> Result<Option<String>, StoreError> {
    Ok(store
        .get(CURRENT_KEY)?
        .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_string())
        .filter(|key| !key.is_empty()))
}
