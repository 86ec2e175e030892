use crate::config::{Config, StorageBackend};
use crate::models::leaderboard::Columns;
use crate::store::{BlobStore, FsStore, SqliteStore, StoreError};
use crate::validation::AdminSecret;
use tracing::info;

/// Everything a request needs. Built once at startup and never mutated.
pub struct AppState {
    pub store: Box<dyn BlobStore>,
    pub secret: AdminSecret,
    pub columns: Columns,
    pub display_limit: usize,
}

impl AppState {
    pub fn new(store: Box<dyn BlobStore>, secret: AdminSecret) -> Self {
        AppState {
            store,
            secret,
            columns: Columns::default(),
            display_limit: crate::services::ranking::DEFAULT_DISPLAY_LIMIT,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, StoreError> {
        let store: Box<dyn BlobStore> = match &config.storage {
            StorageBackend::Fs { dir } => {
                let store = FsStore::open(dir)?;
                info!("Storing leaderboards under {}", store.root().display());
                Box::new(store)
            }
            StorageBackend::Sqlite { path } => {
                info!("Storing leaderboards in SQLite database {path}");
                Box::new(SqliteStore::open(path)?)
            }
        };

        Ok(AppState {
            columns: config.columns.clone(),
            display_limit: config.display_limit,
            ..AppState::new(store, config.admin_secret.clone())
        })
    }
}
