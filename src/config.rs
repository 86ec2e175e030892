use crate::models::leaderboard::Columns;
use crate::services::ranking::DEFAULT_DISPLAY_LIMIT;
use crate::validation::AdminSecret;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("failed to read {key} from {path}: {source}")]
    SecretFile {
        key: &'static str,
        path: String,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Fs { dir: String },
    Sqlite { path: String },
}

#[derive(Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub admin_secret: AdminSecret,
    pub storage: StorageBackend,
    pub max_upload_bytes: usize,
    pub display_limit: usize,
    pub columns: Columns,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, so tests need not touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage = match try_load(&lookup, "STORAGE_BACKEND", "fs".to_string())?.as_str() {
            "fs" => StorageBackend::Fs {
                dir: try_load(&lookup, "DATA_DIR", "data".to_string())?,
            },
            "sqlite" => StorageBackend::Sqlite {
                path: try_load(&lookup, "DATABASE_PATH", "skills-board.db".to_string())?,
            },
            other => {
                return Err(ConfigError::Invalid {
                    key: "STORAGE_BACKEND",
                    reason: format!("unknown backend {other:?}, expected \"fs\" or \"sqlite\""),
                })
            }
        };

        let defaults = Columns::default();
        let columns = Columns {
            name: try_load(&lookup, "COLUMN_NAME", defaults.name)?,
            email: try_load(&lookup, "COLUMN_EMAIL", defaults.email)?,
            profile_url: try_load(&lookup, "COLUMN_PROFILE_URL", defaults.profile_url)?,
            all_completed: try_load(&lookup, "COLUMN_ALL_COMPLETED", defaults.all_completed)?,
            skill_badges: try_load(&lookup, "COLUMN_SKILL_BADGES", defaults.skill_badges)?,
            arcade_games: try_load(&lookup, "COLUMN_ARCADE_GAMES", defaults.arcade_games)?,
        };

        Ok(Config {
            host: try_load(&lookup, "HOST", "0.0.0.0".to_string())?,
            port: try_load(&lookup, "PORT", 3000)?,
            admin_secret: AdminSecret::new(&admin_password(&lookup)?),
            storage,
            max_upload_bytes: try_load(&lookup, "MAX_UPLOAD_BYTES", 5 * 1024 * 1024)?,
            display_limit: try_load(&lookup, "DISPLAY_LIMIT", DEFAULT_DISPLAY_LIMIT)?,
            columns,
        })
    }
}

fn try_load<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::Invalid {
                key,
                reason: e.to_string(),
            }
        }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

/// `ADMIN_PASSWORD` wins; otherwise the secret is read from the file named by
/// `ADMIN_PASSWORD_FILE` (e.g. a Docker secret).
fn admin_password<F>(lookup: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(password) = lookup("ADMIN_PASSWORD").filter(|p| !p.is_empty()) {
        return Ok(password);
    }

    let path = lookup("ADMIN_PASSWORD_FILE").ok_or(ConfigError::Missing("ADMIN_PASSWORD"))?;
    let password = std::fs::read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|source| {
            warn!("Failed to read ADMIN_PASSWORD_FILE: {source}");
            ConfigError::SecretFile {
                key: "ADMIN_PASSWORD_FILE",
                path: path.clone(),
                source,
            }
        })?;

    if password.is_empty() {
        return Err(ConfigError::Missing("ADMIN_PASSWORD"));
    }
    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("ADMIN_PASSWORD", "hunter2")])).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.storage, StorageBackend::Fs { dir: "data".into() });
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
        assert_eq!(config.display_limit, 100);
        assert_eq!(config.columns, Columns::default());
        assert!(config.admin_secret.verify("hunter2"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("ADMIN_PASSWORD", "hunter2"),
            ("PORT", "8080"),
            ("STORAGE_BACKEND", "sqlite"),
            ("DATABASE_PATH", "/tmp/board.db"),
            ("DISPLAY_LIMIT", "10"),
            ("COLUMN_SKILL_BADGES", "skillBadges"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.storage,
            StorageBackend::Sqlite { path: "/tmp/board.db".into() }
        );
        assert_eq!(config.display_limit, 10);
        assert_eq!(config.columns.skill_badges, "skillBadges");
        assert_eq!(config.columns.arcade_games, Columns::default().arcade_games);
    }

    #[test]
    fn test_missing_password_is_fatal() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("ADMIN_PASSWORD")));
    }

    #[test]
    fn test_password_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admin_password");
        std::fs::write(&path, "from-file\n").unwrap();

        let config = Config::from_lookup(lookup(&[(
            "ADMIN_PASSWORD_FILE",
            path.to_str().unwrap(),
        )]))
        .unwrap();
        assert!(config.admin_secret.verify("from-file"));
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_lookup(lookup(&[("ADMIN_PASSWORD", "x"), ("PORT", "http")]));
        assert!(matches!(err, Err(ConfigError::Invalid { key: "PORT", .. })));

        let err = Config::from_lookup(lookup(&[("ADMIN_PASSWORD", "x"), ("STORAGE_BACKEND", "s3")]));
        assert!(matches!(err, Err(ConfigError::Invalid { key: "STORAGE_BACKEND", .. })));
    }
}
