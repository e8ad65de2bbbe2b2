//! # Catalog Configuration
//!
//! Where the catalog database lives and how the pool is sized.
//!
//! ## Load Order (later overrides earlier)
//! ```text
//! defaults ──► catalog.toml ──► CATALOG_* environment ──► validate()
//! ```
//!
//! ## Example Config File
//! ```toml
//! [database]
//! path = "/var/lib/catalog/catalog.db"
//! max_connections = 4
//! min_connections = 1
//! connect_timeout_secs = 30
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::pool::DbConfig;

/// Environment variable overriding the database path.
pub const ENV_DB_PATH: &str = "CATALOG_DB_PATH";

/// Environment variable overriding the pool size.
pub const ENV_MAX_CONNECTIONS: &str = "CATALOG_MAX_CONNECTIONS";

const CONFIG_FILE_NAME: &str = "catalog.toml";
const DATABASE_FILE_NAME: &str = "catalog.db";

/// `[database]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_database_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_database_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(DATABASE_FILE_NAME))
}

fn default_max_connections() -> u32 {
    5
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    30
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_database_path(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

/// Complete catalog configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub database: DatabaseSettings,
}

impl CatalogConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// A missing file is not an error.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// Like [`CatalogConfig::load`], reading overrides through `env`.
    pub fn load_with<F>(config_path: Option<PathBuf>, env: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading catalog config from file");
                let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides(env);
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load catalog config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let db = &self.database;

        if db.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database.path must not be empty".into()));
        }

        if db.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if db.min_connections > db.max_connections {
            return Err(ConfigError::Invalid(format!(
                "database.min_connections ({}) exceeds max_connections ({})",
                db.min_connections, db.max_connections
            )));
        }

        Ok(())
    }

    fn apply_env_overrides<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = env(ENV_DB_PATH) {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(max) = env(ENV_MAX_CONNECTIONS) {
            match max.parse::<u32>() {
                Ok(max) => self.database.max_connections = max,
                Err(_) => warn!(value = %max, "Ignoring invalid {}", ENV_MAX_CONNECTIONS),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Pool settings for [`crate::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        let db = &self.database;
        DbConfig::new(&db.path)
            .max_connections(db.max_connections)
            .min_connections(db.min_connections)
            .connect_timeout(Duration::from_secs(db.connect_timeout_secs))
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "catalog", "editor")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = CatalogConfig::default();
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.database.min_connections, 1);
        assert!(config.database.path.ends_with(DATABASE_FILE_NAME));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("catalog-does-not-exist.toml");
        let config = CatalogConfig::load_with(Some(path), no_env).unwrap();
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_file_then_env() {
        let path = temp_file(
            "catalog-file-then-env.toml",
            "[database]\npath = \"/data/shop.db\"\nmax_connections = 3\n",
        );

        let config = CatalogConfig::load_with(Some(path.clone()), no_env).unwrap();
        assert_eq!(config.database.path, PathBuf::from("/data/shop.db"));
        assert_eq!(config.database.max_connections, 3);
        assert_eq!(config.database.connect_timeout_secs, 30);

        let env: HashMap<&str, &str> = [
            (ENV_DB_PATH, "/override/catalog.db"),
            (ENV_MAX_CONNECTIONS, "8"),
        ]
        .into_iter()
        .collect();
        let config =
            CatalogConfig::load_with(Some(path.clone()), |key| env.get(key).map(|v| v.to_string()))
                .unwrap();
        assert_eq!(config.database.path, PathBuf::from("/override/catalog.db"));
        assert_eq!(config.database.max_connections, 8);

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let path = temp_file(
            "catalog-invalid.toml",
            "[database]\nmax_connections = 1\nmin_connections = 2\n",
        );
        assert!(matches!(
            CatalogConfig::load_with(Some(path.clone()), no_env),
            Err(ConfigError::Invalid(_))
        ));
        std::fs::remove_file(path).unwrap();

        let path = temp_file("catalog-garbage.toml", "[database\n");
        assert!(matches!(
            CatalogConfig::load_with(Some(path.clone()), no_env),
            Err(ConfigError::Parse(_))
        ));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_db_config() {
        let mut config = CatalogConfig::default();
        config.database.path = PathBuf::from("/tmp/x.db");
        config.database.max_connections = 2;

        let db = config.db_config();
        assert_eq!(db.path(), Some(std::path::Path::new("/tmp/x.db")));
        assert_eq!(db.max_connections, 2);
        assert_eq!(db.connect_timeout, Duration::from_secs(30));
    }
}
