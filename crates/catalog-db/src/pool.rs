//! # Storage Handle
//!
//! Opening the catalog database and handing out repositories.
//!
//! ```text
//! CatalogConfig::db_config()  or  DbConfig::new(path)  or  DbConfig::in_memory()
//!        │
//!        ▼
//! Database::new ──► SqlitePool ──► migrations ──► products() / units() / prices()
//!                        │
//!                        └──► begin() ──► the SaveCoordinator's transaction
//! ```
//!
//! ## In-Memory Databases
//! An in-memory SQLite database lives exactly as long as its connection, so
//! [`DbConfig::in_memory`] pins the pool to one connection that never expires.
//! Callers must not hold a read connection while a transaction is open.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::{PriceRepository, ProductRepository, UnitRepository};

/// Where the catalog lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    File(PathBuf),
    Memory,
}

impl Location {
    fn describe(&self) -> String {
        match self {
            Location::File(path) => path.display().to_string(),
            Location::Memory => "(memory)".to_string(),
        }
    }
}

/// How to open the catalog database.
///
/// ```rust,ignore
/// let config = DbConfig::new("catalog.db").max_connections(4);
/// let db = Database::new(config).await?;
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub location: Location,
    pub max_connections: u32,
    pub min_connections: u32,
    /// How long to wait for a free connection.
    pub connect_timeout: Duration,
    /// `None` keeps idle connections forever.
    pub idle_timeout: Option<Duration>,
    pub run_migrations: bool,
}

impl DbConfig {
    /// A file database, created on first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            location: Location::File(path.into()),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            run_migrations: true,
        }
    }

    /// A private, empty, migrated database for tests and scratch work.
    pub fn in_memory() -> Self {
        DbConfig {
            location: Location::Memory,
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: None,
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    #[inline]
    pub fn is_in_memory(&self) -> bool {
        self.location == Location::Memory
    }

    /// The database file, `None` in memory.
    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            Location::File(path) => Some(path),
            Location::Memory => None,
        }
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = match &self.location {
            Location::Memory => SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?,
            // WAL keeps list reads from blocking a save
            Location::File(path) => SqliteConnectOptions::new()
                .filename(path)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .create_if_missing(true),
        };

        // Line items reference products
        Ok(options.foreign_keys(true))
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        let options = SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.connect_timeout)
            .idle_timeout(self.idle_timeout);

        match self.location {
            Location::Memory => options.max_lifetime(None),
            Location::File(_) => options,
        }
    }
}

/// Shared handle to the catalog database. Clones share one pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and brings the schema up to date if configured to.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        let location = config.location.describe();
        info!(location = %location, "Opening catalog database");

        let pool = config
            .pool_options()
            .connect_with(config.connect_options()?)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(
            location = %location,
            max_connections = config.max_connections,
            "Pool ready"
        );

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies pending migrations. Safe to call repeatedly.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await?;
        info!("Catalog schema up to date");
        Ok(())
    }

    #[inline]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Starts a transaction. Dropping it without commit rolls back.
    pub async fn begin(&self) -> DbResult<Transaction<'static, Sqlite>> {
        self.pool.begin().await.map_err(DbError::transaction)
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    pub fn units(&self) -> UnitRepository {
        UnitRepository::new(self.pool.clone())
    }

    pub fn prices(&self) -> PriceRepository {
        PriceRepository::new(self.pool.clone())
    }

    pub async fn close(&self) {
        info!("Closing catalog database");
        self.pool.close().await;
    }

    /// True if a trivial query succeeds.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
