//! # Schema Migrations
//!
//! SQL files under `migrations/sqlite/` are compiled into the binary and
//! applied by [`Database::new`](crate::Database::new) before any repository
//! runs. sqlx records each applied file in `_sqlx_migrations`, so reopening an
//! up-to-date database runs nothing.
//!
//! | File | Creates |
//! |------|---------|
//! | `001_catalog_schema.sql` | `products`, `product_uoms`, `product_prices` |
//!
//! Schema changes go in a new `NNN_description.sql`; applied files are never
//! edited, since sqlx checksums them.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Embedded versus applied migration counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationStatus {
    pub embedded: usize,
    pub applied: usize,
}

impl MigrationStatus {
    #[inline]
    pub fn is_current(&self) -> bool {
        self.applied >= self.embedded
    }
}

/// Applies every embedded migration not yet recorded.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    debug!(embedded = MIGRATOR.migrations.len(), "Applying migrations");
    MIGRATOR.run(pool).await?;
    info!("Migrations applied");
    Ok(())
}

/// Reports how far the schema is. A database never migrated counts as zero.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<MigrationStatus> {
    let applied: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await
            .unwrap_or(0);

    Ok(MigrationStatus {
        embedded: MIGRATOR.migrations.len(),
        applied: usize::try_from(applied).unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_schema_has_catalog_tables() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE '\\_%' ESCAPE '\\' \
             AND name <> 'sqlite_sequence' ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();

        assert_eq!(tables, vec!["product_prices", "product_uoms", "products"]);
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.run_migrations().await.unwrap();

        let status = migration_status(db.pool()).await.unwrap();
        assert_eq!(status, MigrationStatus { embedded: 1, applied: 1 });
        assert!(status.is_current());
    }

    #[tokio::test]
    async fn test_unmigrated_database() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();

        let status = migration_status(db.pool()).await.unwrap();
        assert_eq!(status.applied, 0);
        assert!(!status.is_current());
    }
}
