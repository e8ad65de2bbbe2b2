//! # Unit Repository
//!
//! The `product_uoms` table: alternate units of a product.

use catalog_core::{ProductId, RowId, UnitRow};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::debug;

use super::{from_column, to_column};
use crate::error::{DbError, DbResult};

#[derive(Debug, FromRow)]
struct UomRow {
    id: i64,
    name: String,
    quantity: i64,
}

impl TryFrom<UomRow> for UnitRow {
    type Error = DbError;

    fn try_from(row: UomRow) -> DbResult<Self> {
        Ok(UnitRow::new(
            Some(row.id),
            row.name,
            from_column("quantity", row.quantity)?,
        ))
    }
}

/// Repository for the product_uoms table.
#[derive(Debug, Clone)]
pub struct UnitRepository {
    pool: SqlitePool,
}

impl UnitRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UnitRepository { pool }
    }

    /// Units of a product in insertion order.
    pub async fn list(&self, product_id: ProductId) -> DbResult<Vec<UnitRow>> {
        let rows: Vec<UomRow> = sqlx::query_as(
            "SELECT id, name, quantity FROM product_uoms WHERE productId = ?1 ORDER BY id",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(UnitRow::try_from).collect()
    }

    /// Inserts a unit and returns its generated id.
    pub async fn insert(
        conn: &mut SqliteConnection,
        product_id: ProductId,
        unit: &UnitRow,
    ) -> DbResult<RowId> {
        debug!(product_id = %product_id, name = %unit.name, "Inserting unit");

        let result =
            sqlx::query("INSERT INTO product_uoms (productId, name, quantity) VALUES (?1, ?2, ?3)")
                .bind(product_id)
                .bind(&unit.name)
                .bind(to_column("quantity", unit.quantity)?)
                .execute(&mut *conn)
                .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn update(conn: &mut SqliteConnection, id: RowId, unit: &UnitRow) -> DbResult<()> {
        debug!(unit_id = %id, "Updating unit");

        let result = sqlx::query("UPDATE product_uoms SET name = ?2, quantity = ?3 WHERE id = ?1")
            .bind(id)
            .bind(&unit.name)
            .bind(to_column("quantity", unit.quantity)?)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Unit", id));
        }

        Ok(())
    }

    /// Deletes a unit. A row that is already gone is not an error.
    pub async fn delete(conn: &mut SqliteConnection, id: RowId) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM product_uoms WHERE id = ?1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        debug!(unit_id = %id, deleted = result.rows_affected(), "Deleted unit");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn product(db: &Database) -> ProductId {
        sqlx::query("INSERT INTO products (name, baseUom) VALUES ('Soap', 'bar')")
            .execute(db.pool())
            .await
            .unwrap()
            .last_insert_rowid()
    }

    #[tokio::test]
    async fn test_insert_update_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product_id = product(&db).await;

        let mut conn = db.pool().acquire().await.unwrap();
        let id = UnitRepository::insert(&mut conn, product_id, &UnitRow::new(None, "box", 12))
            .await
            .unwrap();
        UnitRepository::update(&mut conn, id, &UnitRow::new(Some(id), "box", 24))
            .await
            .unwrap();
        drop(conn);

        let units = db.units().list(product_id).await.unwrap();
        assert_eq!(units, vec![UnitRow::new(Some(id), "box", 24)]);

        let mut conn = db.pool().acquire().await.unwrap();
        UnitRepository::delete(&mut conn, id).await.unwrap();
        UnitRepository::delete(&mut conn, id).await.unwrap();
        assert!(matches!(
            UnitRepository::update(&mut conn, id, &UnitRow::new(Some(id), "box", 1)).await,
            Err(DbError::NotFound { .. })
        ));
        drop(conn);

        assert!(db.units().list(product_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_for_missing_product_violates_foreign_key() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        let result = UnitRepository::insert(&mut conn, 999, &UnitRow::new(None, "box", 12)).await;
        assert!(matches!(result, Err(DbError::ForeignKeyViolation { .. })));
    }
}
