//! # Price Repository
//!
//! The `product_prices` table: quantity-tiered price brackets.
//!
//! ## Stored Shape
//! ```text
//! Range { min, max } ──► <column>Min, <column>Max
//!
//! quantity ──► quantityMin, quantityMax
//! price1   ──► price1Min,   price1Max
//! price2   ──► price2Min,   price2Max
//! price3   ──► price3Min,   price3Max
//! ```

use catalog_core::{PriceRow, ProductId, Range, RowId};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::debug;

use super::{from_column, to_column};
use crate::error::{DbError, DbResult};

#[derive(Debug, FromRow)]
#[sqlx(rename_all = "camelCase")]
struct BracketRow {
    id: i64,
    quantity_min: i64,
    quantity_max: i64,
    price1_min: i64,
    price1_max: i64,
    price2_min: i64,
    price2_max: i64,
    price3_min: i64,
    price3_max: i64,
}

fn range(field: &str, min: i64, max: i64) -> DbResult<Range> {
    Ok(Range::new(from_column(field, min)?, from_column(field, max)?))
}

impl TryFrom<BracketRow> for PriceRow {
    type Error = DbError;

    fn try_from(row: BracketRow) -> DbResult<Self> {
        Ok(PriceRow {
            id: Some(row.id),
            quantity: range("quantity", row.quantity_min, row.quantity_max)?,
            price1: range("price1", row.price1_min, row.price1_max)?,
            price2: range("price2", row.price2_min, row.price2_max)?,
            price3: range("price3", row.price3_min, row.price3_max)?,
        })
    }
}

/// The eight bracket columns in table order.
fn columns(row: &PriceRow) -> DbResult<[i64; 8]> {
    Ok([
        to_column("quantityMin", row.quantity.min)?,
        to_column("quantityMax", row.quantity.max)?,
        to_column("price1Min", row.price1.min)?,
        to_column("price1Max", row.price1.max)?,
        to_column("price2Min", row.price2.min)?,
        to_column("price2Max", row.price2.max)?,
        to_column("price3Min", row.price3.min)?,
        to_column("price3Max", row.price3.max)?,
    ])
}

/// Repository for the product_prices table.
#[derive(Debug, Clone)]
pub struct PriceRepository {
    pool: SqlitePool,
}

impl PriceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PriceRepository { pool }
    }

    /// Brackets of a product in insertion order.
    pub async fn list(&self, product_id: ProductId) -> DbResult<Vec<PriceRow>> {
        let rows: Vec<BracketRow> = sqlx::query_as(
            r#"
            SELECT id, quantityMin, quantityMax,
                   price1Min, price1Max, price2Min, price2Max, price3Min, price3Max
            FROM product_prices
            WHERE productId = ?1
            ORDER BY id
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(PriceRow::try_from).collect()
    }

    /// Inserts a bracket and returns its generated id.
    pub async fn insert(
        conn: &mut SqliteConnection,
        product_id: ProductId,
        bracket: &PriceRow,
    ) -> DbResult<RowId> {
        debug!(product_id = %product_id, quantity = %bracket.quantity, "Inserting price bracket");

        let [q_min, q_max, p1_min, p1_max, p2_min, p2_max, p3_min, p3_max] = columns(bracket)?;
        let result = sqlx::query(
            r#"
            INSERT INTO product_prices (
                productId, quantityMin, quantityMax,
                price1Min, price1Max, price2Min, price2Max, price3Min, price3Max
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(product_id)
        .bind(q_min)
        .bind(q_max)
        .bind(p1_min)
        .bind(p1_max)
        .bind(p2_min)
        .bind(p2_max)
        .bind(p3_min)
        .bind(p3_max)
        .execute(&mut *conn)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn update(conn: &mut SqliteConnection, id: RowId, bracket: &PriceRow) -> DbResult<()> {
        debug!(price_id = %id, "Updating price bracket");

        let [q_min, q_max, p1_min, p1_max, p2_min, p2_max, p3_min, p3_max] = columns(bracket)?;
        let result = sqlx::query(
            r#"
            UPDATE product_prices SET
                quantityMin = ?2, quantityMax = ?3,
                price1Min = ?4, price1Max = ?5,
                price2Min = ?6, price2Max = ?7,
                price3Min = ?8, price3Max = ?9
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(q_min)
        .bind(q_max)
        .bind(p1_min)
        .bind(p1_max)
        .bind(p2_min)
        .bind(p2_max)
        .bind(p3_min)
        .bind(p3_max)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Price bracket", id));
        }

        Ok(())
    }

    /// Deletes a bracket. A row that is already gone is not an error.
    pub async fn delete(conn: &mut SqliteConnection, id: RowId) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM product_prices WHERE id = ?1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        debug!(price_id = %id, deleted = result.rows_affected(), "Deleted price bracket");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_ranges_survive_storage() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product_id = sqlx::query("INSERT INTO products (name, baseUom) VALUES ('Rice', 'kg')")
            .execute(db.pool())
            .await
            .unwrap()
            .last_insert_rowid();

        let bracket = PriceRow {
            id: None,
            quantity: Range::at_least(100),
            price1: Range::exactly(5000),
            price2: Range::new(4500, 4800),
            price3: Range::default(),
        };

        let mut conn = db.pool().acquire().await.unwrap();
        let id = PriceRepository::insert(&mut conn, product_id, &bracket)
            .await
            .unwrap();
        drop(conn);

        let stored = db.prices().list(product_id).await.unwrap();
        assert_eq!(stored, vec![PriceRow { id: Some(id), ..bracket }]);
        assert_eq!(stored[0].quantity.to_string(), ">= 100");
        assert_eq!(stored[0].price2.to_string(), "4500 - 4800");
    }

    #[tokio::test]
    async fn test_update_missing_bracket() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();
        assert!(matches!(
            PriceRepository::update(&mut conn, 77, &PriceRow::default()).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
