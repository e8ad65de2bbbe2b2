//! # Product Repository
//!
//! The `products` table.
//!
//! ## Columns
//! ```text
//! id │ name │ type │ active │ baseUom │ costingMethod │ cost │ manualCost │
//!    │      │      │        │         │               │      │ averageCost│
//!    │      │      │        │         │               │      │ lastPurchaseCost
//! ```
//! `cost` is the effective cost picked by `costingMethod`, denormalized so
//! other screens don't need to know the costing rules.

use catalog_core::plan::ProductWrite;
use catalog_core::{
    CostingMethod, CoreError, ProductId, ProductRecord, ProductSummary, ProductType,
    SYSTEM_TYPE_CODE,
};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::debug;

use super::{from_column, to_column};
use crate::error::{DbError, DbResult};

/// A `products` row as stored.
#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    #[sqlx(rename = "type")]
    type_code: i64,
    active: bool,
    #[sqlx(rename = "baseUom")]
    base_uom: String,
    #[sqlx(rename = "costingMethod")]
    costing_method: i64,
    #[sqlx(rename = "manualCost")]
    manual_cost: i64,
    #[sqlx(rename = "averageCost")]
    average_cost: i64,
    #[sqlx(rename = "lastPurchaseCost")]
    last_purchase_cost: i64,
}

impl TryFrom<ProductRow> for ProductRecord {
    type Error = DbError;

    fn try_from(row: ProductRow) -> DbResult<Self> {
        let product_type = ProductType::from_code(row.type_code).ok_or(
            CoreError::InvalidStoredValue {
                field: "type".to_string(),
                value: row.type_code,
            },
        )?;
        let costing_method = CostingMethod::from_code(row.costing_method).ok_or(
            CoreError::InvalidStoredValue {
                field: "costingMethod".to_string(),
                value: row.costing_method,
            },
        )?;

        Ok(ProductRecord {
            id: Some(row.id),
            name: row.name,
            product_type,
            active: row.active,
            base_unit: row.base_uom,
            costing_method,
            manual_cost: from_column("manualCost", row.manual_cost)?,
            average_cost: from_column("averageCost", row.average_cost)?,
            last_purchase_cost: from_column("lastPurchaseCost", row.last_purchase_cost)?,
        })
    }
}

#[derive(Debug, FromRow)]
struct SummaryRow {
    id: i64,
    name: String,
    #[sqlx(rename = "type")]
    type_code: i64,
    active: bool,
}

/// Repository for the products table.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Loads a product for editing.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no such id, or a system product
    pub async fn get(&self, id: ProductId) -> DbResult<ProductRecord> {
        debug!(product_id = %id, "Loading product");

        let row: Option<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, name, type, active, baseUom, costingMethod,
                   manualCost, averageCost, lastPurchaseCost
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) if row.type_code < SYSTEM_TYPE_CODE => row.try_into(),
            _ => Err(CoreError::ProductNotFound(id).into()),
        }
    }

    /// Summaries of every editable product, oldest first.
    pub async fn list(&self) -> DbResult<Vec<ProductSummary>> {
        let rows: Vec<SummaryRow> = sqlx::query_as(
            r#"
            SELECT id, name, type, active
            FROM products
            WHERE type < ?1
            ORDER BY id
            "#,
        )
        .bind(SYSTEM_TYPE_CODE)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed products");

        rows.into_iter()
            .map(|row| -> DbResult<ProductSummary> {
                let product_type = ProductType::from_code(row.type_code).ok_or(
                    CoreError::InvalidStoredValue {
                        field: "type".to_string(),
                        value: row.type_code,
                    },
                )?;
                Ok(ProductSummary::new(row.id, row.name, product_type, row.active))
            })
            .collect()
    }

    /// Counts products named `name`, ignoring `exclude`.
    pub async fn count_by_name(&self, name: &str, exclude: Option<ProductId>) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE name = ?1 AND (?2 IS NULL OR id <> ?2)",
        )
        .bind(name)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Counts all rows, system products included (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Inserts a product and returns its generated id.
    pub async fn insert(conn: &mut SqliteConnection, product: &ProductWrite) -> DbResult<ProductId> {
        debug!(name = %product.name, "Inserting product");

        let result = sqlx::query(
            r#"
            INSERT INTO products (
                name, type, active, baseUom, costingMethod,
                cost, manualCost, averageCost, lastPurchaseCost
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&product.name)
        .bind(product.product_type)
        .bind(product.active)
        .bind(&product.base_unit)
        .bind(product.costing_method)
        .bind(to_column("cost", product.cost)?)
        .bind(to_column("manualCost", product.manual_cost)?)
        .bind(to_column("averageCost", product.average_cost)?)
        .bind(to_column("lastPurchaseCost", product.last_purchase_cost)?)
        .execute(&mut *conn)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Overwrites every mutable column of product `id`.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - the product was deleted meanwhile
    pub async fn update(
        conn: &mut SqliteConnection,
        id: ProductId,
        product: &ProductWrite,
    ) -> DbResult<()> {
        debug!(product_id = %id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                type = ?3,
                active = ?4,
                baseUom = ?5,
                costingMethod = ?6,
                cost = ?7,
                manualCost = ?8,
                averageCost = ?9,
                lastPurchaseCost = ?10
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&product.name)
        .bind(product.product_type)
        .bind(product.active)
        .bind(&product.base_unit)
        .bind(product.costing_method)
        .bind(to_column("cost", product.cost)?)
        .bind(to_column("manualCost", product.manual_cost)?)
        .bind(to_column("averageCost", product.average_cost)?)
        .bind(to_column("lastPurchaseCost", product.last_purchase_cost)?)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Deletes product `id`. Line items follow through the schema's cascade.
    pub async fn delete(&self, id: ProductId) -> DbResult<()> {
        debug!(product_id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1 AND type < ?2")
            .bind(id)
            .bind(SYSTEM_TYPE_CODE)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
