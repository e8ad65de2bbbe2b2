//! # Save Coordinator
//!
//! Reconciles an editor's in-memory state with storage in one transaction.
//!
//! ## Save Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Validating                                                            │
//! │    validate_product_name         empty name → Validation { Name }      │
//! │    count_by_name(name, self)     duplicate name → Validation { Name }  │
//! │    draft.plan()                  base unit / unit rows                 │
//! │                                                                         │
//! │  Committing (one transaction)                                          │
//! │    a. INSERT or UPDATE products            capture new product id      │
//! │    b. INSERT or UPDATE product_uoms        capture new row ids         │
//! │    c. INSERT or UPDATE product_prices      capture new row ids         │
//! │    d. DELETE pending unit ids, pending price ids                       │
//! │    COMMIT                                                              │
//! │                                                                         │
//! │  Committed                      ids written back, deletions cleared    │
//! │  RolledBack                     draft untouched, error returned        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every read happens before the transaction opens. An in-memory database has
//! a single connection, and the open transaction holds it.

use catalog_core::plan::{SaveOutcome, SavePlan, WriteKind};
use catalog_core::validation::validate_product_name;
use catalog_core::{FieldError, Focus, ProductDraft, ProductId, SaveState, ValidationError};
use sqlx::SqliteConnection;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult, EditorError, EditorResult};
use crate::pool::Database;
use crate::repository::{PriceRepository, ProductRepository, UnitRepository};

/// Runs saves and removals for one editor.
#[derive(Debug, Clone)]
pub struct SaveCoordinator {
    db: Database,
    state: Option<SaveState>,
}

impl SaveCoordinator {
    pub fn new(db: Database) -> Self {
        SaveCoordinator { db, state: None }
    }

    /// Where the last save ended up, `None` before the first one.
    #[inline]
    pub fn state(&self) -> Option<SaveState> {
        self.state
    }

    /// Saves the draft and returns the product id.
    ///
    /// On success the draft carries every generated id and no pending
    /// deletions. On failure the draft is exactly as it was.
    pub async fn save(&mut self, draft: &mut ProductDraft) -> EditorResult<ProductId> {
        self.state = Some(SaveState::Validating);
        let plan = self.validate(draft).await?;

        self.state = Some(SaveState::Committing);
        debug!(
            product_id = ?plan.product_id(),
            units = plan.units.len(),
            prices = plan.prices.len(),
            deletions = plan.unit_deletions.len() + plan.price_deletions.len(),
            "Committing product"
        );

        match self.commit(&plan).await {
            Ok(outcome) => {
                draft.apply_outcome(&plan, &outcome);
                self.state = Some(SaveState::Committed);
                info!(product_id = %outcome.product_id, "Product saved");
                Ok(outcome.product_id)
            }
            Err(err) => {
                self.state = Some(SaveState::RolledBack);
                warn!(product_id = ?plan.product_id(), error = %err, "Save rolled back");
                Err(err.into())
            }
        }
    }

    /// Deletes a stored product. Its line items go with it.
    pub async fn remove(&self, id: ProductId) -> DbResult<()> {
        self.db.products().delete(id).await?;
        info!(product_id = %id, "Product removed");
        Ok(())
    }

    /// Name, then name uniqueness, then everything else the plan checks.
    async fn validate(&self, draft: &ProductDraft) -> EditorResult<SavePlan> {
        let name = validate_product_name(&draft.record().name)
            .map_err(|e| FieldError::new(e, Focus::Name))?;

        let taken = self.db.products().count_by_name(&name, draft.id()).await?;
        if taken > 0 {
            return Err(EditorError::Validation {
                error: ValidationError::Duplicate {
                    field: "product name".to_string(),
                    value: name,
                },
                focus: Focus::Name,
            });
        }

        Ok(draft.plan()?)
    }

    async fn commit(&self, plan: &SavePlan) -> DbResult<SaveOutcome> {
        let mut tx = self.db.begin().await?;

        match write_plan(&mut tx, plan).await {
            Ok(outcome) => {
                tx.commit().await.map_err(DbError::transaction)?;
                Ok(outcome)
            }
            Err(err) => {
                if let Err(rollback) = tx.rollback().await {
                    warn!(error = %rollback, "Rollback failed");
                }
                Err(err)
            }
        }
    }
}

async fn write_plan(conn: &mut SqliteConnection, plan: &SavePlan) -> DbResult<SaveOutcome> {
    let product_id = match plan.product.write {
        WriteKind::Insert => ProductRepository::insert(&mut *conn, &plan.product).await?,
        WriteKind::Update(id) => {
            ProductRepository::update(&mut *conn, id, &plan.product).await?;
            id
        }
    };

    let mut outcome = SaveOutcome {
        product_id,
        ..SaveOutcome::default()
    };

    for unit in &plan.units {
        match unit.write {
            WriteKind::Insert => {
                let id = UnitRepository::insert(&mut *conn, product_id, &unit.row).await?;
                outcome.unit_ids.push((unit.index, id));
            }
            WriteKind::Update(id) => UnitRepository::update(&mut *conn, id, &unit.row).await?,
        }
    }

    for bracket in &plan.prices {
        match bracket.write {
            WriteKind::Insert => {
                let id = PriceRepository::insert(&mut *conn, product_id, &bracket.row).await?;
                outcome.price_ids.push((bracket.index, id));
            }
            WriteKind::Update(id) => PriceRepository::update(&mut *conn, id, &bracket.row).await?,
        }
    }

    for &id in &plan.unit_deletions {
        UnitRepository::delete(&mut *conn, id).await?;
    }

    for &id in &plan.price_deletions {
        PriceRepository::delete(&mut *conn, id).await?;
    }

    Ok(outcome)
}

// =============================================================================
// Unit Tests
// =============================================================================
