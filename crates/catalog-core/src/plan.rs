//! # Save Planning
//!
//! Turns the in-memory state of an editor into the exact list of writes a
//! save has to perform. Planning is pure; executing the plan is the job of
//! the save coordinator in catalog-db.
//!
//! ## Save Lifecycle
//! ```text
//! ┌────────────┐   plan ok    ┌────────────┐   commit ok   ┌────────────┐
//! │ Validating │ ───────────► │ Committing │ ────────────► │ Committed  │
//! └─────┬──────┘              └─────┬──────┘               └────────────┘
//!       │ FieldError                │ any failure
//!       ▼                           ▼
//!  (nothing written)          ┌────────────┐
//!                             │ RolledBack │
//!                             └────────────┘
//! ```
//!
//! Generated ids come back as a [`SaveOutcome`] and are applied only after
//! the transaction committed, so a rollback never touches the editor.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::price_grid::{PriceBracketGrid, PriceRow};
use crate::product::{CostingMethod, ProductId, ProductRecord, ProductType};
use crate::rowset::{GridRow, RowId};
use crate::unit_grid::{UnitOfMeasureGrid, UnitRow};
use crate::validation::{validate_base_unit, validate_product_name};

// =============================================================================
// Save State
// =============================================================================

/// Where a save currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SaveState {
    Validating,
    Committing,
    Committed,
    RolledBack,
}

impl fmt::Display for SaveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SaveState::Validating => "validating",
            SaveState::Committing => "committing",
            SaveState::Committed => "committed",
            SaveState::RolledBack => "rolled back",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Field Errors
// =============================================================================

/// Which editor input should receive focus after a rejected save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Focus {
    Name,
    BaseUnit,
    Units,
}

/// A validation failure tied to the input that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub error: ValidationError,
    pub focus: Focus,
}

impl FieldError {
    pub fn new(error: ValidationError, focus: Focus) -> Self {
        FieldError { error, focus }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

impl std::error::Error for FieldError {}

// =============================================================================
// Plan
// =============================================================================

/// Insert a new row or update an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind<Id> {
    Insert,
    Update(Id),
}

impl<Id: Copy> WriteKind<Id> {
    fn from_id(id: Option<Id>) -> Self {
        id.map_or(WriteKind::Insert, WriteKind::Update)
    }
}

/// Parent fields as they will be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductWrite {
    pub write: WriteKind<ProductId>,
    pub name: String,
    pub product_type: ProductType,
    pub active: bool,
    pub base_unit: String,
    pub costing_method: CostingMethod,
    /// Effective cost, denormalized into the product row.
    pub cost: u64,
    pub manual_cost: u64,
    pub average_cost: u64,
    pub last_purchase_cost: u64,
}

/// A grid row to write, remembering where it sits in its grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowWrite<T> {
    pub index: usize,
    pub write: WriteKind<RowId>,
    pub row: T,
}

/// Everything one save writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavePlan {
    pub product: ProductWrite,
    pub units: Vec<RowWrite<UnitRow>>,
    pub prices: Vec<RowWrite<PriceRow>>,
    pub unit_deletions: Vec<RowId>,
    pub price_deletions: Vec<RowId>,
}

impl SavePlan {
    /// Validates the editor state and lists the writes.
    ///
    /// Name uniqueness needs storage and is checked by the coordinator.
    pub fn build(
        record: &ProductRecord,
        units: &UnitOfMeasureGrid,
        prices: &PriceBracketGrid,
    ) -> Result<SavePlan, FieldError> {
        let name =
            validate_product_name(&record.name).map_err(|e| FieldError::new(e, Focus::Name))?;
        let base_unit = validate_base_unit(&record.base_unit)
            .map_err(|e| FieldError::new(e, Focus::BaseUnit))?;

        // Renaming the base unit can land on a unit row accepted earlier.
        let folded = base_unit.to_lowercase();
        if let Some((_, unit)) = units
            .rows()
            .non_blank()
            .find(|(_, u)| u.name.to_lowercase() == folded)
        {
            return Err(FieldError::new(
                ValidationError::CollidesWithBaseUnit {
                    value: unit.name.clone(),
                },
                Focus::BaseUnit,
            ));
        }

        // A named unit without a quantity cannot be converted.
        if let Some((_, unit)) = units.rows().non_blank().find(|(_, u)| u.quantity == 0) {
            return Err(FieldError::new(
                ValidationError::must_be_positive(format!("quantity of '{}'", unit.name)),
                Focus::Units,
            ));
        }

        let product = ProductWrite {
            write: WriteKind::from_id(record.id),
            name,
            product_type: record.product_type,
            active: record.active,
            base_unit,
            costing_method: record.costing_method,
            cost: record.cost(),
            manual_cost: record.manual_cost,
            average_cost: record.average_cost,
            last_purchase_cost: record.last_purchase_cost,
        };

        Ok(SavePlan {
            product,
            units: row_writes(units.rows().non_blank()),
            prices: row_writes(prices.rows().non_blank()),
            unit_deletions: units.pending_deletions().to_vec(),
            price_deletions: prices.pending_deletions().to_vec(),
        })
    }

    /// Id of the product being updated, `None` for a first save.
    pub fn product_id(&self) -> Option<ProductId> {
        match self.product.write {
            WriteKind::Insert => None,
            WriteKind::Update(id) => Some(id),
        }
    }
}

fn row_writes<'a, T>(rows: impl Iterator<Item = (usize, &'a T)>) -> Vec<RowWrite<T>>
where
    T: GridRow + 'a,
{
    rows.map(|(index, row)| RowWrite {
        index,
        write: WriteKind::from_id(row.id()),
        row: row.clone(),
    })
    .collect()
}

// =============================================================================
// Outcome
// =============================================================================

/// Ids produced by a committed save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveOutcome {
    pub product_id: ProductId,
    /// `(grid index, new id)` for every inserted unit row.
    pub unit_ids: Vec<(usize, RowId)>,
    /// `(grid index, new id)` for every inserted price row.
    pub price_ids: Vec<(usize, RowId)>,
}

// =============================================================================
// Unit Tests
// =============================================================================
