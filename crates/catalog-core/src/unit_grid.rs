//! # Unit-of-Measure Grid
//!
//! Alternate units of a product, each converting into the base unit.
//!
//! ## Columns
//! ```text
//! ┌────────┬──────────┬─────────────────────┐
//! │ Unit   │ Quantity │ Conversion          │
//! ├────────┼──────────┼─────────────────────┤
//! │ box    │ 12       │ 1 box = 12 pcs      │
//! │ crate  │ 144      │ 1 crate = 144 pcs   │
//! │ *      │          │                     │  ◄── name it to add a unit
//! └────────┴──────────┴─────────────────────┘
//! ```
//!
//! ## Rules
//! - names are trimmed, non-empty, unique ignoring case
//! - a name may not equal the base unit, ignoring case
//! - quantities are positive; the blank row's quantity is read-only
//! - at most [`MAX_UNIT_ROWS`] rows, blank row included

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::events::GridEvent;
use crate::grid::{Column, EditableGrid};
use crate::rowset::{GridRow, RowId, RowSet};
use crate::validation::{parse_positive, validate_positive, validate_unit_name, ValidationResult};

/// Maximum rows in the unit grid, blank row included.
pub const MAX_UNIT_ROWS: usize = 5;

/// Base unit label used in captions while the base unit is still empty.
pub const DEFAULT_BASE_UNIT_LABEL: &str = "satuan";

pub const COLUMN_NAME: usize = 0;
pub const COLUMN_QUANTITY: usize = 1;
pub const COLUMN_CAPTION: usize = 2;

/// An alternate unit of measure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UnitRow {
    pub id: Option<RowId>,
    pub name: String,
    /// How many base units one of this unit holds.
    pub quantity: u64,
}

impl UnitRow {
    /// A persisted row.
    pub fn new(id: Option<RowId>, name: impl Into<String>, quantity: u64) -> Self {
        UnitRow {
            id,
            name: name.into(),
            quantity,
        }
    }
}

impl GridRow for UnitRow {
    fn id(&self) -> Option<RowId> {
        self.id
    }

    fn set_id(&mut self, id: Option<RowId>) {
        self.id = id;
    }

    fn is_blank(&self) -> bool {
        self.id.is_none() && self.name.is_empty() && self.quantity == 0
    }
}

static COLUMNS: [Column<UnitOfMeasureGrid>; 3] = [
    Column {
        title: "Unit",
        display: UnitOfMeasureGrid::display_name,
        edit: Some(UnitOfMeasureGrid::set_name),
        editable_on_blank: true,
    },
    Column {
        title: "Quantity",
        display: UnitOfMeasureGrid::display_quantity,
        edit: Some(UnitOfMeasureGrid::set_quantity),
        editable_on_blank: false,
    },
    Column {
        title: "Conversion",
        display: UnitOfMeasureGrid::caption,
        edit: None,
        editable_on_blank: false,
    },
];

/// The unit-of-measure grid of one product editor.
#[derive(Debug, Clone)]
pub struct UnitOfMeasureGrid {
    rows: RowSet<UnitRow>,
    base_unit: String,
}

impl Default for UnitOfMeasureGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitOfMeasureGrid {
    pub fn new() -> Self {
        UnitOfMeasureGrid {
            rows: RowSet::new(MAX_UNIT_ROWS),
            base_unit: String::new(),
        }
    }

    /// Replaces the rows with persisted ones.
    pub fn load(&mut self, rows: impl IntoIterator<Item = UnitRow>) {
        self.rows.load(rows);
    }

    #[inline]
    pub fn rows(&self) -> &RowSet<UnitRow> {
        &self.rows
    }

    #[inline]
    pub(crate) fn rows_mut(&mut self) -> &mut RowSet<UnitRow> {
        &mut self.rows
    }

    /// Copy of a row; blank past the end.
    pub fn get(&self, row: usize) -> UnitRow {
        self.rows.get(row)
    }

    #[inline]
    pub fn base_unit(&self) -> &str {
        &self.base_unit
    }

    /// Changes the base unit and refreshes every caption.
    pub fn set_base_unit(&mut self, unit: &str) {
        self.base_unit = unit.trim().to_string();
        self.rows.touch_column(COLUMN_CAPTION);
    }

    /// Renames a unit.
    pub fn set_name(&mut self, row: usize, text: &str) -> ValidationResult<()> {
        let others = self
            .rows
            .rows()
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != row)
            .map(|(_, other)| other.name.as_str());
        let name = validate_unit_name(text, &self.base_unit, others)?;

        self.rows.edit(row, (COLUMN_NAME, COLUMN_CAPTION), "unit name", |unit| {
            unit.name = name
        })
    }

    /// Sets a unit's quantity from typed text.
    pub fn set_quantity(&mut self, row: usize, text: &str) -> ValidationResult<()> {
        let quantity = parse_positive("quantity", text)?;
        self.set_quantity_value(row, quantity)
    }

    /// Sets a unit's quantity.
    pub fn set_quantity_value(&mut self, row: usize, quantity: u64) -> ValidationResult<()> {
        let quantity = validate_positive("quantity", quantity)?;
        self.rows.check_row(row)?;
        if self.rows.is_blank_at(row) {
            return Err(ValidationError::ReadOnly {
                column: "Quantity".to_string(),
            });
        }

        self.rows
            .edit(row, (COLUMN_NAME, COLUMN_CAPTION), "quantity", |unit| {
                unit.quantity = quantity
            })
    }

    /// Removes a unit. See [`RowSet::remove_at`].
    pub fn remove_at(&mut self, row: usize) -> bool {
        self.rows.remove_at(row, COLUMNS.len())
    }

    /// `"1 box = 12 pcs"`, empty for the blank row.
    pub fn caption(&self, row: usize) -> String {
        match self.rows.row(row) {
            Some(unit) if !unit.is_blank() => {
                let base = if self.base_unit.is_empty() {
                    DEFAULT_BASE_UNIT_LABEL
                } else {
                    self.base_unit.as_str()
                };
                format!("1 {} = {} {}", unit.name, unit.quantity, base)
            }
            _ => String::new(),
        }
    }

    #[inline]
    pub fn pending_deletions(&self) -> &[RowId] {
        self.rows.pending_deletions()
    }

    /// Forgets every storage id (used when duplicating a product).
    pub fn clear_ids(&mut self) {
        self.rows.clear_ids();
    }

    pub fn take_events(&mut self) -> Vec<GridEvent> {
        self.rows.take_events()
    }

    fn display_name(&self, row: usize) -> String {
        self.rows.get(row).name
    }

    fn display_quantity(&self, row: usize) -> String {
        match self.rows.get(row).quantity {
            0 => String::new(),
            quantity => quantity.to_string(),
        }
    }
}

impl EditableGrid for UnitOfMeasureGrid {
    fn columns() -> &'static [Column<Self>] {
        &COLUMNS
    }

    fn is_blank_at(&self, row: usize) -> bool {
        self.rows.is_blank_at(row)
    }

    fn row_count(&self) -> usize {
        self.rows.row_count()
    }

    fn check_row(&self, row: usize) -> ValidationResult<()> {
        self.rows.check_row(row)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
