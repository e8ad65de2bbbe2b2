//! # Price Bracket Grid
//!
//! Quantity-tiered prices. Each row says "when buying this many, these three
//! price levels apply".
//!
//! ## Columns
//! ```text
//! ┌──────────┬───────────────┬─────────┬─────────┐
//! │ Quantity │ Price 1       │ Price 2 │ Price 3 │
//! ├──────────┼───────────────┼─────────┼─────────┤
//! │ 1 - 11   │ 5000          │ 4900    │ 4800    │
//! │ 12 - 99  │ 4500 - 4700   │ 4400    │ 4300    │
//! │ >= 100   │ 4000          │ 3900    │ 3800    │
//! │ *        │               │         │         │
//! └──────────┴───────────────┴─────────┴─────────┘
//! ```
//!
//! Text is parsed by [`crate::range`]. Every column of the blank row accepts
//! input, and the grid holds at most [`MAX_PRICE_ROWS`] rows.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::events::GridEvent;
use crate::grid::{Column, EditableGrid};
use crate::range::{parse_price_range, parse_quantity_range, Range};
use crate::rowset::{GridRow, RowId, RowSet};
use crate::validation::ValidationResult;

/// Maximum rows in the price grid, blank row included.
pub const MAX_PRICE_ROWS: usize = 5;

pub const COLUMN_QUANTITY: usize = 0;
pub const COLUMN_PRICE1: usize = 1;
pub const COLUMN_PRICE2: usize = 2;
pub const COLUMN_PRICE3: usize = 3;

/// One price bracket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceRow {
    pub id: Option<RowId>,
    pub quantity: Range,
    pub price1: Range,
    pub price2: Range,
    pub price3: Range,
}

impl PriceRow {
    /// The price range of tier 1, 2 or 3.
    pub fn price(&self, tier: usize) -> Option<Range> {
        match tier {
            1 => Some(self.price1),
            2 => Some(self.price2),
            3 => Some(self.price3),
            _ => None,
        }
    }

    fn price_mut(&mut self, tier: usize) -> Option<&mut Range> {
        match tier {
            1 => Some(&mut self.price1),
            2 => Some(&mut self.price2),
            3 => Some(&mut self.price3),
            _ => None,
        }
    }
}

impl GridRow for PriceRow {
    fn id(&self) -> Option<RowId> {
        self.id
    }

    fn set_id(&mut self, id: Option<RowId>) {
        self.id = id;
    }

    fn is_blank(&self) -> bool {
        self.id.is_none()
            && self.quantity.is_zero()
            && self.price1.is_zero()
            && self.price2.is_zero()
            && self.price3.is_zero()
    }
}

static COLUMNS: [Column<PriceBracketGrid>; 4] = [
    Column {
        title: "Quantity",
        display: PriceBracketGrid::display_quantity,
        edit: Some(PriceBracketGrid::set_quantity),
        editable_on_blank: true,
    },
    Column {
        title: "Price 1",
        display: PriceBracketGrid::display_price1,
        edit: Some(PriceBracketGrid::set_price1),
        editable_on_blank: true,
    },
    Column {
        title: "Price 2",
        display: PriceBracketGrid::display_price2,
        edit: Some(PriceBracketGrid::set_price2),
        editable_on_blank: true,
    },
    Column {
        title: "Price 3",
        display: PriceBracketGrid::display_price3,
        edit: Some(PriceBracketGrid::set_price3),
        editable_on_blank: true,
    },
];

/// The price-bracket grid of one product editor.
#[derive(Debug, Clone)]
pub struct PriceBracketGrid {
    rows: RowSet<PriceRow>,
}

impl Default for PriceBracketGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceBracketGrid {
    pub fn new() -> Self {
        PriceBracketGrid {
            rows: RowSet::new(MAX_PRICE_ROWS),
        }
    }

    pub fn load(&mut self, rows: impl IntoIterator<Item = PriceRow>) {
        self.rows.load(rows);
    }

    #[inline]
    pub fn rows(&self) -> &RowSet<PriceRow> {
        &self.rows
    }

    #[inline]
    pub(crate) fn rows_mut(&mut self) -> &mut RowSet<PriceRow> {
        &mut self.rows
    }

    pub fn get(&self, row: usize) -> PriceRow {
        self.rows.get(row)
    }

    /// Sets the quantity bracket from text such as `">= 100"` or `"12 - 99"`.
    pub fn set_quantity(&mut self, row: usize, text: &str) -> ValidationResult<()> {
        let quantity = parse_quantity_range(text)?;
        self.rows
            .edit(row, (COLUMN_QUANTITY, COLUMN_QUANTITY), "quantity", |bracket| {
                bracket.quantity = quantity
            })
    }

    /// Sets price tier 1, 2 or 3 from text such as `"5000"` or `"4500 - 5000"`.
    ///
    /// An unknown tier is reported as an unknown column.
    pub fn set_price(&mut self, row: usize, tier: usize, text: &str) -> ValidationResult<()> {
        if PriceRow::default().price(tier).is_none() {
            return Err(ValidationError::UnknownColumn { column: tier });
        }
        let price = parse_price_range(text)?;
        self.rows.edit(row, (tier, tier), "price", |bracket| {
            if let Some(target) = bracket.price_mut(tier) {
                *target = price;
            }
        })
    }

    /// Removes a bracket. See [`RowSet::remove_at`].
    pub fn remove_at(&mut self, row: usize) -> bool {
        self.rows.remove_at(row, COLUMNS.len())
    }

    #[inline]
    pub fn pending_deletions(&self) -> &[RowId] {
        self.rows.pending_deletions()
    }

    pub fn clear_ids(&mut self) {
        self.rows.clear_ids();
    }

    pub fn take_events(&mut self) -> Vec<GridEvent> {
        self.rows.take_events()
    }

    fn set_price1(&mut self, row: usize, text: &str) -> ValidationResult<()> {
        self.set_price(row, 1, text)
    }

    fn set_price2(&mut self, row: usize, text: &str) -> ValidationResult<()> {
        self.set_price(row, 2, text)
    }

    fn set_price3(&mut self, row: usize, text: &str) -> ValidationResult<()> {
        self.set_price(row, 3, text)
    }

    fn display_quantity(&self, row: usize) -> String {
        self.rows.get(row).quantity.to_string()
    }

    fn display_price1(&self, row: usize) -> String {
        self.rows.get(row).price1.to_string()
    }

    fn display_price2(&self, row: usize) -> String {
        self.rows.get(row).price2.to_string()
    }

    fn display_price3(&self, row: usize) -> String {
        self.rows.get(row).price3.to_string()
    }
}

impl EditableGrid for PriceBracketGrid {
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
