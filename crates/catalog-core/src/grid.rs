//! # Column Descriptors
//!
//! Each grid describes its columns with a static table instead of matching on
//! column numbers. A presentation layer only ever calls
//! [`EditableGrid::display`], [`EditableGrid::set`] and
//! [`EditableGrid::is_editable`] with a row and column index.
//!
//! ```text
//! ┌───────────┬──────────────────┬────────────────────┬──────────────────┐
//! │ index     │ title            │ display            │ edit             │
//! ├───────────┼──────────────────┼────────────────────┼──────────────────┤
//! │ 0         │ "Unit"           │ row.name           │ Some(set_name)   │
//! │ 1         │ "Quantity"       │ row.quantity       │ Some(set_qty)    │
//! │ 2         │ "Conversion"     │ caption            │ None (read-only) │
//! └───────────┴──────────────────┴────────────────────┴──────────────────┘
//! ```

use crate::error::ValidationError;
use crate::validation::ValidationResult;

/// One column of a grid `G`.
pub struct Column<G: 'static> {
    /// Horizontal header text.
    pub title: &'static str,

    /// Text shown for a row.
    pub display: fn(&G, usize) -> String,

    /// Parses and applies typed text. `None` for read-only columns.
    pub edit: Option<fn(&mut G, usize, &str) -> ValidationResult<()>>,

    /// Whether the blank insertion row accepts edits in this column.
    pub editable_on_blank: bool,
}

/// Text-level access to a grid through its column table.
pub trait EditableGrid: Sized + 'static {
    /// The column table, in display order.
    fn columns() -> &'static [Column<Self>];

    /// True when `row` is the blank insertion row (or past the end).
    fn is_blank_at(&self, row: usize) -> bool;

    /// Number of rows, blank row included.
    fn row_count(&self) -> usize;

    /// Fails unless `row` exists.
    fn check_row(&self, row: usize) -> ValidationResult<()>;

    fn column_count() -> usize {
        Self::columns().len()
    }

    /// Header text of a column, empty for unknown columns.
    fn column_title(column: usize) -> &'static str {
        Self::columns().get(column).map_or("", |c| c.title)
    }

    /// Display text of a cell, empty past the end.
    fn display(&self, row: usize, column: usize) -> String {
        if row >= self.row_count() {
            return String::new();
        }
        Self::columns()
            .get(column)
            .map(|c| (c.display)(self, row))
            .unwrap_or_default()
    }

    /// Whether a cell accepts edits.
    fn is_editable(&self, row: usize, column: usize) -> bool {
        match Self::columns().get(column) {
            Some(c) if c.edit.is_some() => c.editable_on_blank || !self.is_blank_at(row),
            _ => false,
        }
    }

    /// Parses `text` into a cell. The grid is unchanged on error.
    fn set(&mut self, row: usize, column: usize, text: &str) -> ValidationResult<()> {
        let def = Self::columns()
            .get(column)
            .ok_or(ValidationError::UnknownColumn { column })?;

        let edit = def.edit.ok_or_else(|| ValidationError::ReadOnly {
            column: def.title.to_string(),
        })?;

        self.check_row(row)?;

        if !def.editable_on_blank && self.is_blank_at(row) {
            return Err(ValidationError::ReadOnly {
                column: def.title.to_string(),
            });
        }

        edit(self, row, text)
    }
}
