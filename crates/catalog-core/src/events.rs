//! # Events
//!
//! Two event streams leave the core:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GridEvent   (per grid, drained by the presentation layer)              │
//! │  ├── RowsInserted { first, last }                                       │
//! │  ├── RowsRemoved  { first, last }                                       │
//! │  ├── DataChanged  { row, firstColumn, lastColumn }                      │
//! │  ├── HeaderChanged { row }                                              │
//! │  └── Reset                                                              │
//! │                                                                         │
//! │  EditorEvent (per editor, sent to the shell)                            │
//! │  ├── Saved { id }              → refresh product list, retitle tab      │
//! │  ├── Removed { id }            → refresh product list, close tab        │
//! │  └── DuplicateRequested { id } → open a duplicate editor                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::product::ProductId;

/// Structural or content change of a grid.
///
/// Row and column indices refer to the grid state *after* the change, except
/// for `RowsRemoved` whose range refers to the rows as they were before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GridEvent {
    /// Rows `first..=last` were inserted.
    RowsInserted { first: usize, last: usize },
    /// Rows `first..=last` were removed.
    RowsRemoved { first: usize, last: usize },
    /// Cells of `row` between the two columns (inclusive) changed.
    #[serde(rename_all = "camelCase")]
    DataChanged {
        row: usize,
        first_column: usize,
        last_column: usize,
    },
    /// The header label of `row` changed (blank marker vs. row number).
    HeaderChanged { row: usize },
    /// The whole grid was replaced.
    Reset,
}

/// Notification emitted by a product editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EditorEvent {
    /// The product was committed to storage.
    Saved { id: ProductId },
    /// The product was deleted from storage.
    Removed { id: ProductId },
    /// The user asked for a copy of this product.
    DuplicateRequested { id: ProductId },
}

impl EditorEvent {
    /// Product the event is about.
    pub fn product_id(&self) -> ProductId {
        match *self {
            EditorEvent::Saved { id }
            | EditorEvent::Removed { id }
            | EditorEvent::DuplicateRequested { id } => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_event_wire_format() {
        let json = serde_json::to_string(&EditorEvent::DuplicateRequested { id: 4 }).unwrap();
        assert_eq!(json, r#"{"kind":"duplicateRequested","id":4}"#);
    }

    #[test]
    fn test_grid_event_wire_format() {
        let event = GridEvent::DataChanged {
            row: 1,
            first_column: 0,
            last_column: 2,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"dataChanged","row":1,"firstColumn":0,"lastColumn":2}"#
        );
    }

    #[test]
    fn test_product_id() {
        assert_eq!(EditorEvent::Saved { id: 3 }.product_id(), 3);
        assert_eq!(EditorEvent::Removed { id: 9 }.product_id(), 9);
    }
}
