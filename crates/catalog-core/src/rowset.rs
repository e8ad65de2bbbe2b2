//! # Row Set
//!
//! Ordered, capacity-bounded rows with a trailing blank insertion row.
//!
//! ## Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cap = 5                                                                │
//! │                                                                         │
//! │   row  header  contents                                                 │
//! │   0    1       box   12        ◄── persisted (id = 31)                  │
//! │   1    2       crate 144       ◄── new (id = None)                      │
//! │   2    *       (blank)         ◄── insertion point                      │
//! │   3            (virtual)       ◄── get() returns a blank value          │
//! │                                                                         │
//! │  Editing the blank row turns it into a real row and, while below cap,   │
//! │  appends a fresh blank row after it.                                    │
//! │                                                                         │
//! │  Removing a row below the cap position shifts later rows down;          │
//! │  removing the row at the cap position resets it to blank in place.      │
//! │  Either way its id goes onto the pending-deletion list.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - `1 <= rows.len() <= cap`
//! - a blank row, if any, is the last row
//! - below cap the last row is always blank
//! - pending deletions are only cleared by a successful commit

use crate::error::ValidationError;
use crate::events::GridEvent;
use crate::validation::ValidationResult;

/// Storage identity of a grid row.
pub type RowId = i64;

/// Behaviour a row type needs to live in a [`RowSet`].
pub trait GridRow: Clone + Default {
    /// Storage identity, `None` until persisted.
    fn id(&self) -> Option<RowId>;

    /// Replaces the storage identity.
    fn set_id(&mut self, id: Option<RowId>);

    /// True when every field is unset. Blank rows are never persisted.
    fn is_blank(&self) -> bool;
}

/// A generic editable row collection.
#[derive(Debug, Clone)]
pub struct RowSet<T> {
    rows: Vec<T>,
    cap: usize,
    pending_deletions: Vec<RowId>,
    events: Vec<GridEvent>,
}

impl<T: GridRow> RowSet<T> {
    /// Creates a set holding only the blank row.
    ///
    /// A cap below one is raised to one so the blank row always fits.
    pub fn new(cap: usize) -> Self {
        RowSet {
            rows: vec![T::default()],
            cap: cap.max(1),
            pending_deletions: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Replaces the contents with persisted rows.
    ///
    /// Blank rows are skipped, rows beyond the cap are dropped and the
    /// pending-deletion list starts over.
    pub fn load(&mut self, rows: impl IntoIterator<Item = T>) {
        self.rows = rows
            .into_iter()
            .filter(|row| !row.is_blank())
            .take(self.cap)
            .collect();
        self.pending_deletions.clear();
        self.ensure_trailing_blank(false);
        self.events.push(GridEvent::Reset);
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Number of rows, blank row included.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Maximum number of rows, blank row included.
    #[inline]
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Returns a copy of the row, or a blank value past the end.
    pub fn get(&self, row: usize) -> T {
        self.rows.get(row).cloned().unwrap_or_default()
    }

    /// Borrows a row if it exists.
    #[inline]
    pub fn row(&self, row: usize) -> Option<&T> {
        self.rows.get(row)
    }

    /// All rows, blank row included.
    #[inline]
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// Rows that would be persisted, with their indices.
    pub fn non_blank(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.rows.iter().enumerate().filter(|(_, row)| !row.is_blank())
    }

    /// True when `row` is the blank insertion row (or past the end).
    pub fn is_blank_at(&self, row: usize) -> bool {
        self.rows.get(row).map_or(true, GridRow::is_blank)
    }

    /// Vertical header: `*` for the insertion row, 1-based number otherwise.
    pub fn header_label(&self, row: usize) -> String {
        if self.is_blank_at(row) {
            "*".to_string()
        } else {
            (row + 1).to_string()
        }
    }

    /// Fails unless `row` is an existing row.
    ///
    /// Addressing the slot just past a full set is `CapacityReached`.
    pub fn check_row(&self, row: usize) -> ValidationResult<()> {
        if row < self.rows.len() {
            Ok(())
        } else if row == self.cap {
            Err(ValidationError::CapacityReached { cap: self.cap })
        } else {
            Err(ValidationError::RowOutOfBounds { row })
        }
    }

    /// Ids removed since load that still have to be deleted from storage.
    #[inline]
    pub fn pending_deletions(&self) -> &[RowId] {
        &self.pending_deletions
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Applies an already-validated edit to `row`.
    ///
    /// `columns` is the inclusive range of columns the edit touches, used for
    /// the `DataChanged` event. The edit is rejected when it would leave the
    /// row blank, because blank rows may only sit at the end.
    ///
    /// ## Flow
    /// ```text
    /// edit(row 2 = trailing blank)
    ///      │
    ///      ├── row out of range? ──► RowOutOfBounds
    ///      ├── result blank?     ──► Required (row untouched)
    ///      ▼
    /// rows[2] = edited
    ///      │
    ///      ├── was blank && len < cap ──► push blank, RowsInserted{3,3}
    ///      ▼
    /// DataChanged{2, ..}, HeaderChanged{2}
    /// ```
    pub fn edit<F>(
        &mut self,
        row: usize,
        columns: (usize, usize),
        field: &str,
        apply: F,
    ) -> ValidationResult<()>
    where
        F: FnOnce(&mut T),
    {
        self.check_row(row)?;
        let current = &self.rows[row];

        let was_blank = current.is_blank();
        let mut edited = current.clone();
        apply(&mut edited);

        if edited.is_blank() {
            return Err(ValidationError::required(field));
        }

        self.rows[row] = edited;

        if was_blank {
            self.ensure_trailing_blank(true);
            self.events.push(GridEvent::HeaderChanged { row });
        }

        self.events.push(GridEvent::DataChanged {
            row,
            first_column: columns.0,
            last_column: columns.1,
        });

        Ok(())
    }

    /// Removes or resets `row`, remembering its id for deletion.
    ///
    /// Returns `false` without doing anything for a blank or missing row.
    pub fn remove_at(&mut self, row: usize, column_count: usize) -> bool {
        if self.is_blank_at(row) {
            return false;
        }

        let removed = if row + 1 == self.cap {
            let removed = std::mem::take(&mut self.rows[row]);
            self.events.push(GridEvent::DataChanged {
                row,
                first_column: 0,
                last_column: column_count.saturating_sub(1),
            });
            self.events.push(GridEvent::HeaderChanged { row });
            removed
        } else {
            let removed = self.rows.remove(row);
            self.events.push(GridEvent::RowsRemoved {
                first: row,
                last: row,
            });
            self.ensure_trailing_blank(true);
            removed
        };

        if let Some(id) = removed.id() {
            self.pending_deletions.push(id);
        }

        true
    }

    /// Announces that one column changed in every row.
    pub fn touch_column(&mut self, column: usize) {
        for row in 0..self.rows.len() {
            self.events.push(GridEvent::DataChanged {
                row,
                first_column: column,
                last_column: column,
            });
        }
    }

    /// Writes storage ids back into the rows at the given indices.
    pub fn assign_ids(&mut self, ids: &[(usize, RowId)]) {
        for &(row, id) in ids {
            if let Some(target) = self.rows.get_mut(row) {
                target.set_id(Some(id));
            }
        }
    }

    /// Forgets all storage ids, turning every row into a new one.
    pub fn clear_ids(&mut self) {
        for row in &mut self.rows {
            row.set_id(None);
        }
        self.pending_deletions.clear();
    }

    /// Called after a successful commit.
    pub fn clear_pending_deletions(&mut self) {
        self.pending_deletions.clear();
    }

    /// Drains queued change events, oldest first.
    pub fn take_events(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.events)
    }

    fn ensure_trailing_blank(&mut self, announce: bool) {
        let needs_blank = self.rows.last().map_or(true, |last| !last.is_blank());
        if needs_blank && self.rows.len() < self.cap {
            self.rows.push(T::default());
            if announce {
                let row = self.rows.len() - 1;
                self.events.push(GridEvent::RowsInserted {
                    first: row,
                    last: row,
                });
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Note {
        id: Option<RowId>,
        text: String,
    }

    impl GridRow for Note {
        fn id(&self) -> Option<RowId> {
            self.id
        }

        fn set_id(&mut self, id: Option<RowId>) {
            self.id = id;
        }

        fn is_blank(&self) -> bool {
            self.id.is_none() && self.text.is_empty()
        }
    }

    fn write(set: &mut RowSet<Note>, row: usize, text: &str) -> ValidationResult<()> {
        let text = text.to_string();
        set.edit(row, (0, 0), "text", move |note| note.text = text)
    }

    fn saved(id: RowId, text: &str) -> Note {
        Note {
            id: Some(id),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_new_set_has_one_blank_row() {
        let set: RowSet<Note> = RowSet::new(5);
        assert_eq!(set.row_count(), 1);
        assert!(set.is_blank_at(0));
        assert_eq!(set.header_label(0), "*");
    }

    #[test]
    fn test_get_past_end_is_blank() {
        let set: RowSet<Note> = RowSet::new(5);
        assert_eq!(set.get(1), Note::default());
        assert_eq!(set.get(99), Note::default());
    }

    #[test]
    fn test_editing_blank_row_appends_until_cap() {
        let mut set: RowSet<Note> = RowSet::new(3);

        write(&mut set, 0, "a").unwrap();
        assert_eq!(set.row_count(), 2);
        write(&mut set, 1, "b").unwrap();
        assert_eq!(set.row_count(), 3);
        write(&mut set, 2, "c").unwrap();
        assert_eq!(set.row_count(), 3);
        assert!(set.rows().iter().all(|n| !n.is_blank()));
    }

    #[test]
    fn test_editing_existing_row_does_not_append() {
        let mut set: RowSet<Note> = RowSet::new(5);
        write(&mut set, 0, "a").unwrap();
        write(&mut set, 0, "b").unwrap();
        assert_eq!(set.row_count(), 2);
        assert_eq!(set.get(0).text, "b");
    }

    #[test]
    fn test_edit_that_leaves_row_blank_is_rejected() {
        let mut set: RowSet<Note> = RowSet::new(5);
        assert!(matches!(
            write(&mut set, 0, ""),
            Err(ValidationError::Required { .. })
        ));
        assert_eq!(set.row_count(), 1);
        assert!(set.take_events().is_empty());
    }

    #[test]
    fn test_edit_out_of_bounds() {
        let mut set: RowSet<Note> = RowSet::new(5);
        assert!(matches!(
            write(&mut set, 1, "x"),
            Err(ValidationError::RowOutOfBounds { row: 1 })
        ));
    }

    #[test]
    fn test_edit_past_full_set_reports_capacity() {
        let mut set: RowSet<Note> = RowSet::new(2);
        set.load(vec![saved(1, "a"), saved(2, "b")]);
        assert!(matches!(
            write(&mut set, 2, "c"),
            Err(ValidationError::CapacityReached { cap: 2 })
        ));
    }

    #[test]
    fn test_remove_below_cap_shifts_rows() {
        let mut set: RowSet<Note> = RowSet::new(5);
        set.load(vec![saved(1, "a"), saved(2, "b")]);

        assert!(set.remove_at(0, 1));
        assert_eq!(set.row_count(), 2);
        assert_eq!(set.get(0).text, "b");
        assert!(set.is_blank_at(1));
        assert_eq!(set.pending_deletions(), &[1]);
    }

    #[test]
    fn test_remove_at_cap_position_resets_in_place() {
        let mut set: RowSet<Note> = RowSet::new(3);
        set.load(vec![saved(1, "a"), saved(2, "b"), saved(3, "c")]);
        assert_eq!(set.row_count(), 3);

        assert!(set.remove_at(2, 1));
        assert_eq!(set.row_count(), 3);
        assert!(set.is_blank_at(2));

        // The reset row is blank now, so removing it again is a no-op.
        assert!(!set.remove_at(2, 1));
        assert_eq!(set.pending_deletions(), &[3]);
    }

    #[test]
    fn test_remove_from_full_set_restores_blank_row() {
        let mut set: RowSet<Note> = RowSet::new(3);
        set.load(vec![saved(1, "a"), saved(2, "b"), saved(3, "c")]);

        assert!(set.remove_at(0, 1));
        assert_eq!(set.row_count(), 3);
        assert!(set.is_blank_at(2));
        assert_eq!(set.get(0).text, "b");
    }

    #[test]
    fn test_remove_blank_row_is_noop() {
        let mut set: RowSet<Note> = RowSet::new(5);
        assert!(!set.remove_at(0, 1));
        assert!(!set.remove_at(7, 1));
        assert!(set.pending_deletions().is_empty());
    }

    #[test]
    fn test_remove_unsaved_row_records_nothing() {
        let mut set: RowSet<Note> = RowSet::new(5);
        write(&mut set, 0, "draft").unwrap();
        assert!(set.remove_at(0, 1));
        assert!(set.pending_deletions().is_empty());
        assert_eq!(set.row_count(), 1);
    }

    #[test]
    fn test_pending_deletions_accumulate() {
        let mut set: RowSet<Note> = RowSet::new(5);
        set.load(vec![saved(10, "a"), saved(11, "b"), saved(12, "c")]);
        set.remove_at(2, 1);
        set.remove_at(0, 1);
        assert_eq!(set.pending_deletions(), &[12, 10]);

        set.clear_pending_deletions();
        assert!(set.pending_deletions().is_empty());
    }

    #[test]
    fn test_load_truncates_to_cap_and_skips_blank() {
        let mut set: RowSet<Note> = RowSet::new(2);
        set.load(vec![Note::default(), saved(1, "a"), saved(2, "b"), saved(3, "c")]);
        assert_eq!(set.row_count(), 2);
        assert_eq!(set.get(1).text, "b");
        assert_eq!(set.take_events(), vec![GridEvent::Reset]);
    }

    #[test]
    fn test_edit_events() {
        let mut set: RowSet<Note> = RowSet::new(5);
        write(&mut set, 0, "a").unwrap();
        assert_eq!(
            set.take_events(),
            vec![
                GridEvent::RowsInserted { first: 1, last: 1 },
                GridEvent::HeaderChanged { row: 0 },
                GridEvent::DataChanged {
                    row: 0,
                    first_column: 0,
                    last_column: 0
                },
            ]
        );
    }

    #[test]
    fn test_assign_and_clear_ids() {
        let mut set: RowSet<Note> = RowSet::new(5);
        write(&mut set, 0, "a").unwrap();
        write(&mut set, 1, "b").unwrap();
        set.assign_ids(&[(0, 5), (1, 6), (9, 7)]);
        assert_eq!(set.get(0).id, Some(5));
        assert_eq!(set.get(1).id, Some(6));

        set.clear_ids();
        assert!(set.rows().iter().all(|n| n.id.is_none()));
    }
}
