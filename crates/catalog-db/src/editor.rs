//! # Product Editor
//!
//! One open product: its draft, its save coordinator and the channel it
//! reports to.
//!
//! ## Editor Actions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Shell Action             Editor Method           Notification          │
//! │  ────────────             ─────────────           ────────────          │
//! │                                                                         │
//! │  Edit cell ─────────────► draft_mut().units_mut().set(..)   (none)      │
//! │                                                                         │
//! │  Delete row ────────────► remove_unit_row(row, confirm)     (none)      │
//! │                                                                         │
//! │  Save ──────────────────► save() ──────────────────────► Saved { id }   │
//! │                                                                         │
//! │  Delete product ────────► remove(confirm) ─────────────► Removed { id } │
//! │                                                                         │
//! │  Duplicate ─────────────► request_duplicate() ─► DuplicateRequested{id} │
//! │                                                                         │
//! │  NOTE: a declined confirmation changes nothing and sends nothing.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use catalog_core::{EditableGrid, EditorEvent, ProductDraft, ProductId, SaveState};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::coordinator::SaveCoordinator;
use crate::error::{DbResult, EditorError, EditorResult};
use crate::pool::Database;

/// Yes/no question put to the user before anything is deleted.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// A fixed answer, for scripted callers and tests.
impl Confirm for bool {
    fn confirm(&self, _prompt: &str) -> bool {
        *self
    }
}

/// Editing session for a single product.
#[derive(Debug)]
pub struct ProductEditor {
    db: Database,
    coordinator: SaveCoordinator,
    draft: ProductDraft,
    events: UnboundedSender<EditorEvent>,
}

impl ProductEditor {
    /// Editor for a product that doesn't exist yet.
    pub fn new(db: Database, events: UnboundedSender<EditorEvent>) -> Self {
        Self::with_draft(db, ProductDraft::new(), events)
    }

    /// Editor for stored product `id`.
    pub async fn open(
        db: Database,
        id: ProductId,
        events: UnboundedSender<EditorEvent>,
    ) -> DbResult<Self> {
        let draft = Self::load(&db, id).await?;
        Ok(Self::with_draft(db, draft, events))
    }

    /// Editor holding an unsaved copy of product `id`, line items included.
    pub async fn duplicate_from(
        db: Database,
        id: ProductId,
        events: UnboundedSender<EditorEvent>,
    ) -> DbResult<Self> {
        let mut draft = Self::load(&db, id).await?;
        draft.detach();
        debug!(source_id = %id, "Opened duplicate");
        Ok(Self::with_draft(db, draft, events))
    }

    /// Reads a product and both of its grids.
    pub async fn load(db: &Database, id: ProductId) -> DbResult<ProductDraft> {
        let record = db.products().get(id).await?;
        let units = db.units().list(id).await?;
        let prices = db.prices().list(id).await?;

        debug!(
            product_id = %id,
            units = units.len(),
            prices = prices.len(),
            "Loaded product"
        );

        Ok(ProductDraft::from_parts(record, units, prices))
    }

    fn with_draft(db: Database, draft: ProductDraft, events: UnboundedSender<EditorEvent>) -> Self {
        ProductEditor {
            coordinator: SaveCoordinator::new(db.clone()),
            db,
            draft,
            events,
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    #[inline]
    pub fn draft(&self) -> &ProductDraft {
        &self.draft
    }

    #[inline]
    pub fn draft_mut(&mut self) -> &mut ProductDraft {
        &mut self.draft
    }

    #[inline]
    pub fn id(&self) -> Option<ProductId> {
        self.draft.id()
    }

    /// The database this editor reads from.
    #[inline]
    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn title(&self) -> String {
        self.draft.title()
    }

    #[inline]
    pub fn save_state(&self) -> Option<SaveState> {
        self.coordinator.state()
    }

    /// Duplicate and remove both need a stored product.
    #[inline]
    pub fn can_duplicate(&self) -> bool {
        self.id().is_some()
    }

    #[inline]
    pub fn can_remove(&self) -> bool {
        self.id().is_some()
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Saves the draft and announces it.
    pub async fn save(&mut self) -> EditorResult<ProductId> {
        let id = self.coordinator.save(&mut self.draft).await?;
        self.notify(EditorEvent::Saved { id });
        Ok(id)
    }

    /// Deletes the product after confirmation.
    ///
    /// ## Returns
    /// * `Ok(true)` - the product is gone and `Removed` was sent
    /// * `Ok(false)` - the user declined
    /// * `Err(EditorError::NotSaved)` - nothing stored to remove
    ///
    /// A storage failure leaves the draft as it was.
    pub async fn remove(&mut self, confirm: &impl Confirm) -> EditorResult<bool> {
        let id = self.id().ok_or(EditorError::NotSaved)?;

        let prompt = format!("Remove product \"{}\"?", self.draft.record().name);
        if !confirm.confirm(&prompt) {
            debug!(product_id = %id, "Remove declined");
            return Ok(false);
        }

        self.coordinator.remove(id).await?;
        self.notify(EditorEvent::Removed { id });
        Ok(true)
    }

    /// Asks the shell to open a copy of this product.
    ///
    /// Returns `false` for a product that was never saved.
    pub fn request_duplicate(&self) -> bool {
        match self.id() {
            Some(id) => {
                self.notify(EditorEvent::DuplicateRequested { id });
                true
            }
            None => false,
        }
    }

    /// Removes a unit row after confirmation. Blank rows are never removed.
    pub fn remove_unit_row(&mut self, row: usize, confirm: &impl Confirm) -> bool {
        let units = self.draft.units();
        if units.is_blank_at(row) {
            return false;
        }

        let prompt = format!("Remove unit \"{}\"?", units.get(row).name);
        confirm.confirm(&prompt) && self.draft.units_mut().remove_at(row)
    }

    /// Removes a price bracket after confirmation. Blank rows are never removed.
    pub fn remove_price_row(&mut self, row: usize, confirm: &impl Confirm) -> bool {
        let prices = self.draft.prices();
        if prices.is_blank_at(row) {
            return false;
        }

        let prompt = format!("Remove price bracket \"{}\"?", prices.get(row).quantity);
        confirm.confirm(&prompt) && self.draft.prices_mut().remove_at(row)
    }

    fn notify(&self, event: EditorEvent) {
        if self.events.send(event).is_err() {
            warn!(product_id = %event.product_id(), "No listener for editor event");
        } else {
            info!(event = ?event, "Editor event sent");
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use catalog_core::{Range, NEW_PRODUCT_TITLE};
    use std::cell::Cell;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    async fn setup() -> (Database, UnboundedSender<EditorEvent>, UnboundedReceiver<EditorEvent>) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        (db, tx, rx)
    }

    fn fill(editor: &mut ProductEditor) {
        let draft = editor.draft_mut();
        draft.set_name("Tea");
        draft.set_base_unit("pcs");
        draft.units_mut().set(0, 0, "box").unwrap();
        draft.units_mut().set(0, 1, "12").unwrap();
        draft.prices_mut().set(0, 0, ">= 100").unwrap();
        draft.prices_mut().set(0, 1, "5000").unwrap();
    }

    #[tokio::test]
    async fn test_save_then_reopen() {
        let (db, tx, mut rx) = setup().await;
        let mut editor = ProductEditor::new(db.clone(), tx.clone());
        assert_eq!(editor.title(), NEW_PRODUCT_TITLE);
        assert!(!editor.can_duplicate());

        fill(&mut editor);
        let id = editor.save().await.unwrap();
        assert_eq!(rx.try_recv().unwrap(), EditorEvent::Saved { id });
        assert_eq!(editor.save_state(), Some(SaveState::Committed));

        let reopened = ProductEditor::open(db, id, tx).await.unwrap();
        let units = reopened.draft().units();
        assert_eq!(units.caption(0), "1 box = 12 pcs");
        assert_eq!(units.display(0, 2), "1 box = 12 pcs");

        let prices = reopened.draft().prices();
        assert_eq!(prices.display(0, 0), ">= 100");
        assert_eq!(prices.display(0, 1), "5000");
        assert_eq!(prices.get(0).quantity, Range::at_least(100));
        assert_eq!(prices.rows().row_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_save_sends_nothing() {
        let (db, tx, mut rx) = setup().await;
        let mut editor = ProductEditor::new(db, tx);

        let err = editor.save().await.unwrap_err();
        assert!(matches!(err, EditorError::Validation { .. }));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_declined_remove_is_a_no_op() {
        let (db, tx, mut rx) = setup().await;
        let mut editor = ProductEditor::new(db.clone(), tx);
        fill(&mut editor);
        let id = editor.save().await.unwrap();
        rx.try_recv().unwrap();

        let asked = Cell::new(false);
        let decline = |_: &str| {
            asked.set(true);
            false
        };
        assert!(!editor.remove(&decline).await.unwrap());
        assert!(asked.get());
        assert!(rx.try_recv().is_err());
        assert!(db.products().get(id).await.is_ok());
    }

    #[tokio::test]
    async fn test_confirmed_remove() {
        let (db, tx, mut rx) = setup().await;
        let mut editor = ProductEditor::new(db.clone(), tx);
        fill(&mut editor);
        let id = editor.save().await.unwrap();
        rx.try_recv().unwrap();

        assert!(editor.remove(&true).await.unwrap());
        assert_eq!(rx.try_recv().unwrap(), EditorEvent::Removed { id });
        assert!(db.products().get(id).await.is_err());
    }

    #[tokio::test]
    async fn test_remove_failure_keeps_draft() {
        let (db, tx, mut rx) = setup().await;
        let mut editor = ProductEditor::new(db.clone(), tx);
        fill(&mut editor);
        let id = editor.save().await.unwrap();
        rx.try_recv().unwrap();
        db.products().delete(id).await.unwrap();

        assert!(matches!(
            editor.remove(&true).await,
            Err(EditorError::Storage(_))
        ));
        assert_eq!(editor.id(), Some(id));
        assert_eq!(editor.draft().record().name, "Tea");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unsaved_product_cannot_be_removed_or_duplicated() {
        let (db, tx, mut rx) = setup().await;
        let mut editor = ProductEditor::new(db, tx);

        assert!(matches!(
            editor.remove(&true).await,
            Err(EditorError::NotSaved)
        ));
        assert!(!editor.request_duplicate());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_duplicate_copies_line_items() {
        let (db, tx, mut rx) = setup().await;
        let mut editor = ProductEditor::new(db.clone(), tx.clone());
        fill(&mut editor);
        let id = editor.save().await.unwrap();
        rx.try_recv().unwrap();

        assert!(editor.request_duplicate());
        assert_eq!(
            rx.try_recv().unwrap(),
            EditorEvent::DuplicateRequested { id }
        );

        let mut copy = ProductEditor::duplicate_from(db.clone(), id, tx)
            .await
            .unwrap();
        assert_eq!(copy.id(), None);
        assert_eq!(copy.draft().units().get(0).id, None);
        assert!(copy.draft().units().pending_deletions().is_empty());

        copy.draft_mut().set_name("Tea (copy)");
        let copy_id = copy.save().await.unwrap();
        assert_ne!(copy_id, id);

        assert_eq!(db.units().list(copy_id).await.unwrap().len(), 1);
        assert_eq!(db.prices().list(copy_id).await.unwrap().len(), 1);
        assert_eq!(db.units().list(id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_row_removal_asks_first() {
        let (db, tx, _rx) = setup().await;
        let mut editor = ProductEditor::new(db, tx);
        fill(&mut editor);

        assert!(!editor.remove_unit_row(0, &false));
        assert_eq!(editor.draft().units().get(0).name, "box");

        let prompt = Cell::new(String::new());
        let answer = |text: &str| {
            prompt.set(text.to_string());
            true
        };
        assert!(editor.remove_unit_row(0, &answer));
        assert_eq!(prompt.take(), "Remove unit \"box\"?");
        assert!(editor.draft().units().is_blank_at(0));

        // The blank row is never offered for removal.
        assert!(!editor.remove_price_row(1, &true));
        assert!(editor.remove_price_row(0, &true));
    }
}
