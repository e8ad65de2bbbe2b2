//! # Product Manager
//!
//! The product list plus every open editor, wired to one event channel.
//!
//! ## Event Handling
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ProductEditor ──send──► mpsc::unbounded ──► process_events()          │
//! │                                                  │                      │
//! │          ┌───────────────────────────────────────┼─────────────────┐   │
//! │          ▼                                       ▼                 ▼   │
//! │  Saved { id }                        Removed { id }     DuplicateRequested│
//! │  refresh list                        close its editor   open a copy     │
//! │                                      refresh list       as new editor   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A product is open in at most one editor. Asking to edit it again
//! re-activates the existing one.

use catalog_core::{EditorEvent, ProductId, ProductSummary};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::editor::ProductEditor;
use crate::error::DbResult;
use crate::pool::Database;

/// Owns the open editors and the cached product list.
#[derive(Debug)]
pub struct ProductManager {
    db: Database,
    editors: Vec<ProductEditor>,
    current: Option<usize>,
    products: Vec<ProductSummary>,
    tx: UnboundedSender<EditorEvent>,
    rx: UnboundedReceiver<EditorEvent>,
}

impl ProductManager {
    pub fn new(db: Database) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        ProductManager {
            db,
            editors: Vec::new(),
            current: None,
            products: Vec::new(),
            tx,
            rx,
        }
    }

    // =========================================================================
    // Product List
    // =========================================================================

    /// Reloads the product list from storage.
    pub async fn refresh_list(&mut self) -> DbResult<&[ProductSummary]> {
        self.products = self.db.products().list().await?;
        debug!(count = self.products.len(), "Product list refreshed");
        Ok(&self.products)
    }

    /// The list as of the last refresh.
    #[inline]
    pub fn products(&self) -> &[ProductSummary] {
        &self.products
    }

    // =========================================================================
    // Editors
    // =========================================================================

    /// Opens an editor on a blank product and makes it current.
    pub fn new_product(&mut self) -> usize {
        let editor = ProductEditor::new(self.db.clone(), self.tx.clone());
        self.push(editor)
    }

    /// Makes product `id` current, opening an editor only if none exists.
    pub async fn edit_product(&mut self, id: ProductId) -> DbResult<usize> {
        if let Some(index) = self.position(id) {
            debug!(product_id = %id, index, "Re-activating editor");
            self.current = Some(index);
            return Ok(index);
        }

        let editor = ProductEditor::open(self.db.clone(), id, self.tx.clone()).await?;
        Ok(self.push(editor))
    }

    /// Opens an unsaved copy of product `id` and makes it current.
    pub async fn duplicate_product(&mut self, id: ProductId) -> DbResult<usize> {
        let editor = ProductEditor::duplicate_from(self.db.clone(), id, self.tx.clone()).await?;
        Ok(self.push(editor))
    }

    /// Closes the editor at `index`. Unsaved changes are dropped.
    pub fn close_editor(&mut self, index: usize) -> Option<ProductEditor> {
        if index >= self.editors.len() {
            return None;
        }

        let editor = self.editors.remove(index);
        self.current = match self.current {
            _ if self.editors.is_empty() => None,
            Some(current) if current > index => Some(current - 1),
            Some(current) if current == index => Some(index.min(self.editors.len() - 1)),
            other => other,
        };

        debug!(index, title = %editor.title(), "Closed editor");
        Some(editor)
    }

    #[inline]
    pub fn editors(&self) -> &[ProductEditor] {
        &self.editors
    }

    pub fn editor(&self, index: usize) -> Option<&ProductEditor> {
        self.editors.get(index)
    }

    pub fn editor_mut(&mut self, index: usize) -> Option<&mut ProductEditor> {
        self.editors.get_mut(index)
    }

    #[inline]
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn current_editor(&self) -> Option<&ProductEditor> {
        self.current.and_then(|index| self.editors.get(index))
    }

    pub fn current_editor_mut(&mut self) -> Option<&mut ProductEditor> {
        self.current.and_then(|index| self.editors.get_mut(index))
    }

    /// Index of the editor holding stored product `id`.
    pub fn position(&self, id: ProductId) -> Option<usize> {
        self.editors.iter().position(|editor| editor.id() == Some(id))
    }

    fn push(&mut self, editor: ProductEditor) -> usize {
        self.editors.push(editor);
        let index = self.editors.len() - 1;
        self.current = Some(index);
        index
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Handles every event editors have sent since the last call.
    ///
    /// The channel is always drained. The list is refreshed once at the end,
    /// and the first failure is returned after that. Returns how many events
    /// were handled.
    pub async fn process_events(&mut self) -> DbResult<usize> {
        let mut handled = 0;
        let mut stale = false;
        let mut failure = None;

        while let Ok(event) = self.rx.try_recv() {
            debug!(event = ?event, "Processing editor event");

            match event {
                EditorEvent::Saved { .. } => stale = true,
                EditorEvent::Removed { id } => {
                    if let Some(index) = self.position(id) {
                        self.close_editor(index);
                    }
                    stale = true;
                }
                EditorEvent::DuplicateRequested { id } => match self.duplicate_product(id).await {
                    Ok(index) => info!(source_id = %id, index, "Opened duplicate editor"),
                    Err(e) => {
                        warn!(source_id = %id, error = %e, "Could not open duplicate");
                        failure.get_or_insert(e);
                    }
                },
            }

            handled += 1;
        }

        if stale {
            if let Err(e) = self.refresh_list().await {
                warn!(error = %e, "Product list refresh failed");
                failure.get_or_insert(e);
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(handled),
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
    use catalog_core::EditableGrid;

    async fn setup() -> ProductManager {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        ProductManager::new(db)
    }

    async fn save_new(manager: &mut ProductManager, name: &str) -> ProductId {
        let index = manager.new_product();
        let editor = manager.editor_mut(index).unwrap();
        editor.draft_mut().set_name(name);
        editor.draft_mut().set_base_unit("pcs");
        editor.draft_mut().units_mut().set(0, 0, "box").unwrap();
        editor.draft_mut().units_mut().set(0, 1, "6").unwrap();
        editor.save().await.unwrap()
    }

    #[tokio::test]
    async fn test_saved_refreshes_list() {
        let mut manager = setup().await;
        let id = save_new(&mut manager, "Tea").await;
        assert!(manager.products().is_empty());

        assert_eq!(manager.process_events().await.unwrap(), 1);
        assert_eq!(manager.products().len(), 1);
        assert_eq!(manager.products()[0].id, id);
        assert_eq!(manager.products()[0].name, "Tea");

        let json = serde_json::to_value(manager.products()).unwrap();
        assert_eq!(json[0]["code"], format!("P-{:05}", id));
        assert_eq!(json[0]["type"], "stocked");
        assert_eq!(json[0]["active"], true);
    }

    #[tokio::test]
    async fn test_edit_reuses_open_editor() {
        let mut manager = setup().await;
        let id = save_new(&mut manager, "Tea").await;
        manager.new_product();
        assert_eq!(manager.current(), Some(1));

        assert_eq!(manager.edit_product(id).await.unwrap(), 0);
        assert_eq!(manager.editors().len(), 2);
        assert_eq!(manager.current(), Some(0));

        manager.close_editor(0);
        let index = manager.edit_product(id).await.unwrap();
        assert_eq!(manager.editors().len(), 2);
        assert_eq!(manager.current_editor().unwrap().id(), Some(id));
        assert_eq!(manager.editor(index).unwrap().title(), format!("P-{:05}", id));
    }

    #[tokio::test]
    async fn test_removed_closes_editor() {
        let mut manager = setup().await;
        let id = save_new(&mut manager, "Tea").await;
        manager.process_events().await.unwrap();

        let removed = manager.current_editor_mut().unwrap().remove(&true).await;
        assert!(removed.unwrap());
        manager.process_events().await.unwrap();

        assert!(manager.editors().is_empty());
        assert_eq!(manager.current(), None);
        assert!(manager.products().is_empty());
        assert_eq!(manager.position(id), None);
    }

    #[tokio::test]
    async fn test_duplicate_request_opens_copy() {
        let mut manager = setup().await;
        let id = save_new(&mut manager, "Tea").await;
        manager.process_events().await.unwrap();

        assert!(manager.current_editor().unwrap().request_duplicate());
        manager.process_events().await.unwrap();

        assert_eq!(manager.editors().len(), 2);
        let copy = manager.current_editor().unwrap();
        assert_eq!(copy.id(), None);
        assert_eq!(copy.draft().record().name, "Tea");
        assert_eq!(copy.draft().units().caption(0), "1 box = 6 pcs");
        assert_eq!(manager.position(id), Some(0));
    }

    #[tokio::test]
    async fn test_failed_refresh_still_drains_events() {
        let mut manager = setup().await;
        let id = save_new(&mut manager, "Tea").await;
        manager.tx.send(EditorEvent::Removed { id }).unwrap();
        manager.db.close().await;

        assert!(manager.process_events().await.is_err());
        assert!(manager.editors().is_empty());
        assert!(manager.rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_close_editor_keeps_current_valid() {
        let mut manager = setup().await;
        manager.new_product();
        manager.new_product();
        manager.new_product();
        assert_eq!(manager.current(), Some(2));

        assert!(manager.close_editor(2).is_some());
        assert_eq!(manager.current(), Some(1));

        assert!(manager.close_editor(0).is_some());
        assert_eq!(manager.current(), Some(0));

        assert!(manager.close_editor(5).is_none());
        assert!(manager.close_editor(0).is_some());
        assert_eq!(manager.current(), None);
    }

    #[tokio::test]
    async fn test_edit_missing_product() {
        let mut manager = setup().await;
        assert!(manager.edit_product(42).await.is_err());
        assert!(manager.editors().is_empty());
    }
}
