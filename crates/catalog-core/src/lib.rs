//! # catalog-core: Pure Editing Logic for the Product Catalog
//!
//! Everything a product editor does between "the user typed something" and
//! "these rows must be written", with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Product Catalog Editor                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    UI Shell (out of scope)                      │   │
//! │  │    product list ──► editor tabs ──► unit grid / price grid      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ display / set / take_events            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ catalog-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────────┐   │   │
//! │  │   │  rowset  │  │unit_grid │  │price_grid│  │ plan / draft │   │   │
//! │  │   │  RowSet  │  │ UnitRow  │  │ PriceRow │  │  SavePlan    │   │   │
//! │  │   │  events  │  │ captions │  │  range   │  │  SaveOutcome │   │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • DETERMINISTIC                          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ SavePlan                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 catalog-db (Database Layer)                     │   │
//! │  │      SQLite, migrations, SaveCoordinator, ProductEditor         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`rowset`] - Capacity-bounded rows with a trailing blank row
//! - [`grid`] - Column descriptor tables and text-level cell access
//! - [`unit_grid`] - Alternate units of measure
//! - [`price_grid`] - Quantity-tiered price brackets
//! - [`range`] - `"N"`, `">= N"` and `"N - M"` parsing and formatting
//! - [`product`] - Product record, type and costing method
//! - [`plan`] - Save validation and write planning
//! - [`draft`] - Record and grids of one editor session
//! - [`events`] - Grid change events and editor notifications
//! - [`error`] / [`validation`] - Error types and field rules
//!
//! ## Example Usage
//!
//! ```rust
//! use catalog_core::{EditableGrid, ProductDraft};
//!
//! let mut draft = ProductDraft::new();
//! draft.set_name("Instant Noodles");
//! draft.set_base_unit("pcs");
//!
//! let units = draft.units_mut();
//! units.set(0, 0, "box").unwrap();
//! units.set(0, 1, "40").unwrap();
//! assert_eq!(units.display(0, 2), "1 box = 40 pcs");
//!
//! let prices = draft.prices_mut();
//! prices.set(0, 0, ">=100").unwrap();
//! assert_eq!(prices.display(0, 0), ">= 100");
//!
//! let plan = draft.plan().unwrap();
//! assert_eq!(plan.units.len(), 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod draft;
pub mod error;
pub mod events;
pub mod grid;
pub mod plan;
pub mod price_grid;
pub mod product;
pub mod range;
pub mod rowset;
pub mod unit_grid;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use draft::{ProductDraft, NEW_PRODUCT_TITLE};
pub use error::{CoreError, CoreResult, ValidationError};
pub use events::{EditorEvent, GridEvent};
pub use grid::{Column, EditableGrid};
pub use plan::{FieldError, Focus, SaveOutcome, SavePlan, SaveState, WriteKind};
pub use price_grid::{PriceBracketGrid, PriceRow, MAX_PRICE_ROWS};
pub use product::{
    format_code, CostingMethod, ProductId, ProductRecord, ProductSummary, ProductType,
    SYSTEM_TYPE_CODE,
};
pub use range::{Range, MAX_AMOUNT};
pub use rowset::{GridRow, RowId, RowSet};
pub use unit_grid::{UnitOfMeasureGrid, UnitRow, MAX_UNIT_ROWS};
pub use validation::ValidationResult;
