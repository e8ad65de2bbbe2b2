//! # catalog-db: Storage and Editor Sessions for the Product Catalog
//!
//! This crate persists products, their alternate units and their price
//! brackets in SQLite, and runs the editor sessions on top of that storage.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Catalog Editor Data Flow                            │
//! │                                                                         │
//! │  UI shell (tabs, grids, dialogs)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   catalog-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ ProductManager│    │ ProductEditor │    │SaveCoordinator│ │   │
//! │  │   │ (manager.rs)  │───►│ (editor.rs)   │───►│(coordinator) │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────┬───────┘  │   │
//! │  │                                                    │          │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────┴───────┐  │   │
//! │  │   │   Database    │◄───│ Repositories  │◄───│ Transaction  │  │   │
//! │  │   │   (pool.rs)   │    │ product/unit/ │    │ (one / save) │  │   │
//! │  │   │               │    │ price         │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   products │ product_uoms │ product_prices                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - `catalog.toml` loading and environment overrides
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Storage, editor and config error types
//! - [`repository`] - One repository per table
//! - [`coordinator`] - Transactional save and remove
//! - [`editor`] - One product editing session
//! - [`manager`] - Open editors and the product list
//!
//! ## Usage
//!
//! ```rust,ignore
//! use catalog_db::{Database, DbConfig, ProductManager};
//!
//! let db = Database::new(DbConfig::new("catalog.db")).await?;
//! let mut manager = ProductManager::new(db);
//!
//! let index = manager.new_product();
//! let editor = manager.editor_mut(index).unwrap();
//! editor.draft_mut().set_name("Tea");
//! editor.draft_mut().set_base_unit("pcs");
//! editor.save().await?;
//!
//! manager.process_events().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod coordinator;
pub mod editor;
pub mod error;
pub mod manager;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{CatalogConfig, DatabaseSettings};
pub use coordinator::SaveCoordinator;
pub use editor::{Confirm, ProductEditor};
pub use error::{ConfigError, DbError, DbResult, EditorError, EditorResult};
pub use manager::ProductManager;
pub use pool::{Database, DbConfig, Location};

// Repository re-exports for convenience
pub use repository::{PriceRepository, ProductRepository, UnitRepository};
