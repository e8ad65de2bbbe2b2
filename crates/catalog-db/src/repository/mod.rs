//! # Repository Module
//!
//! One repository per table.
//!
//! ## Read / Write Split
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Reads (editor load, product list, name check)                         │
//! │       │  db.products().get(id)                                         │
//! │       ▼                                                                 │
//! │  &SqlitePool ── any free connection                                    │
//! │                                                                         │
//! │  Writes (save)                                                         │
//! │       │  ProductRepository::insert(&mut *tx, ..)                        │
//! │       ▼                                                                 │
//! │  &mut SqliteConnection ── the SaveCoordinator's open transaction       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Writes never open their own transaction, so a save is all-or-nothing
//! across the three tables.
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`] - products
//! - [`UnitRepository`] - product_uoms
//! - [`PriceRepository`] - product_prices

pub mod price;
pub mod product;
pub mod unit;

pub use price::PriceRepository;
pub use product::ProductRepository;
pub use unit::UnitRepository;

use catalog_core::CoreError;

use crate::error::{DbError, DbResult};

/// Amount as stored. Amounts above `i64::MAX` never pass validation.
pub(crate) fn to_column(field: &str, value: u64) -> DbResult<i64> {
    i64::try_from(value)
        .map_err(|_| DbError::QueryFailed(format!("{} out of range: {}", field, value)))
}

/// Amount as read back. Negative values mean the row was written elsewhere.
pub(crate) fn from_column(field: &str, value: i64) -> DbResult<u64> {
    u64::try_from(value).map_err(|_| {
        CoreError::InvalidStoredValue {
            field: field.to_string(),
            value,
        }
        .into()
    })
}
