//! # Product Record
//!
//! The parent entity edited by a product editor.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌─────────────────────┐   ┌─────────────────┐   ┌──────────────────┐   │
//! │  │   ProductRecord     │   │  ProductType    │   │  CostingMethod   │   │
//! │  │  ─────────────────  │   │  ─────────────  │   │  ──────────────  │   │
//! │  │  id (None = new)    │   │  Stocked    (0) │   │  Manual      (0) │   │
//! │  │  name (unique)      │   │  NonStocked (1) │   │  Average     (1) │   │
//! │  │  base_unit          │   │  Service    (2) │   │  Last        (2) │   │
//! │  │  three cost fields  │   └─────────────────┘   └──────────────────┘   │
//! │  │  cost() / code()    │                                                │
//! │  └─────────────────────┘                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! `id` is assigned by storage on first insert. The human-readable code
//! (`P-00042`) is always derived from it, never stored.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Storage identity of a product.
pub type ProductId = i64;

/// Type codes at or above this value belong to system products that are
/// neither listed nor editable.
pub const SYSTEM_TYPE_CODE: i64 = 200;

/// Formats a product id as its display code.
///
/// ## Example
/// ```rust
/// use catalog_core::product::format_code;
///
/// assert_eq!(format_code(42), "P-00042");
/// ```
pub fn format_code(id: ProductId) -> String {
    format!("P-{:05}", id)
}

// =============================================================================
// Product Type
// =============================================================================

/// What kind of product this is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[repr(i32)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    /// Physical goods with tracked stock.
    #[default]
    Stocked = 0,
    /// Physical goods without stock tracking.
    NonStocked = 1,
    /// Labour or other services.
    Service = 2,
}

impl ProductType {
    /// All selectable types, in display order.
    pub const ALL: [ProductType; 3] = [
        ProductType::Stocked,
        ProductType::NonStocked,
        ProductType::Service,
    ];

    /// Persisted discriminant.
    #[inline]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Looks up a type by its persisted discriminant.
    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|t| i64::from(t.code()) == code)
    }

    /// Label shown in type pickers and product lists.
    pub const fn label(self) -> &'static str {
        match self {
            ProductType::Stocked => "Stock",
            ProductType::NonStocked => "Non-stock",
            ProductType::Service => "Service",
        }
    }
}

// =============================================================================
// Costing Method
// =============================================================================

/// Which cost field is the product's effective cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[repr(i32)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CostingMethod {
    /// Cost is entered by hand.
    Manual = 0,
    /// Running average of purchase prices.
    #[default]
    Average = 1,
    /// Price of the most recent purchase.
    Last = 2,
}

impl CostingMethod {
    /// All selectable methods, in display order.
    pub const ALL: [CostingMethod; 3] = [
        CostingMethod::Manual,
        CostingMethod::Average,
        CostingMethod::Last,
    ];

    /// Persisted discriminant.
    #[inline]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Looks up a method by its persisted discriminant.
    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|m| i64::from(m.code()) == code)
    }

    pub const fn label(self) -> &'static str {
        match self {
            CostingMethod::Manual => "Manual cost",
            CostingMethod::Average => "Average cost",
            CostingMethod::Last => "Last purchase cost",
        }
    }
}

// =============================================================================
// Product Record
// =============================================================================

/// A product as edited in one editor session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Storage identity, absent until the first successful save.
    pub id: Option<ProductId>,

    /// Display name, unique among products.
    pub name: String,

    #[serde(rename = "type")]
    pub product_type: ProductType,

    pub active: bool,

    /// Name of the unit every alternate unit converts into.
    pub base_unit: String,

    pub costing_method: CostingMethod,

    pub manual_cost: u64,
    pub average_cost: u64,
    pub last_purchase_cost: u64,
}

impl Default for ProductRecord {
    /// A blank "new product".
    fn default() -> Self {
        ProductRecord {
            id: None,
            name: String::new(),
            product_type: ProductType::default(),
            active: true,
            base_unit: String::new(),
            costing_method: CostingMethod::default(),
            manual_cost: 0,
            average_cost: 0,
            last_purchase_cost: 0,
        }
    }
}

impl ProductRecord {
    /// True until storage has assigned an id.
    #[inline]
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Effective cost selected by the costing method.
    pub fn cost(&self) -> u64 {
        match self.costing_method {
            CostingMethod::Manual => self.manual_cost,
            CostingMethod::Average => self.average_cost,
            CostingMethod::Last => self.last_purchase_cost,
        }
    }

    /// Display code, once the product has been saved.
    pub fn code(&self) -> Option<String> {
        self.id.map(format_code)
    }

    /// Active/inactive label.
    pub fn status_label(&self) -> &'static str {
        status_label(self.active)
    }
}

/// Active/inactive label for product lists.
pub const fn status_label(active: bool) -> &'static str {
    if active {
        "Active"
    } else {
        "Inactive"
    }
}

// =============================================================================
// Product Summary
// =============================================================================

/// One line of the product list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: ProductId,
    pub code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    pub active: bool,
}

impl ProductSummary {
    pub fn new(id: ProductId, name: String, product_type: ProductType, active: bool) -> Self {
        ProductSummary {
            id,
            code: format_code(id),
            name,
            product_type,
            active,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_code_pads_to_five_digits() {
        assert_eq!(format_code(1), "P-00001");
        assert_eq!(format_code(65535), "P-65535");
        assert_eq!(format_code(123456), "P-123456");
    }

    #[test]
    fn test_cost_follows_costing_method() {
        let mut product = ProductRecord {
            manual_cost: 100,
            average_cost: 200,
            last_purchase_cost: 300,
            ..ProductRecord::default()
        };
        assert_eq!(product.cost(), 200);

        product.costing_method = CostingMethod::Manual;
        assert_eq!(product.cost(), 100);

        product.costing_method = CostingMethod::Last;
        assert_eq!(product.cost(), 300);
    }

    #[test]
    fn test_new_product_defaults() {
        let product = ProductRecord::default();
        assert!(product.is_new());
        assert!(product.active);
        assert_eq!(product.product_type, ProductType::Stocked);
        assert_eq!(product.costing_method, CostingMethod::Average);
        assert_eq!(product.code(), None);
    }

    #[test]
    fn test_codes_round_trip() {
        for t in ProductType::ALL {
            assert_eq!(ProductType::from_code(t.code().into()), Some(t));
        }
        for m in CostingMethod::ALL {
            assert_eq!(CostingMethod::from_code(m.code().into()), Some(m));
        }
        assert_eq!(ProductType::from_code(SYSTEM_TYPE_CODE), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(ProductType::NonStocked.label(), "Non-stock");
        assert_eq!(CostingMethod::Last.label(), "Last purchase cost");
        assert_eq!(status_label(false), "Inactive");
    }
}
