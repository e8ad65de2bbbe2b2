//! # Product Draft
//!
//! The complete in-memory state of one product editor: the record plus its
//! two grids. Keeps the grids in step with the record (base unit captions)
//! and applies the ids a committed save produced.

use crate::plan::{FieldError, SaveOutcome, SavePlan};
use crate::price_grid::{PriceBracketGrid, PriceRow};
use crate::product::{CostingMethod, ProductId, ProductRecord, ProductType};
use crate::range::parse_amount;
use crate::unit_grid::{UnitOfMeasureGrid, UnitRow};
use crate::validation::ValidationResult;

/// Title shown for a product that has not been saved yet.
pub const NEW_PRODUCT_TITLE: &str = "New product";

/// Record and grids edited together.
#[derive(Debug, Clone, Default)]
pub struct ProductDraft {
    record: ProductRecord,
    units: UnitOfMeasureGrid,
    prices: PriceBracketGrid,
}

impl ProductDraft {
    /// A blank new product.
    pub fn new() -> Self {
        Self::default()
    }

    /// A draft of a stored product and its line items.
    pub fn from_parts(
        record: ProductRecord,
        units: impl IntoIterator<Item = UnitRow>,
        prices: impl IntoIterator<Item = PriceRow>,
    ) -> Self {
        let mut draft = ProductDraft {
            record,
            units: UnitOfMeasureGrid::new(),
            prices: PriceBracketGrid::new(),
        };
        draft.units.load(units);
        draft.units.set_base_unit(&draft.record.base_unit);
        draft.prices.load(prices);
        draft
    }

    // =========================================================================
    // Reads
    // =========================================================================

    #[inline]
    pub fn record(&self) -> &ProductRecord {
        &self.record
    }

    #[inline]
    pub fn id(&self) -> Option<ProductId> {
        self.record.id
    }

    #[inline]
    pub fn units(&self) -> &UnitOfMeasureGrid {
        &self.units
    }

    #[inline]
    pub fn prices(&self) -> &PriceBracketGrid {
        &self.prices
    }

    /// Grid cells are validated by the grid itself.
    #[inline]
    pub fn units_mut(&mut self) -> &mut UnitOfMeasureGrid {
        &mut self.units
    }

    #[inline]
    pub fn prices_mut(&mut self) -> &mut PriceBracketGrid {
        &mut self.prices
    }

    /// Editor title: the product code, or [`NEW_PRODUCT_TITLE`].
    pub fn title(&self) -> String {
        self.record
            .code()
            .unwrap_or_else(|| NEW_PRODUCT_TITLE.to_string())
    }

    // =========================================================================
    // Record Edits
    // =========================================================================

    /// Stores the name as typed. Trimming and checks happen at save.
    pub fn set_name(&mut self, name: &str) {
        self.record.name = name.to_string();
    }

    pub fn set_product_type(&mut self, product_type: ProductType) {
        self.record.product_type = product_type;
    }

    pub fn set_active(&mut self, active: bool) {
        self.record.active = active;
    }

    pub fn set_costing_method(&mut self, method: CostingMethod) {
        self.record.costing_method = method;
    }

    /// Stores the base unit and refreshes the conversion captions.
    pub fn set_base_unit(&mut self, unit: &str) {
        self.record.base_unit = unit.to_string();
        self.units.set_base_unit(unit);
    }

    /// Parses the manual cost. Empty text means zero.
    pub fn set_manual_cost(&mut self, text: &str) -> ValidationResult<()> {
        self.record.manual_cost = parse_cost("manual cost", text)?;
        Ok(())
    }

    pub fn set_average_cost(&mut self, text: &str) -> ValidationResult<()> {
        self.record.average_cost = parse_cost("average cost", text)?;
        Ok(())
    }

    pub fn set_last_purchase_cost(&mut self, text: &str) -> ValidationResult<()> {
        self.record.last_purchase_cost = parse_cost("last purchase cost", text)?;
        Ok(())
    }

    // =========================================================================
    // Save Support
    // =========================================================================

    /// See [`SavePlan::build`].
    pub fn plan(&self) -> Result<SavePlan, FieldError> {
        SavePlan::build(&self.record, &self.units, &self.prices)
    }

    /// Applies a committed save: ids, trimmed text, empty deletion lists.
    pub fn apply_outcome(&mut self, plan: &SavePlan, outcome: &SaveOutcome) {
        self.record.id = Some(outcome.product_id);
        self.record.name = plan.product.name.clone();
        self.record.base_unit = plan.product.base_unit.clone();

        let units = self.units.rows_mut();
        units.assign_ids(&outcome.unit_ids);
        units.clear_pending_deletions();

        let prices = self.prices.rows_mut();
        prices.assign_ids(&outcome.price_ids);
        prices.clear_pending_deletions();
    }

    /// Turns a loaded product into an unsaved copy of itself.
    pub fn detach(&mut self) {
        self.record.id = None;
        self.units.clear_ids();
        self.prices.clear_ids();
    }
}

fn parse_cost(field: &str, text: &str) -> ValidationResult<u64> {
    if text.trim().is_empty() {
        return Ok(0);
    }
    parse_amount(field, text)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::WriteKind;
    use crate::range::Range;

    fn stored() -> ProductDraft {
        let record = ProductRecord {
            id: Some(3),
            name: "Mineral Water".to_string(),
            base_unit: "bottle".to_string(),
            ..ProductRecord::default()
        };
        ProductDraft::from_parts(
            record,
            vec![UnitRow::new(Some(10), "carton", 24)],
            vec![PriceRow {
                id: Some(20),
                quantity: Range::at_least(1),
                price1: Range::exactly(3000),
                ..PriceRow::default()
            }],
        )
    }

    #[test]
    fn test_new_draft_title() {
        assert_eq!(ProductDraft::new().title(), NEW_PRODUCT_TITLE);
        assert_eq!(stored().title(), "P-00003");
    }

    #[test]
    fn test_loaded_base_unit_reaches_captions() {
        let draft = stored();
        assert_eq!(draft.units().caption(0), "1 carton = 24 bottle");
        assert_eq!(draft.units().rows().row_count(), 2);
        assert_eq!(draft.prices().rows().row_count(), 2);
    }

    #[test]
    fn test_base_unit_edit_updates_captions() {
        let mut draft = stored();
        draft.set_base_unit("can");
        assert_eq!(draft.units().caption(0), "1 carton = 24 can");
        assert_eq!(draft.record().base_unit, "can");
    }

    #[test]
    fn test_costs() {
        let mut draft = ProductDraft::new();
        draft.set_manual_cost("1500").unwrap();
        draft.set_average_cost("").unwrap();
        assert!(draft.set_last_purchase_cost("abc").is_err());
        draft.set_costing_method(CostingMethod::Manual);

        assert_eq!(draft.record().cost(), 1500);
        assert_eq!(draft.record().average_cost, 0);
    }

    #[test]
    fn test_apply_outcome_assigns_ids() {
        let mut draft = ProductDraft::new();
        draft.set_name("  Tea ");
        draft.set_base_unit("pcs");
        draft.units_mut().set_name(0, "box").unwrap();
        draft.units_mut().set_quantity(0, "12").unwrap();
        draft.prices_mut().set_quantity(0, "5").unwrap();

        let plan = draft.plan().unwrap();
        let outcome = SaveOutcome {
            product_id: 42,
            unit_ids: vec![(0, 100)],
            price_ids: vec![(0, 200)],
        };
        draft.apply_outcome(&plan, &outcome);

        assert_eq!(draft.id(), Some(42));
        assert_eq!(draft.record().name, "Tea");
        assert_eq!(draft.units().get(0).id, Some(100));
        assert_eq!(draft.prices().get(0).id, Some(200));
        assert_eq!(draft.title(), "P-00042");
    }

    #[test]
    fn test_apply_outcome_clears_pending_deletions() {
        let mut draft = stored();
        draft.units_mut().remove_at(0);
        draft.prices_mut().remove_at(0);

        let plan = draft.plan().unwrap();
        assert_eq!(plan.unit_deletions, vec![10]);
        assert_eq!(plan.price_deletions, vec![20]);

        draft.apply_outcome(
            &plan,
            &SaveOutcome {
                product_id: 3,
                ..SaveOutcome::default()
            },
        );
        assert!(draft.units().pending_deletions().is_empty());
        assert!(draft.prices().pending_deletions().is_empty());
    }

    #[test]
    fn test_detach_makes_everything_new() {
        let mut draft = stored();
        draft.detach();

        assert_eq!(draft.id(), None);
        assert_eq!(draft.title(), NEW_PRODUCT_TITLE);

        let plan = draft.plan().unwrap();
        assert_eq!(plan.product.write, WriteKind::Insert);
        assert!(plan.units.iter().all(|u| u.write == WriteKind::Insert));
        assert!(plan.prices.iter().all(|p| p.write == WriteKind::Insert));
        assert_eq!(draft.units().get(0).name, "carton");
    }
}
