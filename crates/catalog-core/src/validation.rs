//! Field rules for product records and unit rows.
//!
//! Grid edits call these before touching a row, and save planning calls the
//! product-level ones again. Whether a product name is already taken needs the
//! database, so that check belongs to the save coordinator in `catalog-db`.

use crate::error::ValidationError;
use crate::range::parse_amount;

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a product name and returns it trimmed.
///
/// ```rust
/// use catalog_core::validation::validate_product_name;
///
/// assert_eq!(validate_product_name("  Sugar 1kg ").unwrap(), "Sugar 1kg");
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    required("name", name)
}

/// Validates the base unit name and returns it trimmed.
pub fn validate_base_unit(unit: &str) -> ValidationResult<String> {
    required("base unit", unit)
}

/// Validates an alternate unit name against the base unit and the names
/// already in the grid. Comparison is case-insensitive.
///
/// ```rust
/// use catalog_core::validation::validate_unit_name;
///
/// assert_eq!(validate_unit_name(" box ", "pcs", ["dozen"]).unwrap(), "box");
/// assert!(validate_unit_name("PCS", "pcs", ["dozen"]).is_err());
/// assert!(validate_unit_name("Dozen", "pcs", ["dozen"]).is_err());
/// ```
pub fn validate_unit_name<'a>(
    name: &str,
    base_unit: &str,
    others: impl IntoIterator<Item = &'a str>,
) -> ValidationResult<String> {
    let name = required("unit name", name)?;
    let folded = name.to_lowercase();

    if folded == base_unit.trim().to_lowercase() {
        return Err(ValidationError::CollidesWithBaseUnit { value: name });
    }

    if others.into_iter().any(|other| other.to_lowercase() == folded) {
        return Err(ValidationError::Duplicate {
            field: "unit name".to_string(),
            value: name,
        });
    }

    Ok(name)
}

fn required(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(value.to_string())
}

/// Parses a strictly positive whole number (unit conversion quantity).
///
/// ```rust
/// use catalog_core::validation::parse_positive;
///
/// assert_eq!(parse_positive("quantity", " 12 ").unwrap(), 12);
/// assert!(parse_positive("quantity", "0").is_err());
/// assert!(parse_positive("quantity", "").is_err());
/// ```
pub fn parse_positive(field: &str, text: &str) -> ValidationResult<u64> {
    if text.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    let value = parse_amount(field, text)?;
    validate_positive(field, value)
}

/// Rejects zero.
pub fn validate_positive(field: &str, value: u64) -> ValidationResult<u64> {
    if value == 0 {
        return Err(ValidationError::must_be_positive(field));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_name_is_trimmed() {
        assert_eq!(validate_product_name("Rice 5kg").unwrap(), "Rice 5kg");
        assert!(matches!(
            validate_product_name(""),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_validate_base_unit() {
        assert_eq!(validate_base_unit(" pcs").unwrap(), "pcs");
        assert!(validate_base_unit("\t").is_err());
    }

    #[test]
    fn test_unit_name_collisions() {
        assert!(validate_unit_name("box", "", Vec::<&str>::new()).is_ok());
        assert!(matches!(
            validate_unit_name("  ", "pcs", Vec::<&str>::new()),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_unit_name("Pcs", " pcs ", Vec::<&str>::new()),
            Err(ValidationError::CollidesWithBaseUnit { .. })
        ));
        assert!(matches!(
            validate_unit_name("BOX", "pcs", ["box"]),
            Err(ValidationError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_parse_positive() {
        assert_eq!(parse_positive("quantity", "3").unwrap(), 3);
        assert!(matches!(
            parse_positive("quantity", "0"),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            parse_positive("quantity", "x"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }
}
