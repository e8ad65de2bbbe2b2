//! Errors raised by the catalog domain.
//!
//! [`ValidationError`] is what an edit or a save plan rejects with; the shell
//! shows its message next to the offending cell or field. [`CoreError`] covers
//! values read back from storage that the domain cannot represent. Storage and
//! editor failures live in `catalog-db`.

use thiserror::Error;

use crate::product::ProductId;

#[derive(Debug, Error)]
pub enum CoreError {
    /// No such product, or a reserved system product (type code >= 200).
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// A negative amount or an unknown code came back from storage.
    #[error("Invalid stored {field}: {value}")]
    InvalidStoredValue { field: String, value: i64 },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// A rejected edit or save. The row or record it targeted is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Not a number, or a range with more than two parts.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Lower bound of a range is not below its upper bound.
    #[error("{field} range {min} - {max} is invalid: minimum must be less than maximum")]
    InvalidRange { field: String, min: u64, max: u64 },

    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// Alternate unit has the same name as the base unit.
    #[error("unit '{value}' is the base unit")]
    CollidesWithBaseUnit { value: String },

    /// Column cannot be edited on this row.
    #[error("{column} cannot be edited here")]
    ReadOnly { column: String },

    /// Column index outside the grid.
    #[error("unknown column {column}")]
    UnknownColumn { column: usize },

    /// Row index outside the grid.
    #[error("row {row} does not exist")]
    RowOutOfBounds { row: usize },

    /// The grid already holds its maximum number of rows.
    #[error("no more than {cap} rows allowed")]
    CapacityReached { cap: usize },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn must_be_positive(field: impl Into<String>) -> Self {
        ValidationError::MustBePositive {
            field: field.into(),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_field() {
        let err = ValidationError::required("name");
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::InvalidRange {
            field: "quantity".to_string(),
            min: 10,
            max: 5,
        };
        assert_eq!(
            err.to_string(),
            "quantity range 10 - 5 is invalid: minimum must be less than maximum"
        );

        let err = ValidationError::CollidesWithBaseUnit {
            value: "PCS".to_string(),
        };
        assert_eq!(err.to_string(), "unit 'PCS' is the base unit");
    }

    #[test]
    fn test_validation_lifts_into_core_error() {
        let core_err: CoreError = ValidationError::required("base unit").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_not_found_carries_id() {
        assert_eq!(
            CoreError::ProductNotFound(7).to_string(),
            "Product not found: 7"
        );
    }
}
