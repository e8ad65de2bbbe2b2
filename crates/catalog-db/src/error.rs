//! # Error Types
//!
//! Three families, one per concern:
//!
//! ```text
//! sqlx::Error / MigrateError / CoreError ──► DbError
//!                                              │
//! FieldError (catalog-core) ──┐                ▼
//!                             ├──────────► EditorError  ── shown by the shell,
//! duplicate name check ───────┘                            editor stays open
//!
//! io::Error / toml::de::Error ──────────► ConfigError
//! ```

use std::path::PathBuf;

use catalog_core::{CoreError, FieldError, Focus, ValidationError};
use sqlx::error::ErrorKind;
use thiserror::Error;

// =============================================================================
// Database Error
// =============================================================================

/// A storage operation failed.
#[derive(Debug, Error)]
pub enum DbError {
    /// No such row, or a system product.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The unique name index fired, typically two editors saving one name.
    #[error("Duplicate {field}")]
    UniqueViolation { field: String },

    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Any other statement failure, `RAISE(ABORT)` from a trigger included.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Begin or commit failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// A stored row can't be represented in the domain model.
    #[error("Corrupt row: {0}")]
    Corrupt(String),

    #[error("Timed out waiting for a database connection")]
    PoolTimedOut,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Wraps a failed begin/commit.
    pub fn transaction(err: sqlx::Error) -> Self {
        DbError::TransactionFailed(err.to_string())
    }
}

/// Classifies driver errors by constraint kind.
///
/// ```text
/// Database(UniqueViolation)      → UniqueViolation { "products.name" }
/// Database(ForeignKeyViolation)  → ForeignKeyViolation
/// Database(other)                → QueryFailed
/// PoolTimedOut                   → PoolTimedOut
/// PoolClosed                     → ConnectionFailed
/// anything else                  → Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                match db_err.kind() {
                    // "UNIQUE constraint failed: products.name"
                    ErrorKind::UniqueViolation => DbError::UniqueViolation {
                        field: message
                            .rsplit(": ")
                            .next()
                            .unwrap_or(message.as_str())
                            .to_string(),
                    },
                    ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation { message },
                    _ => DbError::QueryFailed(message),
                }
            }
            sqlx::Error::PoolTimedOut => DbError::PoolTimedOut,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

impl From<CoreError> for DbError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => DbError::not_found("Product", id),
            other => DbError::Corrupt(other.to_string()),
        }
    }
}

pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Editor Error
// =============================================================================

/// What an editor action reports back to the shell.
///
/// Neither variant is fatal: the editor stays open and editable.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Input was rejected. Nothing was written.
    #[error("{error}")]
    Validation {
        error: ValidationError,
        focus: Focus,
    },

    /// Storage failed. The transaction was rolled back.
    #[error(transparent)]
    Storage(#[from] DbError),

    /// The action needs a product that has been saved at least once.
    #[error("Product has not been saved yet")]
    NotSaved,
}

impl EditorError {
    /// Input that should receive focus, for validation failures.
    pub fn focus(&self) -> Option<Focus> {
        match self {
            EditorError::Validation { focus, .. } => Some(*focus),
            _ => None,
        }
    }
}

impl From<FieldError> for EditorError {
    fn from(err: FieldError) -> Self {
        EditorError::Validation {
            error: err.error,
            focus: err.focus,
        }
    }
}

/// Result type for editor actions.
pub type EditorResult<T> = Result<T, EditorError>;

// =============================================================================
// Config Error
// =============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_keeps_focus() {
        let err: EditorError =
            FieldError::new(ValidationError::required("name"), Focus::Name).into();
        assert_eq!(err.focus(), Some(Focus::Name));
        assert_eq!(err.to_string(), "name is required");
    }

    #[test]
    fn test_storage_error_is_transparent() {
        let err: EditorError = DbError::not_found("Product", 9).into();
        assert_eq!(err.to_string(), "Product not found: 9");
        assert_eq!(err.focus(), None);
    }

    #[test]
    fn test_core_error_mapping() {
        assert!(matches!(
            DbError::from(CoreError::ProductNotFound(4)),
            DbError::NotFound { .. }
        ));
        assert!(matches!(
            DbError::from(CoreError::InvalidStoredValue {
                field: "quantity".to_string(),
                value: -1,
            }),
            DbError::Corrupt(_)
        ));
    }
}
