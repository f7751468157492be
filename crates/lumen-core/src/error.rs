//! # Error Types
//!
//! Domain-level error types for lumen-core.
//!
//! Validation failures surface here; storage failures live in `lumen-db` and
//! sync-level failures in `lumen-sync`.

use thiserror::Error;

/// Input validation errors.
///
/// Raised before any storage work happens; a failed validation for one
/// product never aborts its siblings in a batch.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A quantity that must be zero or positive is negative.
    #[error("negative quantity {quantity} for product {product_id}")]
    NegativeQuantity { product_id: String, quantity: i64 },

    /// A required identifier is missing or blank.
    #[error("{field} is required")]
    Required { field: String },
}

/// Convenience type alias for Results with ValidationError.
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::NegativeQuantity {
            product_id: "inv-1".to_string(),
            quantity: -4,
        };
        assert_eq!(err.to_string(), "negative quantity -4 for product inv-1");

        let err = ValidationError::Required {
            field: "product_id".to_string(),
        };
        assert_eq!(err.to_string(), "product_id is required");
    }
}
