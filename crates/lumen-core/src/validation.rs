//! # Validation & Normalization
//!
//! Rules applied to upstream data before it is written downstream.

use crate::error::{ValidationError, ValidationResult};
use crate::DEFAULT_PRODUCT_STATUS;

/// Normalizes an upstream display label (category name, branch location).
///
/// Trims surrounding whitespace; blank or absent labels become `None`.
pub fn normalize_label(raw: Option<&str>) -> Option<String> {
    match raw {
        Some(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        None => None,
    }
}

/// Normalizes an upstream status, defaulting blanks to
/// [`DEFAULT_PRODUCT_STATUS`].
pub fn normalize_status(raw: Option<&str>) -> String {
    normalize_label(raw).unwrap_or_else(|| DEFAULT_PRODUCT_STATUS.to_string())
}

/// Rejects negative authoritative quantities.
///
/// A violation is a per-product failure; callers record it and continue with
/// the rest of the batch.
pub fn ensure_non_negative_quantity(product_id: &str, quantity: i64) -> ValidationResult<()> {
    if quantity < 0 {
        return Err(ValidationError::NegativeQuantity {
            product_id: product_id.to_string(),
            quantity,
        });
    }
    Ok(())
}

/// Rejects blank identifiers.
pub fn ensure_present(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label(Some("  Pendant ")), Some("Pendant".to_string()));
        assert_eq!(normalize_label(Some("   ")), None);
        assert_eq!(normalize_label(None), None);
    }

    #[test]
    fn test_normalize_status_defaults() {
        assert_eq!(normalize_status(Some("inactive")), "inactive");
        assert_eq!(normalize_status(Some(" ")), "active");
        assert_eq!(normalize_status(None), "active");
    }

    #[test]
    fn test_quantity_rule() {
        assert!(ensure_non_negative_quantity("inv-1", 0).is_ok());
        assert!(ensure_non_negative_quantity("inv-1", 40).is_ok());
        assert!(ensure_non_negative_quantity("inv-1", -1).is_err());
    }

    #[test]
    fn test_ensure_present() {
        assert!(ensure_present("product_id", "inv-1").is_ok());
        assert!(ensure_present("product_id", "  ").is_err());
    }
}
