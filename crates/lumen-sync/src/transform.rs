//! # Inventory → Catalog Transform
//!
//! Maps an upstream inventory row into the writable catalog shape.
//!
//! Rules:
//! - category/branch display names are trimmed; blanks become NULL
//! - a missing status defaults to "active"
//! - the resulting row carries no publication fields at all; new rows are
//!   born unpublished and existing rows keep their publication state

use lumen_core::validation::{normalize_label, normalize_status};
use lumen_core::{InventoryProduct, NewCatalogProduct};

/// Builds the catalog upsert row for one inventory product.
pub fn to_catalog_row(product: &InventoryProduct) -> NewCatalogProduct {
    NewCatalogProduct {
        product_id: product.id.clone(),
        name: product.name.clone(),
        price_cents: product.price_cents,
        status: normalize_status(product.status.as_deref()),
        category: normalize_label(product.category.as_deref()),
        branch: normalize_label(product.branch.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn inventory_row() -> InventoryProduct {
        InventoryProduct {
            id: "inv-1".to_string(),
            name: "Aurora Pendant Lamp".to_string(),
            quantity: 40,
            price_cents: 129_900,
            status: None,
            category: Some("  Pendant ".to_string()),
            branch: Some("   ".to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_transform_normalizes_labels_and_status() {
        let row = to_catalog_row(&inventory_row());

        assert_eq!(row.product_id, "inv-1");
        assert_eq!(row.name, "Aurora Pendant Lamp");
        assert_eq!(row.price_cents, 129_900);
        assert_eq!(row.status, "active");
        assert_eq!(row.category.as_deref(), Some("Pendant"));
        assert_eq!(row.branch, None);
    }

    #[test]
    fn test_transform_keeps_explicit_status() {
        let mut product = inventory_row();
        product.status = Some("discontinued".to_string());

        assert_eq!(to_catalog_row(&product).status, "discontinued");
    }
}
