//! # Stock Record Reconciler
//!
//! Brings one product's stock record in line with a supplied authoritative
//! quantity.
//!
//! ## One Reconcile
//! ```text
//! reconcile(product_id, authoritative_quantity)
//!   │
//!   ├── record absent:  INSERT current = display = quantity, reserved = 0
//!   │                   → action "created"
//!   ├── record present: UPDATE current = display = quantity,
//!   │                   refresh last_sync_at / updated_at
//!   │                   → action "updated"
//!   └── any failure:    captured in the returned item result;
//!                       the caller's batch loop continues
//! ```
//!
//! This is a FULL reconciliation: it sets both quantities equal and thereby
//! discards any display drift a manual sync had left on this product -
//! upstream is authoritative.

use chrono::Utc;
use tracing::{debug, warn};

use lumen_core::validation::ensure_non_negative_quantity;
use lumen_core::{ReconcileAction, StockItemResult, StockRecord};
use lumen_db::CatalogDb;

use crate::error::{SyncError, SyncResult};

/// Reconciles single stock records against authoritative quantities.
#[derive(Debug, Clone)]
pub struct StockReconciler {
    catalog: CatalogDb,
}

impl StockReconciler {
    /// Creates a new StockReconciler over the catalog store.
    pub fn new(catalog: CatalogDb) -> Self {
        StockReconciler { catalog }
    }

    /// Reconciles one product and reports the outcome.
    ///
    /// Never returns an error: a failure is folded into the item result so a
    /// batch caller can keep going. Re-applying the same quantity is a no-op
    /// (idempotent overwrite), so duplicate batch entries are harmless.
    pub async fn reconcile(&self, product_id: &str, authoritative_quantity: i64) -> StockItemResult {
        match self.apply(product_id, authoritative_quantity).await {
            Ok(action) => {
                debug!(product_id, quantity = authoritative_quantity, ?action, "Stock reconciled");
                StockItemResult::ok(product_id, action, authoritative_quantity)
            }
            Err(e) => {
                warn!(product_id, quantity = authoritative_quantity, error = %e, "Stock reconcile failed");
                StockItemResult::failed(product_id, authoritative_quantity, e.to_string())
            }
        }
    }

    /// Fetch-then-insert-or-update against the stock table.
    async fn apply(&self, product_id: &str, quantity: i64) -> SyncResult<ReconcileAction> {
        ensure_non_negative_quantity(product_id, quantity).map_err(SyncError::item)?;

        let stock = self.catalog.stock();
        let now = Utc::now();

        let existing = stock.get(product_id).await.map_err(SyncError::item)?;

        match existing {
            Some(_) => {
                stock
                    .update_quantities(product_id, quantity, now)
                    .await
                    .map_err(SyncError::item)?;
                Ok(ReconcileAction::Updated)
            }
            None => {
                let record = StockRecord {
                    product_id: product_id.to_string(),
                    current_quantity: quantity,
                    display_quantity: quantity,
                    reserved_quantity: 0,
                    last_sync_at: now,
                    updated_at: now,
                };
                stock.insert(&record).await.map_err(SyncError::item)?;
                Ok(ReconcileAction::Created)
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::NewCatalogProduct;
    use lumen_db::DbConfig;

    async fn catalog_with(ids: &[&str]) -> CatalogDb {
        let db = CatalogDb::new(DbConfig::in_memory()).await.unwrap();
        let rows: Vec<NewCatalogProduct> = ids
            .iter()
            .map(|id| NewCatalogProduct {
                product_id: id.to_string(),
                name: format!("Lamp {id}"),
                price_cents: 100,
                status: "active".to_string(),
                category: None,
                branch: None,
            })
            .collect();
        db.products().upsert_batch(&rows).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_creates_then_updates() {
        let catalog = catalog_with(&["inv-1"]).await;
        let reconciler = StockReconciler::new(catalog.clone());

        let first = reconciler.reconcile("inv-1", 40).await;
        assert!(first.success);
        assert_eq!(first.action, Some(ReconcileAction::Created));

        let second = reconciler.reconcile("inv-1", 40).await;
        assert!(second.success);
        assert_eq!(second.action, Some(ReconcileAction::Updated));

        let record = catalog.stock().get("inv-1").await.unwrap().unwrap();
        assert_eq!(record.current_quantity, 40);
        assert_eq!(record.display_quantity, 40);
        assert_eq!(record.reserved_quantity, 0);
    }

    #[tokio::test]
    async fn test_overwrites_manual_drift() {
        let catalog = catalog_with(&["inv-1"]).await;
        let reconciler = StockReconciler::new(catalog.clone());

        reconciler.reconcile("inv-1", 40).await;
        catalog
            .stock()
            .set_display("inv-1", 25, Utc::now())
            .await
            .unwrap();

        // full reconcile discards the drift
        let result = reconciler.reconcile("inv-1", 40).await;
        assert!(result.success);

        let record = catalog.stock().get("inv-1").await.unwrap().unwrap();
        assert_eq!(record.display_quantity, 40);
    }

    #[tokio::test]
    async fn test_negative_quantity_is_item_failure() {
        let catalog = catalog_with(&["inv-1"]).await;
        let reconciler = StockReconciler::new(catalog.clone());

        let result = reconciler.reconcile("inv-1", -5).await;
        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().contains("negative"));
        assert!(catalog.stock().get("inv-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_failure_is_captured_not_raised() {
        let catalog = catalog_with(&[]).await;
        let reconciler = StockReconciler::new(catalog.clone());

        // no catalog row for this id: the stock insert violates the foreign key
        let result = reconciler.reconcile("ghost", 5).await;
        assert!(!result.success);
        assert!(result.error.is_some());
    }
}
