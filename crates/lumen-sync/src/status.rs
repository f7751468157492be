//! # Stock Status Reporter
//!
//! Computes the drift report: for every catalog product, how the mirrored
//! quantity compares to the shopper-visible one.
//!
//! ## Query Strategy
//! ```text
//! stock_status()
//!   │
//!   ├── primary:  one LEFT JOIN over products × product_stock
//!   │
//!   └── fallback: if the joined query fails, two independent fetches
//!                 (all products, all stock records) merged in memory by
//!                 product_id. Only when BOTH paths fail does the call
//!                 surface DriftQueryFailure.
//! ```
//!
//! Reads only the catalog store; runs independently of any sync.

use std::collections::HashMap;

use tracing::warn;

use lumen_core::{StockRecord, StockStatus, StockStatusRow};
use lumen_db::{CatalogDb, DbResult, StockStatusJoinRow};

use crate::error::{SyncError, SyncResult};

/// Produces stock-status (drift) reports from the catalog store.
#[derive(Debug, Clone)]
pub struct StockStatusReporter {
    catalog: CatalogDb,
}

impl StockStatusReporter {
    /// Creates a new StockStatusReporter.
    pub fn new(catalog: CatalogDb) -> Self {
        StockStatusReporter { catalog }
    }

    /// Computes the status row for every catalog product plus the summary.
    ///
    /// Products without a stock record report zero quantities,
    /// `has_stock_entry = false` and no drift.
    pub async fn stock_status(&self) -> SyncResult<StockStatus> {
        match self.catalog.products().stock_status_rows().await {
            Ok(rows) => Ok(StockStatus::new(
                rows.into_iter().map(row_from_join).collect(),
            )),
            Err(primary) => {
                warn!(error = %primary, "Joined stock-status query failed, trying two-fetch fallback");
                match self.merged_status().await {
                    Ok(status) => Ok(status),
                    Err(fallback) => Err(SyncError::drift(format!(
                        "joined query: {primary}; fallback: {fallback}"
                    ))),
                }
            }
        }
    }

    /// Fallback path: fetch products and stock records separately and merge
    /// them in memory by `product_id`.
    async fn merged_status(&self) -> DbResult<StockStatus> {
        let products = self.catalog.products().list_all().await?;
        let records = self.catalog.stock().list_all().await?;

        let by_id: HashMap<&str, &StockRecord> = records
            .iter()
            .map(|r| (r.product_id.as_str(), r))
            .collect();

        let rows = products
            .iter()
            .map(|p| {
                StockStatusRow::from_parts(
                    p.product_id.clone(),
                    p.name.clone(),
                    by_id.get(p.product_id.as_str()).copied(),
                )
            })
            .collect();

        Ok(StockStatus::new(rows))
    }
}

/// Maps one joined row into a status row. All stock columns are NULL exactly
/// when the product has no stock record.
fn row_from_join(row: StockStatusJoinRow) -> StockStatusRow {
    match (
        row.current_quantity,
        row.display_quantity,
        row.reserved_quantity,
        row.last_sync_at,
    ) {
        (Some(current), Some(display), Some(reserved), Some(last_sync)) => {
            let record = StockRecord {
                product_id: row.product_id.clone(),
                current_quantity: current,
                display_quantity: display,
                reserved_quantity: reserved,
                last_sync_at: last_sync,
                updated_at: last_sync,
            };
            StockStatusRow::from_parts(row.product_id, row.product_name, Some(&record))
        }
        _ => StockStatusRow::from_parts(row.product_id, row.product_name, None),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
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

    async fn seed_stock(db: &CatalogDb, product_id: &str, current: i64, display: i64) {
        let now = Utc::now();
        db.stock()
            .insert(&lumen_core::StockRecord {
                product_id: product_id.to_string(),
                current_quantity: current,
                display_quantity: display,
                reserved_quantity: 0,
                last_sync_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_drift_flags_and_summary() {
        let catalog = catalog_with(&["inv-1", "inv-2", "inv-3"]).await;
        seed_stock(&catalog, "inv-1", 40, 25).await;
        seed_stock(&catalog, "inv-2", 7, 7).await;
        // inv-3: no stock record

        let reporter = StockStatusReporter::new(catalog);
        let status = reporter.stock_status().await.unwrap();

        assert_eq!(status.products.len(), 3);
        let by_id: HashMap<&str, &StockStatusRow> = status
            .products
            .iter()
            .map(|r| (r.product_id.as_str(), r))
            .collect();

        let drifted = by_id["inv-1"];
        assert!(drifted.needs_sync);
        assert_eq!(drifted.difference, 15);
        assert!(drifted.has_stock_entry);

        let clean = by_id["inv-2"];
        assert!(!clean.needs_sync);
        assert_eq!(clean.difference, 0);

        let missing = by_id["inv-3"];
        assert!(!missing.needs_sync);
        assert!(!missing.has_stock_entry);
        assert_eq!(missing.current_quantity, 0);
        assert!(missing.last_sync_at.is_none());

        assert_eq!(status.summary.total, 3);
        assert_eq!(status.summary.needs_sync, 1);
        assert_eq!(status.summary.without_stock, 1);
    }

    #[tokio::test]
    async fn test_fallback_merge_matches_joined_result() {
        let catalog = catalog_with(&["inv-1", "inv-2"]).await;
        seed_stock(&catalog, "inv-1", 40, 25).await;

        let reporter = StockStatusReporter::new(catalog);

        let joined = reporter.stock_status().await.unwrap();
        let merged = reporter.merged_status().await.unwrap();

        assert_eq!(joined.summary, merged.summary);
        assert_eq!(joined.products.len(), merged.products.len());
        for (a, b) in joined.products.iter().zip(merged.products.iter()) {
            assert_eq!(a.product_id, b.product_id);
            assert_eq!(a.needs_sync, b.needs_sync);
            assert_eq!(a.has_stock_entry, b.has_stock_entry);
            assert_eq!(a.difference, b.difference);
        }
    }

    #[tokio::test]
    async fn test_both_paths_failing_surfaces_drift_error() {
        let catalog = catalog_with(&[]).await;
        catalog.close().await;

        let reporter = StockStatusReporter::new(catalog);
        let err = reporter.stock_status().await.unwrap_err();
        assert!(matches!(err, SyncError::DriftQueryFailure(_)));
    }

    #[tokio::test]
    async fn test_empty_catalog_reports_empty_status() {
        let catalog = catalog_with(&[]).await;
        let reporter = StockStatusReporter::new(catalog);

        let status = reporter.stock_status().await.unwrap();
        assert!(status.products.is_empty());
        assert_eq!(status.summary.total, 0);
        assert_eq!(status.summary.needs_sync, 0);
        assert_eq!(status.summary.without_stock, 0);
    }
}
