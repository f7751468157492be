//! # Catalog Sync Service
//!
//! Drives sync batches end to end: pull from the inventory source, upsert
//! catalog rows, reconcile stock records, and collect per-item outcomes.
//!
//! The anchor ordering is explicit: stock reconciliation only runs after the
//! product upsert has succeeded, because catalog rows are what the stock
//! records hang off. Per-product reconciliation is sequential; the catalog
//! store is a single logical resource and sequential writes avoid races on
//! the same `product_id` across overlapping runs.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use lumen_core::{
    InitializeReport, NewCatalogProduct, ReconcileAction, StockBatchReport, StockItemResult,
    StockRecord, SyncReport, MAX_SYNC_LIMIT,
};
use lumen_db::{CatalogDb, InventoryDb};

use crate::error::{SyncError, SyncResult};
use crate::reconciler::StockReconciler;
use crate::transform;

/// Orchestrates sync batches between the inventory source and the catalog.
#[derive(Debug, Clone)]
pub struct CatalogSyncService {
    inventory: InventoryDb,
    catalog: CatalogDb,
    reconciler: StockReconciler,
}

impl CatalogSyncService {
    /// Creates a new sync service over the two stores.
    pub fn new(inventory: InventoryDb, catalog: CatalogDb) -> Self {
        let reconciler = StockReconciler::new(catalog.clone());
        CatalogSyncService {
            inventory,
            catalog,
            reconciler,
        }
    }

    /// Runs one full sync batch.
    ///
    /// Pulls up to `limit` inventory rows after the `after` cursor, upserts
    /// the catalog rows, then reconciles every batch product's stock record
    /// sequentially. An empty source batch is a no-op, not an error.
    ///
    /// ## Errors
    /// * [`SyncError::SourceUnavailable`] - inventory fetch failed; nothing
    ///   was written
    /// * [`SyncError::CatalogWriteFailure`] - product upsert failed; stock
    ///   reconciliation was not attempted
    pub async fn run_sync(
        &self,
        after: Option<DateTime<Utc>>,
        limit: u32,
    ) -> SyncResult<SyncReport> {
        let limit = limit.clamp(1, MAX_SYNC_LIMIT);
        info!(?after, limit, "Starting catalog sync run");

        let batch = self
            .inventory
            .fetch_batch(after, limit)
            .await
            .map_err(SyncError::source)?;

        if batch.is_empty() {
            info!("Inventory source returned no rows, nothing to sync");
            return Ok(SyncReport::empty(Utc::now()));
        }

        let rows: Vec<NewCatalogProduct> = batch.iter().map(transform::to_catalog_row).collect();

        let upserted = self
            .catalog
            .products()
            .upsert_batch(&rows)
            .await
            .map_err(SyncError::catalog)?;

        let synced = upserted.len();
        // duplicate product ids silently absorbed by the upsert
        let skipped = batch.len().saturating_sub(synced);

        // Every batch item gets reconciled, duplicates included; the
        // overwrite is idempotent so a repeated id is harmless.
        let mut results = Vec::with_capacity(batch.len());
        for product in &batch {
            let result = self.reconciler.reconcile(&product.id, product.quantity).await;
            results.push(result);
        }

        let stock = StockBatchReport::from_results(results);

        info!(
            synced,
            skipped,
            stock_success = stock.success,
            stock_failed = stock.failed,
            "Catalog sync run complete"
        );

        Ok(SyncReport {
            synced,
            skipped,
            stock,
            timestamp: Utc::now(),
        })
    }

    /// Creates stock records for catalog products that have none.
    ///
    /// Quantities come from the inventory source by id; products the source
    /// no longer recognizes are initialized at zero without complaint.
    pub async fn initialize_missing_stock(&self) -> SyncResult<InitializeReport> {
        let missing = self
            .catalog
            .products()
            .missing_stock_product_ids()
            .await
            .map_err(SyncError::catalog)?;

        if missing.is_empty() {
            info!("All catalog products already have stock records");
            return Ok(InitializeReport { initialized: 0 });
        }

        info!(count = missing.len(), "Initializing missing stock records");

        let now = Utc::now();
        let mut records = Vec::with_capacity(missing.len());

        for product_id in &missing {
            let quantity = self
                .inventory
                .quantity_for(product_id)
                .await
                .map_err(SyncError::source)?
                .unwrap_or(0);

            records.push(StockRecord {
                product_id: product_id.clone(),
                current_quantity: quantity,
                display_quantity: quantity,
                reserved_quantity: 0,
                last_sync_at: now,
                updated_at: now,
            });
        }

        let initialized = self
            .catalog
            .stock()
            .insert_many(&records)
            .await
            .map_err(SyncError::catalog)?;

        info!(initialized, "Stock initialization complete");
        Ok(InitializeReport { initialized })
    }

    /// Display-only reconciliation for a selected set of products.
    ///
    /// For each id with a stock record, sets `display_quantity` to the
    /// STORED `current_quantity`. The inventory source is never consulted,
    /// so this repairs display drift but cannot refresh a stale mirror.
    /// Ids without a stock record are skipped; per-id failures are collected.
    pub async fn manual_sync(&self, product_ids: &[String]) -> SyncResult<StockBatchReport> {
        info!(count = product_ids.len(), "Starting manual stock sync");

        let stocks = self
            .catalog
            .stock()
            .get_many(product_ids)
            .await
            .map_err(SyncError::catalog)?;

        let now = Utc::now();
        let mut results = Vec::with_capacity(stocks.len());

        for stock in &stocks {
            let quantity = stock.current_quantity;
            match self
                .catalog
                .stock()
                .set_display(&stock.product_id, quantity, now)
                .await
            {
                Ok(_) => {
                    results.push(StockItemResult::ok(
                        stock.product_id.clone(),
                        ReconcileAction::Updated,
                        quantity,
                    ));
                }
                Err(e) => {
                    warn!(product_id = %stock.product_id, error = %e, "Manual sync failed for product");
                    results.push(StockItemResult::failed(
                        stock.product_id.clone(),
                        quantity,
                        e.to_string(),
                    ));
                }
            }
        }

        let report = StockBatchReport::from_results(results);
        info!(
            processed = report.processed,
            success = report.success,
            failed = report.failed,
            "Manual stock sync complete"
        );
        Ok(report)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
