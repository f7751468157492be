//! # Sync Reports
//!
//! Structured outcome types for sync runs and stock-status queries.
//!
//! Batch operations never throw on partial failure; they return these types
//! with per-item results so callers (and the audit trail) see exactly which
//! products succeeded and which did not.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ReconcileAction, StockRecord};

// =============================================================================
// Per-Item Results
// =============================================================================

/// Outcome of reconciling one product's stock record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItemResult {
    pub product_id: String,

    pub success: bool,

    /// Set on success: whether the record was created or updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ReconcileAction>,

    /// The quantity that was applied (or attempted).
    pub quantity: i64,

    /// Set on failure: what went wrong for this product alone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StockItemResult {
    /// A successful per-item outcome.
    pub fn ok(product_id: impl Into<String>, action: ReconcileAction, quantity: i64) -> Self {
        StockItemResult {
            product_id: product_id.into(),
            success: true,
            action: Some(action),
            quantity,
            error: None,
        }
    }

    /// A failed per-item outcome; the failure stays local to this product.
    pub fn failed(
        product_id: impl Into<String>,
        quantity: i64,
        error: impl Into<String>,
    ) -> Self {
        StockItemResult {
            product_id: product_id.into(),
            success: false,
            action: None,
            quantity,
            error: Some(error.into()),
        }
    }
}

// =============================================================================
// Batch Reports
// =============================================================================

/// Aggregated per-item outcomes for one stock batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockBatchReport {
    pub processed: usize,
    pub success: usize,
    pub failed: usize,
    pub results: Vec<StockItemResult>,
}

impl StockBatchReport {
    /// Builds a report by counting the per-item flags.
    pub fn from_results(results: Vec<StockItemResult>) -> Self {
        let success = results.iter().filter(|r| r.success).count();
        StockBatchReport {
            processed: results.len(),
            success,
            failed: results.len() - success,
            results,
        }
    }

    /// Report for an empty batch.
    pub fn empty() -> Self {
        StockBatchReport {
            processed: 0,
            success: 0,
            failed: 0,
            results: Vec::new(),
        }
    }
}

/// Result of one full sync run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Catalog rows written by the product upsert.
    pub synced: usize,

    /// Batch rows collapsed by the upsert (duplicate product ids).
    pub skipped: usize,

    pub stock: StockBatchReport,

    pub timestamp: DateTime<Utc>,
}

impl SyncReport {
    /// Report for a run where the source returned no rows.
    pub fn empty(timestamp: DateTime<Utc>) -> Self {
        SyncReport {
            synced: 0,
            skipped: 0,
            stock: StockBatchReport::empty(),
            timestamp,
        }
    }
}

/// Result of a missing-stock initialization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializeReport {
    pub initialized: usize,
}

// =============================================================================
// Stock Status (drift report)
// =============================================================================

/// One catalog product's stock status row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockStatusRow {
    pub product_id: String,
    pub product_name: String,
    pub current_quantity: i64,
    pub display_quantity: i64,
    pub reserved_quantity: i64,
    /// `current_quantity != display_quantity`
    pub needs_sync: bool,
    /// `current_quantity - display_quantity`
    pub difference: i64,
    pub has_stock_entry: bool,
    pub last_sync_at: Option<DateTime<Utc>>,
}

impl StockStatusRow {
    /// Builds a status row from a catalog product and its (possibly absent)
    /// stock record. Missing records report zero quantities and no drift.
    pub fn from_parts(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        stock: Option<&StockRecord>,
    ) -> Self {
        let current = stock.map(|s| s.current_quantity).unwrap_or(0);
        let display = stock.map(|s| s.display_quantity).unwrap_or(0);
        StockStatusRow {
            product_id: product_id.into(),
            product_name: product_name.into(),
            current_quantity: current,
            display_quantity: display,
            reserved_quantity: stock.map(|s| s.reserved_quantity).unwrap_or(0),
            needs_sync: current != display,
            difference: current - display,
            has_stock_entry: stock.is_some(),
            last_sync_at: stock.map(|s| s.last_sync_at),
        }
    }
}

/// Counters over a set of status rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockStatusSummary {
    pub total: usize,
    #[serde(rename = "needsSync")]
    pub needs_sync: usize,
    #[serde(rename = "withoutStock")]
    pub without_stock: usize,
}

impl StockStatusSummary {
    /// Summarizes rows by counting their flags.
    pub fn summarize(rows: &[StockStatusRow]) -> Self {
        StockStatusSummary {
            total: rows.len(),
            needs_sync: rows.iter().filter(|r| r.needs_sync).count(),
            without_stock: rows.iter().filter(|r| !r.has_stock_entry).count(),
        }
    }
}

/// Full stock-status report: one row per catalog product plus the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockStatus {
    pub products: Vec<StockStatusRow>,
    pub summary: StockStatusSummary,
}

impl StockStatus {
    pub fn new(products: Vec<StockStatusRow>) -> Self {
        let summary = StockStatusSummary::summarize(&products);
        StockStatus { products, summary }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(current: i64, display: i64) -> StockRecord {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        StockRecord {
            product_id: "inv-1".to_string(),
            current_quantity: current,
            display_quantity: display,
            reserved_quantity: 2,
            last_sync_at: t,
            updated_at: t,
        }
    }

    #[test]
    fn test_batch_report_counts() {
        let report = StockBatchReport::from_results(vec![
            StockItemResult::ok("a", ReconcileAction::Created, 10),
            StockItemResult::failed("b", 5, "boom"),
            StockItemResult::ok("c", ReconcileAction::Updated, 7),
        ]);
        assert_eq!(report.processed, 3);
        assert_eq!(report.success, 2);
        assert_eq!(report.failed, 1);
    }

    #[test]
    fn test_status_row_with_record() {
        let rec = record(40, 25);
        let row = StockStatusRow::from_parts("inv-1", "Lamp", Some(&rec));
        assert!(row.needs_sync);
        assert_eq!(row.difference, 15);
        assert!(row.has_stock_entry);
        assert_eq!(row.reserved_quantity, 2);
    }

    #[test]
    fn test_status_row_without_record() {
        let row = StockStatusRow::from_parts("inv-2", "Sconce", None);
        assert!(!row.needs_sync);
        assert_eq!(row.difference, 0);
        assert_eq!(row.current_quantity, 0);
        assert_eq!(row.display_quantity, 0);
        assert!(!row.has_stock_entry);
        assert!(row.last_sync_at.is_none());
    }

    #[test]
    fn test_summary_counts_flags() {
        let rows = vec![
            StockStatusRow::from_parts("a", "A", Some(&record(40, 25))),
            StockStatusRow::from_parts("b", "B", Some(&record(7, 7))),
            StockStatusRow::from_parts("c", "C", None),
        ];
        let summary = StockStatusSummary::summarize(&rows);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.needs_sync, 1);
        assert_eq!(summary.without_stock, 1);
    }

    #[test]
    fn test_item_result_omits_empty_fields() {
        let json =
            serde_json::to_value(StockItemResult::ok("a", ReconcileAction::Updated, 3)).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["action"], "updated");

        let json = serde_json::to_value(StockItemResult::failed("b", 0, "down")).unwrap();
        assert!(json.get("action").is_none());
        assert_eq!(json["error"], "down");
    }
}
