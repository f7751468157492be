//! # lumen-sync: Stock Synchronization Core for Lumen Store
//!
//! Reconciles the downstream catalog store against the upstream inventory
//! source and reports drift between the mirrored and shopper-visible
//! quantities.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        One Sync Run                                     │
//! │                                                                         │
//! │  CatalogSyncService::run_sync(after, limit)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. InventoryDb::fetch_batch ── zero rows? ──► empty report, done       │
//! │       │              (failure here: SourceUnavailable, run aborts)      │
//! │       ▼                                                                 │
//! │  2. transform: trim labels, default status, rows born unpublished       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. CatalogDb::products().upsert_batch  ← the ANCHOR step               │
//! │       │              (failure here: CatalogWriteFailure, run aborts)    │
//! │       ▼                                                                 │
//! │  4. StockReconciler::reconcile, per product, SEQUENTIALLY               │
//! │       │              (per-item failures recorded, loop continues)       │
//! │       ▼                                                                 │
//! │  5. SyncReport { synced, skipped, stock: {…, results}, timestamp }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The stock-status reporter runs independently of sync, reading only the
//! catalog store; the publication gate lives on the catalog rows themselves
//! and is never touched by anything in this crate.
//!
//! ## Module Organization
//!
//! - [`service`] - `CatalogSyncService`: run_sync / initialize_missing_stock /
//!   manual_sync
//! - [`reconciler`] - per-product stock reconciliation
//! - [`status`] - stock status (drift) reporting with query fallback
//! - [`transform`] - inventory row → catalog row mapping
//! - [`error`] - sync error taxonomy

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod reconciler;
pub mod service;
pub mod status;
pub mod transform;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{SyncError, SyncResult};
pub use reconciler::StockReconciler;
pub use service::CatalogSyncService;
pub use status::StockStatusReporter;
