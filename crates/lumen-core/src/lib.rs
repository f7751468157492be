//! # lumen-core: Pure Domain Types for Lumen Store
//!
//! The domain vocabulary of the Lumen storefront backend: inventory rows as
//! the upstream store hands them out, catalog rows and stock records as the
//! downstream store keeps them, and the report types the sync pipeline
//! produces.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Lumen Architecture                                │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    admin-api (HTTP surface)                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                lumen-sync (reconciliation core)                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ lumen-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐                  │   │
//! │  │   │   types   │  │  report   │  │ validation │                  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   lumen-db (storage layer)                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (InventoryProduct, CatalogProduct, StockRecord)
//! - [`report`] - Sync and stock-status report types
//! - [`validation`] - Input normalization and quantity rules
//! - [`error`] - Domain error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use report::{
    InitializeReport, StockBatchReport, StockItemResult, StockStatus, StockStatusRow,
    StockStatusSummary, SyncReport,
};
pub use types::{CatalogProduct, InventoryProduct, NewCatalogProduct, ReconcileAction, StockRecord};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default page size for one inventory sync batch.
pub const DEFAULT_SYNC_LIMIT: u32 = 100;

/// Upper bound on a caller-supplied sync batch size.
pub const MAX_SYNC_LIMIT: u32 = 500;

/// Status assigned to inventory rows that arrive without one.
pub const DEFAULT_PRODUCT_STATUS: &str = "active";
