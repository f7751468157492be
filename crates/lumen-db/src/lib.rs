//! # lumen-db: Storage Layer for Lumen Store
//!
//! Database access for the Lumen backend. Two stores live behind this crate:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Lumen Data Stores                                │
//! │                                                                         │
//! │  ┌───────────────────────────┐     ┌────────────────────────────────┐  │
//! │  │  InventoryDb (read-only)  │     │  CatalogDb (read/write)        │  │
//! │  │                           │     │                                │  │
//! │  │  Upstream source of truth │     │  products                      │  │
//! │  │  inventory_products       │ ──► │  product_stock                 │  │
//! │  │  categories / branches    │sync │                                │  │
//! │  └───────────────────────────┘     └────────────────────────────────┘  │
//! │                                                                         │
//! │  The sync pipeline reads the left store and upserts the right one.     │
//! │  This crate never writes to the inventory store.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Pool configuration and the `CatalogDb` facade
//! - [`inventory`] - Read-only `InventoryDb` facade
//! - [`migrations`] - Embedded migrations
//! - [`error`] - Database error types
//! - [`repository`] - Catalog repositories (products, stock records)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lumen_db::{CatalogDb, DbConfig, InventoryDb};
//!
//! let catalog = CatalogDb::new(DbConfig::new("data/catalog.db")).await?;
//! let inventory = InventoryDb::new(DbConfig::new("data/inventory.db").run_migrations(false)).await?;
//!
//! let batch = inventory.fetch_batch(None, 100).await?;
//! let rows = catalog.products().upsert_batch(&rows).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod inventory;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use inventory::InventoryDb;
pub use pool::{CatalogDb, DbConfig};

pub use repository::catalog_product::{CatalogProductRepository, StockStatusJoinRow};
pub use repository::stock::StockRecordRepository;
