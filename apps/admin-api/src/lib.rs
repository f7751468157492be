//! # Lumen Admin API
//!
//! HTTP surface over the sync core and the catalog store.
//!
//! ## Routes
//! ```text
//! GET  /api/products?sync=true&after&limit   run a full sync batch
//! GET  /api/products                         published products + stock
//! GET  /api/products/existing                same listing, explicit route
//! GET  /api/products/pending                 rows awaiting publication
//! GET  /api/products/pending-count
//! POST /api/products/publish                 publish selected rows
//! PUT  /api/products/{id}/status             storefront-enable one row
//! GET  /api/stock-status                     drift report
//! POST /api/initialize-stock                 create missing stock records
//! POST /api/sync-stock                       display-only manual sync
//! GET  /api/client-products                  gated storefront listing
//! GET  /api/client-products/categories
//! GET  /health
//! ```
//!
//! Batch endpoints answer 200 with per-item outcome lists; only anchor-step
//! failures (source fetch, product upsert) produce error statuses.

pub mod audit;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::AdminConfig;
pub use routes::router;
pub use state::AppState;
