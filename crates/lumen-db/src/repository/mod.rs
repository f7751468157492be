//! # Repository Module
//!
//! Repositories for the catalog store. Each repository wraps one table (or
//! one query family) behind a small API; SQL never leaks above this layer.
//!
//! ## Available Repositories
//!
//! - [`catalog_product::CatalogProductRepository`] - catalog rows, publication
//!   workflow, stock-status join
//! - [`stock::StockRecordRepository`] - per-product stock records

pub mod catalog_product;
pub mod stock;
