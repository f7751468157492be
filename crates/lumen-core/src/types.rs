//! # Domain Types
//!
//! Core records used throughout the Lumen backend.
//!
//! ## Two Stores, Two Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  UPSTREAM (read-only)              DOWNSTREAM (read/write)              │
//! │  ────────────────────              ────────────────────────             │
//! │  InventoryProduct                  CatalogProduct                       │
//! │    id                    ────►       product_id (unique)                │
//! │    name, price, ...      sync        name, price, ... (refreshed)       │
//! │    quantity              ────►       is_published / publish_status      │
//! │                                        (NEVER touched by sync)          │
//! │                                    StockRecord (1:1 per product_id)     │
//! │                                      current_quantity  (mirror)         │
//! │                                      display_quantity  (shoppers)       │
//! │                                      reserved_quantity                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! A catalog row has:
//! - `id`: UUID v4, catalog-local, used for admin routes and relations
//! - `product_id`: the upstream inventory id, unique, the sync key

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Inventory Product (upstream)
// =============================================================================

/// A product row as the upstream inventory store reports it.
///
/// Owned entirely by the upstream system; this backend never writes it.
/// `category` and `branch` arrive as raw display names (joined from the
/// upstream's reference tables) and are normalized by the sync transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryProduct {
    /// Upstream product id - the sync key.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Authoritative on-hand quantity.
    pub quantity: i64,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Upstream status; `None` defaults to "active" during transform.
    pub status: Option<String>,

    /// Category display name, untrimmed.
    pub category: Option<String>,

    /// Branch location display name, untrimmed.
    pub branch: Option<String>,

    /// Creation time; the sync cursor orders and filters on this.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Catalog Product (downstream)
// =============================================================================

/// A product row in the catalog store.
///
/// Created on first sight of an upstream `product_id`, updated in place by
/// every later sync. Publication flags survive re-sync untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CatalogProduct {
    /// Catalog-local row id (UUID v4).
    pub id: String,

    /// Upstream inventory id; unique within the catalog.
    pub product_id: String,

    pub name: String,

    pub price_cents: i64,

    pub status: String,

    pub category: Option<String>,

    pub branch: Option<String>,

    /// Admin-entered copy attached at publication time.
    pub description: Option<String>,

    /// Row has been published to the admin-facing listings.
    pub is_published: bool,

    /// Row is visible on the public storefront.
    pub publish_status: bool,

    pub inserted_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl CatalogProduct {
    /// Publication gate: whether storefront read paths may expose this row.
    ///
    /// Sync and reconciliation never flip this; publishing is a deliberate
    /// admin action.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.publish_status
    }
}

/// The writable shape of a catalog upsert.
///
/// Carries only the fields a sync is allowed to set. Rows inserted through
/// this shape always start unpublished; on conflict the publication flags
/// and description of the existing row are left alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCatalogProduct {
    pub product_id: String,
    pub name: String,
    pub price_cents: i64,
    pub status: String,
    pub category: Option<String>,
    pub branch: Option<String>,
}

// =============================================================================
// Stock Record
// =============================================================================

/// Per-product quantity ledger in the catalog store, one-to-one with
/// `CatalogProduct::product_id`.
///
/// Created lazily on first sync or explicit initialization, never deleted by
/// the sync pipeline. `display_quantity <= current_quantity` is NOT enforced:
/// that gap is the drift the status reporter surfaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockRecord {
    pub product_id: String,

    /// Mirror of the upstream authoritative quantity.
    pub current_quantity: i64,

    /// Quantity shown to shoppers.
    pub display_quantity: i64,

    pub reserved_quantity: i64,

    pub last_sync_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl StockRecord {
    /// Whether this record has drifted (display lags the mirror).
    #[inline]
    pub fn needs_sync(&self) -> bool {
        self.current_quantity != self.display_quantity
    }
}

// =============================================================================
// Reconcile Action
// =============================================================================

/// Tagged outcome of a single stock reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconcileAction {
    /// No record existed; one was inserted.
    Created,
    /// An existing record was brought in line.
    Updated,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_product(publish_status: bool) -> CatalogProduct {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        CatalogProduct {
            id: "c0ffee00-0000-4000-8000-000000000001".to_string(),
            product_id: "inv-1".to_string(),
            name: "Aurora Pendant Lamp".to_string(),
            price_cents: 129_900,
            status: "active".to_string(),
            category: Some("Pendant".to_string()),
            branch: Some("Main".to_string()),
            description: None,
            is_published: true,
            publish_status,
            inserted_at: t,
            updated_at: t,
        }
    }

    #[test]
    fn test_visibility_follows_publish_status_only() {
        assert!(sample_product(true).is_visible());
        assert!(!sample_product(false).is_visible());
    }

    #[test]
    fn test_needs_sync_flag() {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let mut record = StockRecord {
            product_id: "inv-1".to_string(),
            current_quantity: 40,
            display_quantity: 40,
            reserved_quantity: 0,
            last_sync_at: t,
            updated_at: t,
        };
        assert!(!record.needs_sync());

        record.display_quantity = 25;
        assert!(record.needs_sync());
    }

    #[test]
    fn test_reconcile_action_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ReconcileAction::Created).unwrap(),
            "\"created\""
        );
        assert_eq!(
            serde_json::to_string(&ReconcileAction::Updated).unwrap(),
            "\"updated\""
        );
    }
}
