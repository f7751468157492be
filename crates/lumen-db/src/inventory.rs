//! # Inventory Source Facade
//!
//! Read-only access to the upstream inventory store, the source of truth for
//! product quantities. This backend never writes here.
//!
//! ## Batch Contract
//! ```text
//! fetch_batch(after, limit)
//!   │
//!   ├── ordered ascending by created_at
//!   ├── strictly greater than the cursor when one is given
//!   └── single attempt - connectivity failures propagate to the caller,
//!       which reports the whole sync run as source-unavailable
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use lumen_core::InventoryProduct;

use crate::error::DbResult;
use crate::migrations;
use crate::pool::{build_pool, DbConfig};

/// Read-only handle to the upstream inventory store.
#[derive(Debug, Clone)]
pub struct InventoryDb {
    pool: SqlitePool,
}

impl InventoryDb {
    /// Connects to the inventory store.
    ///
    /// Set `config.run_migrations` only for a locally-provisioned stand-in
    /// (development, tests); the real upstream store owns its own schema.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing inventory source connection"
        );

        let pool = build_pool(&config).await?;
        let db = InventoryDb { pool };

        if config.run_migrations {
            migrations::run_inventory_migrations(&db.pool).await?;
        }

        Ok(db)
    }

    /// Fetches one batch of inventory products after the given cursor.
    ///
    /// Rows come back ordered ascending by creation time, strictly newer
    /// than `after` when a cursor is provided. Category and branch arrive as
    /// raw display names joined from the upstream reference tables.
    pub async fn fetch_batch(
        &self,
        after: Option<DateTime<Utc>>,
        limit: u32,
    ) -> DbResult<Vec<InventoryProduct>> {
        debug!(?after, limit, "Fetching inventory batch");

        let products = sqlx::query_as::<_, InventoryProduct>(
            r#"
            SELECT
                p.id,
                p.name,
                p.quantity,
                p.price_cents,
                p.status,
                c.name AS category,
                b.location AS branch,
                p.created_at
            FROM inventory_products p
            LEFT JOIN categories c ON c.id = p.category_id
            LEFT JOIN branches b ON b.id = p.branch_id
            WHERE ?1 IS NULL OR p.created_at > ?1
            ORDER BY p.created_at ASC
            LIMIT ?2
            "#,
        )
        .bind(after)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Inventory batch fetched");
        Ok(products)
    }

    /// Looks up the authoritative quantity for one product.
    ///
    /// Returns `None` when the inventory source no longer knows the id.
    pub async fn quantity_for(&self, product_id: &str) -> DbResult<Option<i64>> {
        let quantity = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT quantity FROM inventory_products WHERE id = ?1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quantity)
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes the connection pool.
    pub async fn close(&self) {
        info!("Closing inventory source pool");
        self.pool.close().await;
    }

    /// Checks whether the store can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
