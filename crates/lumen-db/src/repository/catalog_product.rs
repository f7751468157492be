//! # Catalog Product Repository
//!
//! Database operations for catalog product rows.
//!
//! ## Upsert Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 upsert_batch (keyed on product_id)                      │
//! │                                                                         │
//! │  NEW product_id:                                                        │
//! │    INSERT with is_published = 0, publish_status = 0                     │
//! │                                                                         │
//! │  EXISTING product_id:                                                   │
//! │    UPDATE name / price_cents / status / category / branch / updated_at  │
//! │    is_published, publish_status, description: LEFT ALONE                │
//! │                                                                         │
//! │  Publication state always survives a re-sync.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use lumen_core::{CatalogProduct, NewCatalogProduct};

/// All columns of a catalog product row, for RETURNING/SELECT lists.
const PRODUCT_COLUMNS: &str = "id, product_id, name, price_cents, status, category, branch, \
     description, is_published, publish_status, inserted_at, updated_at";

/// Repository for catalog product operations.
#[derive(Debug, Clone)]
pub struct CatalogProductRepository {
    pool: SqlitePool,
}

impl CatalogProductRepository {
    /// Creates a new CatalogProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogProductRepository { pool }
    }

    /// Upserts a batch of rows keyed on `product_id`, inside one transaction.
    ///
    /// Duplicate `product_id`s within the batch collapse to a single row
    /// (last occurrence wins); callers can read the collapse count off the
    /// difference between input length and returned length.
    ///
    /// ## Returns
    /// The written rows, one per distinct `product_id`, in first-seen order.
    pub async fn upsert_batch(
        &self,
        rows: &[NewCatalogProduct],
    ) -> DbResult<Vec<CatalogProduct>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        debug!(count = rows.len(), "Upserting catalog products");

        // Collapse in-batch duplicates: last occurrence wins, first-seen order.
        let mut order: Vec<&str> = Vec::new();
        let mut latest: HashMap<&str, &NewCatalogProduct> = HashMap::new();
        for row in rows {
            if !latest.contains_key(row.product_id.as_str()) {
                order.push(row.product_id.as_str());
            }
            latest.insert(row.product_id.as_str(), row);
        }

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;
        let mut upserted = Vec::with_capacity(order.len());

        for product_id in order {
            let row = latest[product_id];
            let id = Uuid::new_v4().to_string();

            let product = sqlx::query_as::<_, CatalogProduct>(&format!(
                r#"
                INSERT INTO products (
                    id, product_id, name, price_cents, status, category, branch,
                    description, is_published, publish_status, inserted_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, 0, 0, ?8, ?8)
                ON CONFLICT (product_id) DO UPDATE SET
                    name = excluded.name,
                    price_cents = excluded.price_cents,
                    status = excluded.status,
                    category = excluded.category,
                    branch = excluded.branch,
                    updated_at = excluded.updated_at
                RETURNING {PRODUCT_COLUMNS}
                "#
            ))
            .bind(id)
            .bind(&row.product_id)
            .bind(&row.name)
            .bind(row.price_cents)
            .bind(&row.status)
            .bind(&row.category)
            .bind(&row.branch)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

            upserted.push(product);
        }

        tx.commit().await?;

        debug!(written = upserted.len(), "Catalog upsert complete");
        Ok(upserted)
    }

    /// Gets a catalog row by its upstream product id.
    pub async fn get_by_product_id(&self, product_id: &str) -> DbResult<Option<CatalogProduct>> {
        let product = sqlx::query_as::<_, CatalogProduct>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE product_id = ?1"
        ))
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a catalog row by its catalog-local id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<CatalogProduct>> {
        let product = sqlx::query_as::<_, CatalogProduct>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Storefront listing: publication-gated, newest first, with optional
    /// status/category filters and a name search.
    pub async fn list_storefront(
        &self,
        status: Option<&str>,
        category: Option<&str>,
        search: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> DbResult<Vec<CatalogProduct>> {
        let products = sqlx::query_as::<_, CatalogProduct>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE publish_status = 1
              AND (?1 IS NULL OR status = ?1)
              AND (?2 IS NULL OR category = ?2)
              AND (?3 IS NULL OR name LIKE '%' || ?3 || '%')
            ORDER BY inserted_at DESC
            LIMIT ?4 OFFSET ?5
            "#
        ))
        .bind(status)
        .bind(category)
        .bind(search)
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Total rows behind [`Self::list_storefront`] for the same filters.
    pub async fn count_storefront(
        &self,
        status: Option<&str>,
        category: Option<&str>,
        search: Option<&str>,
    ) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM products
            WHERE publish_status = 1
              AND (?1 IS NULL OR status = ?1)
              AND (?2 IS NULL OR category = ?2)
              AND (?3 IS NULL OR name LIKE '%' || ?3 || '%')
            "#,
        )
        .bind(status)
        .bind(category)
        .bind(search)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Distinct categories of storefront-visible rows.
    pub async fn distinct_categories(&self) -> DbResult<Vec<String>> {
        let categories = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT category FROM products
            WHERE publish_status = 1 AND category IS NOT NULL
            ORDER BY category
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Admin listing of published rows, newest first.
    pub async fn list_is_published(&self, limit: u32) -> DbResult<Vec<CatalogProduct>> {
        let products = sqlx::query_as::<_, CatalogProduct>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE is_published = 1
            ORDER BY inserted_at DESC
            LIMIT ?1
            "#
        ))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Every catalog row, oldest first.
    pub async fn list_all(&self) -> DbResult<Vec<CatalogProduct>> {
        let products = sqlx::query_as::<_, CatalogProduct>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY inserted_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Rows awaiting publication.
    pub async fn pending(&self) -> DbResult<Vec<CatalogProduct>> {
        let products = sqlx::query_as::<_, CatalogProduct>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_published = 0 ORDER BY inserted_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Count of rows awaiting publication.
    pub async fn pending_count(&self) -> DbResult<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE is_published = 0")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Publishes the selected rows (by catalog-local id), optionally
    /// attaching a description. Sets both publication flags.
    ///
    /// ## Returns
    /// Number of rows actually updated.
    pub async fn publish(&self, ids: &[String], description: Option<&str>) -> DbResult<usize> {
        debug!(count = ids.len(), "Publishing catalog products");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;
        let mut updated = 0usize;

        for id in ids {
            let result = sqlx::query(
                r#"
                UPDATE products SET
                    is_published = 1,
                    publish_status = 1,
                    description = COALESCE(?2, description),
                    updated_at = ?3
                WHERE id = ?1
                "#,
            )
            .bind(id)
            .bind(description)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            updated += result.rows_affected() as usize;
        }

        tx.commit().await?;
        Ok(updated)
    }

    /// Flips `publish_status` on for a single row.
    pub async fn set_publish_status(&self, id: &str) -> DbResult<CatalogProduct> {
        let now = Utc::now();

        let product = sqlx::query_as::<_, CatalogProduct>(&format!(
            r#"
            UPDATE products SET publish_status = 1, updated_at = ?2
            WHERE id = ?1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        product.ok_or_else(|| DbError::not_found("CatalogProduct", id))
    }

    /// Upstream ids of catalog rows that have no stock record yet.
    pub async fn missing_stock_product_ids(&self) -> DbResult<Vec<String>> {
        let ids = sqlx::query_scalar::<_, String>(
            r#"
            SELECT p.product_id
            FROM products p
            LEFT JOIN product_stock s ON s.product_id = p.product_id
            WHERE s.product_id IS NULL
            ORDER BY p.inserted_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    /// Joined stock-status query: every catalog row with its (possibly
    /// absent) stock record columns.
    pub async fn stock_status_rows(&self) -> DbResult<Vec<StockStatusJoinRow>> {
        let rows = sqlx::query_as::<_, StockStatusJoinRow>(
            r#"
            SELECT
                p.product_id,
                p.name AS product_name,
                s.current_quantity,
                s.display_quantity,
                s.reserved_quantity,
                s.last_sync_at
            FROM products p
            LEFT JOIN product_stock s ON s.product_id = p.product_id
            ORDER BY p.inserted_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Counts catalog rows (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// One row of the joined stock-status query. Stock columns are NULL when the
/// product has no stock record.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StockStatusJoinRow {
    pub product_id: String,
    pub product_name: String,
    pub current_quantity: Option<i64>,
    pub display_quantity: Option<i64>,
    pub reserved_quantity: Option<i64>,
    pub last_sync_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{CatalogDb, DbConfig};

    fn row(product_id: &str, name: &str, price_cents: i64) -> NewCatalogProduct {
        NewCatalogProduct {
            product_id: product_id.to_string(),
            name: name.to_string(),
            price_cents,
            status: "active".to_string(),
            category: Some("Pendant".to_string()),
            branch: Some("Main".to_string()),
        }
    }

    async fn catalog() -> CatalogDb {
        CatalogDb::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_starts_unpublished() {
        let db = catalog().await;
        let repo = db.products();

        let written = repo.upsert_batch(&[row("inv-1", "Lamp", 100)]).await.unwrap();
        assert_eq!(written.len(), 1);
        assert!(!written[0].is_published);
        assert!(!written[0].publish_status);
        assert!(written[0].description.is_none());
        assert_eq!(written[0].product_id, "inv-1");
    }

    #[tokio::test]
    async fn test_upsert_refreshes_fields_but_not_publication() {
        let db = catalog().await;
        let repo = db.products();

        let first = repo.upsert_batch(&[row("inv-1", "Lamp", 100)]).await.unwrap();
        repo.publish(&[first[0].id.clone()], Some("hand-blown glass"))
            .await
            .unwrap();

        let second = repo
            .upsert_batch(&[row("inv-1", "Lamp v2", 150)])
            .await
            .unwrap();

        assert_eq!(second.len(), 1);
        let updated = &second[0];
        // same row, refreshed fields
        assert_eq!(updated.id, first[0].id);
        assert_eq!(updated.name, "Lamp v2");
        assert_eq!(updated.price_cents, 150);
        // publication state and description survive the re-sync
        assert!(updated.is_published);
        assert!(updated.publish_status);
        assert_eq!(updated.description.as_deref(), Some("hand-blown glass"));

        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_upsert_collapses_in_batch_duplicates() {
        let db = catalog().await;
        let repo = db.products();

        let written = repo
            .upsert_batch(&[
                row("inv-1", "Lamp", 100),
                row("inv-2", "Sconce", 200),
                row("inv-1", "Lamp latest", 120),
            ])
            .await
            .unwrap();

        // last occurrence wins, first-seen order kept
        assert_eq!(written.len(), 2);
        assert_eq!(written[0].product_id, "inv-1");
        assert_eq!(written[0].name, "Lamp latest");
        assert_eq!(written[1].product_id, "inv-2");
    }

    #[tokio::test]
    async fn test_publication_workflow() {
        let db = catalog().await;
        let repo = db.products();

        let written = repo
            .upsert_batch(&[row("inv-1", "Lamp", 100), row("inv-2", "Sconce", 200)])
            .await
            .unwrap();

        assert_eq!(repo.pending_count().await.unwrap(), 2);

        let updated = repo.publish(&[written[0].id.clone()], None).await.unwrap();
        assert_eq!(updated, 1);
        assert_eq!(repo.pending_count().await.unwrap(), 1);
        assert_eq!(repo.pending().await.unwrap()[0].product_id, "inv-2");
        assert_eq!(repo.list_is_published(100).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_set_publish_status_unknown_id() {
        let db = catalog().await;
        let err = db.products().set_publish_status("nope").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_storefront_listing_is_gated() {
        let db = catalog().await;
        let repo = db.products();

        let written = repo
            .upsert_batch(&[row("inv-1", "Aurora Lamp", 100), row("inv-2", "Sconce", 200)])
            .await
            .unwrap();
        repo.publish(&[written[0].id.clone()], None).await.unwrap();

        let visible = repo.list_storefront(None, None, None, 50, 0).await.unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].product_id, "inv-1");

        let searched = repo
            .list_storefront(None, None, Some("aurora"), 50, 0)
            .await
            .unwrap();
        assert_eq!(searched.len(), 1);

        let missed = repo
            .list_storefront(None, Some("Flush"), None, 50, 0)
            .await
            .unwrap();
        assert!(missed.is_empty());

        assert_eq!(repo.count_storefront(None, None, None).await.unwrap(), 1);
        assert_eq!(repo.distinct_categories().await.unwrap(), vec!["Pendant"]);
    }

    #[tokio::test]
    async fn test_missing_stock_finder() {
        let db = catalog().await;
        let repo = db.products();

        repo.upsert_batch(&[row("inv-1", "Lamp", 100), row("inv-2", "Sconce", 200)])
            .await
            .unwrap();

        let now = chrono::Utc::now();
        sqlx::query(
            r#"
            INSERT INTO product_stock
                (product_id, current_quantity, display_quantity, reserved_quantity, last_sync_at, updated_at)
            VALUES ('inv-1', 5, 5, 0, ?1, ?1)
            "#,
        )
        .bind(now)
        .execute(db.pool())
        .await
        .unwrap();

        let missing = repo.missing_stock_product_ids().await.unwrap();
        assert_eq!(missing, vec!["inv-2".to_string()]);
    }

    #[tokio::test]
    async fn test_stock_status_join_marks_missing_records() {
        let db = catalog().await;
        let repo = db.products();

        repo.upsert_batch(&[row("inv-1", "Lamp", 100), row("inv-2", "Sconce", 200)])
            .await
            .unwrap();

        let now = chrono::Utc::now();
        sqlx::query(
            r#"
            INSERT INTO product_stock
                (product_id, current_quantity, display_quantity, reserved_quantity, last_sync_at, updated_at)
            VALUES ('inv-1', 40, 25, 0, ?1, ?1)
            "#,
        )
        .bind(now)
        .execute(db.pool())
        .await
        .unwrap();

        let rows = repo.stock_status_rows().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].product_id, "inv-1");
        assert_eq!(rows[0].current_quantity, Some(40));
        assert_eq!(rows[0].display_quantity, Some(25));
        assert_eq!(rows[1].product_id, "inv-2");
        assert!(rows[1].current_quantity.is_none());
        assert!(rows[1].last_sync_at.is_none());
    }
}
