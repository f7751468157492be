//! # Stock Record Repository
//!
//! Database operations for per-product stock records.
//!
//! The split between [`StockRecordRepository::get`] and the write methods is
//! deliberate: the reconciler owns the fetch-then-insert-or-update decision
//! so it can tag each outcome as created or updated.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use lumen_core::StockRecord;

/// All columns of a stock record row.
const STOCK_COLUMNS: &str =
    "product_id, current_quantity, display_quantity, reserved_quantity, last_sync_at, updated_at";

/// Repository for stock record operations.
#[derive(Debug, Clone)]
pub struct StockRecordRepository {
    pool: SqlitePool,
}

impl StockRecordRepository {
    /// Creates a new StockRecordRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockRecordRepository { pool }
    }

    /// Gets the stock record for one product.
    pub async fn get(&self, product_id: &str) -> DbResult<Option<StockRecord>> {
        let record = sqlx::query_as::<_, StockRecord>(&format!(
            "SELECT {STOCK_COLUMNS} FROM product_stock WHERE product_id = ?1"
        ))
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Gets the stock records for a set of products; ids without a record
    /// are simply absent from the result.
    pub async fn get_many(&self, product_ids: &[String]) -> DbResult<Vec<StockRecord>> {
        let mut records = Vec::with_capacity(product_ids.len());
        for product_id in product_ids {
            if let Some(record) = self.get(product_id).await? {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Lists every stock record.
    pub async fn list_all(&self) -> DbResult<Vec<StockRecord>> {
        let records = sqlx::query_as::<_, StockRecord>(&format!(
            "SELECT {STOCK_COLUMNS} FROM product_stock ORDER BY product_id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Inserts a new stock record.
    pub async fn insert(&self, record: &StockRecord) -> DbResult<StockRecord> {
        debug!(product_id = %record.product_id, "Inserting stock record");

        sqlx::query(
            r#"
            INSERT INTO product_stock (
                product_id, current_quantity, display_quantity,
                reserved_quantity, last_sync_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&record.product_id)
        .bind(record.current_quantity)
        .bind(record.display_quantity)
        .bind(record.reserved_quantity)
        .bind(record.last_sync_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(record.clone())
    }

    /// Inserts a batch of stock records inside one transaction.
    pub async fn insert_many(&self, records: &[StockRecord]) -> DbResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        debug!(count = records.len(), "Bulk-inserting stock records");

        let mut tx = self.pool.begin().await?;

        for record in records {
            sqlx::query(
                r#"
                INSERT INTO product_stock (
                    product_id, current_quantity, display_quantity,
                    reserved_quantity, last_sync_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(&record.product_id)
            .bind(record.current_quantity)
            .bind(record.display_quantity)
            .bind(record.reserved_quantity)
            .bind(record.last_sync_at)
            .bind(record.updated_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(records.len())
    }

    /// Full reconciliation write: sets both quantities to the authoritative
    /// value and refreshes the sync timestamps.
    pub async fn update_quantities(
        &self,
        product_id: &str,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> DbResult<StockRecord> {
        debug!(product_id = %product_id, quantity, "Updating stock quantities");

        let record = sqlx::query_as::<_, StockRecord>(&format!(
            r#"
            UPDATE product_stock SET
                current_quantity = ?2,
                display_quantity = ?2,
                last_sync_at = ?3,
                updated_at = ?3
            WHERE product_id = ?1
            RETURNING {STOCK_COLUMNS}
            "#
        ))
        .bind(product_id)
        .bind(quantity)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        record.ok_or_else(|| DbError::not_found("StockRecord", product_id))
    }

    /// Display-only reconciliation write: sets `display_quantity` and leaves
    /// `current_quantity` untouched.
    pub async fn set_display(
        &self,
        product_id: &str,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> DbResult<StockRecord> {
        debug!(product_id = %product_id, quantity, "Setting display quantity");

        let record = sqlx::query_as::<_, StockRecord>(&format!(
            r#"
            UPDATE product_stock SET
                display_quantity = ?2,
                last_sync_at = ?3,
                updated_at = ?3
            WHERE product_id = ?1
            RETURNING {STOCK_COLUMNS}
            "#
        ))
        .bind(product_id)
        .bind(quantity)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        record.ok_or_else(|| DbError::not_found("StockRecord", product_id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{CatalogDb, DbConfig};
    use lumen_core::NewCatalogProduct;

    async fn catalog_with_products(ids: &[&str]) -> CatalogDb {
        let db = CatalogDb::new(DbConfig::in_memory()).await.unwrap();
        let rows: Vec<NewCatalogProduct> = ids
            .iter()
            .map(|id| NewCatalogProduct {
                product_id: id.to_string(),
                name: format!("Lamp {id}"),
                price_cents: 100,
                status: "active".to_string(),
                category: None,
                branch: None,
            })
            .collect();
        db.products().upsert_batch(&rows).await.unwrap();
        db
    }

    fn record(product_id: &str, current: i64, display: i64) -> StockRecord {
        let now = Utc::now();
        StockRecord {
            product_id: product_id.to_string(),
            current_quantity: current,
            display_quantity: display,
            reserved_quantity: 0,
            last_sync_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = catalog_with_products(&["inv-1"]).await;
        let repo = db.stock();

        assert!(repo.get("inv-1").await.unwrap().is_none());

        repo.insert(&record("inv-1", 40, 40)).await.unwrap();

        let found = repo.get("inv-1").await.unwrap().unwrap();
        assert_eq!(found.current_quantity, 40);
        assert_eq!(found.display_quantity, 40);
        assert_eq!(found.reserved_quantity, 0);
    }

    #[tokio::test]
    async fn test_update_quantities_sets_both() {
        let db = catalog_with_products(&["inv-1"]).await;
        let repo = db.stock();

        repo.insert(&record("inv-1", 40, 25)).await.unwrap();

        let updated = repo
            .update_quantities("inv-1", 55, Utc::now())
            .await
            .unwrap();
        assert_eq!(updated.current_quantity, 55);
        assert_eq!(updated.display_quantity, 55);
    }

    #[tokio::test]
    async fn test_set_display_leaves_current_alone() {
        let db = catalog_with_products(&["inv-1"]).await;
        let repo = db.stock();

        repo.insert(&record("inv-1", 40, 25)).await.unwrap();

        let updated = repo.set_display("inv-1", 40, Utc::now()).await.unwrap();
        assert_eq!(updated.current_quantity, 40);
        assert_eq!(updated.display_quantity, 40);
    }

    #[tokio::test]
    async fn test_update_missing_record_is_not_found() {
        let db = catalog_with_products(&["inv-1"]).await;
        let err = db
            .stock()
            .update_quantities("inv-1", 5, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_negative_quantity_rejected_by_schema() {
        let db = catalog_with_products(&["inv-1"]).await;
        let err = db.stock().insert(&record("inv-1", -3, 0)).await.unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));
    }

    #[tokio::test]
    async fn test_insert_many_and_get_many() {
        let db = catalog_with_products(&["inv-1", "inv-2", "inv-3"]).await;
        let repo = db.stock();

        let inserted = repo
            .insert_many(&[record("inv-1", 1, 1), record("inv-2", 2, 2)])
            .await
            .unwrap();
        assert_eq!(inserted, 2);

        let found = repo
            .get_many(&[
                "inv-1".to_string(),
                "inv-3".to_string(),
                "inv-2".to_string(),
            ])
            .await
            .unwrap();
        // inv-3 has no record and is simply absent
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].product_id, "inv-1");
        assert_eq!(found[1].product_id, "inv-2");

        assert_eq!(repo.list_all().await.unwrap().len(), 2);
    }
}
