//! # Database Pool Management
//!
//! Connection pool configuration plus the `CatalogDb` facade.
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) mode is enabled on every pool:
//! readers don't block writers and writers don't block readers, which keeps
//! storefront reads responsive while a sync batch is writing.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::catalog_product::CatalogProductRepository;
use crate::repository::stock::StockRecordRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Pool configuration, shared by both stores.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("data/catalog.db")
///     .max_connections(5)
///     .run_migrations(true);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    pub min_connections: u32,

    /// Connection acquire timeout.
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    pub idle_timeout: Duration,

    /// Whether to run this store's migrations on connect.
    /// Leave false when pointing at a store owned by another system.
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a configuration for the given database path.
    /// The file is created on first connect if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection acquire timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// In-memory database configuration (for tests).
    ///
    /// A single connection keeps the in-memory database alive for the life
    /// of the pool.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }
}

/// Builds a SQLite pool with the standard options (WAL, foreign keys on).
pub(crate) async fn build_pool(config: &DbConfig) -> DbResult<SqlitePool> {
    // sqlite://path?mode=rwc creates the file if missing
    let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

    let connect_options = SqliteConnectOptions::from_str(&connect_url)
        .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        // SQLite ships with foreign keys off; product_stock relies on them
        .foreign_keys(true)
        .create_if_missing(true);

    debug!("Connection options configured");

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.connect_timeout)
        .idle_timeout(Some(config.idle_timeout))
        .connect_with(connect_options)
        .await
        .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

    Ok(pool)
}

// =============================================================================
// Catalog Store
// =============================================================================

/// Handle to the catalog store, providing repository access.
///
/// ## Usage
/// ```rust,ignore
/// let catalog = CatalogDb::new(DbConfig::new("data/catalog.db")).await?;
/// let rows = catalog.products().upsert_batch(&batch).await?;
/// let record = catalog.stock().get("inv-1").await?;
/// ```
#[derive(Debug, Clone)]
pub struct CatalogDb {
    pool: SqlitePool,
}

impl CatalogDb {
    /// Connects to the catalog store and (by default) runs its migrations.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing catalog store connection"
        );

        let pool = build_pool(&config).await?;

        info!(
            max_connections = config.max_connections,
            "Catalog pool created"
        );

        let db = CatalogDb { pool };

        if config.run_migrations {
            migrations::run_catalog_migrations(&db.pool).await?;
        }

        Ok(db)
    }

    /// Returns a reference to the connection pool.
    ///
    /// For queries not covered by the repositories; prefer repository methods
    /// when one exists.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the catalog product repository.
    pub fn products(&self) -> CatalogProductRepository {
        CatalogProductRepository::new(self.pool.clone())
    }

    /// Returns the stock record repository.
    pub fn stock(&self) -> StockRecordRepository {
        StockRecordRepository::new(self.pool.clone())
    }

    /// Closes the connection pool. Repository calls fail afterwards.
    pub async fn close(&self) {
        info!("Closing catalog store pool");
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

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_catalog() {
        let db = CatalogDb::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);
    }

    #[tokio::test]
    async fn test_health_check_after_close() {
        let db = CatalogDb::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;
        assert!(!db.health_check().await);
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/catalog.db")
            .max_connections(10)
            .min_connections(2)
            .run_migrations(false);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(!config.run_migrations);
    }
}
