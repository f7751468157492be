//! # Database Migrations
//!
//! Embedded SQL migrations, one migrator per store.
//!
//! The catalog migrator runs on every startup. The inventory migrator exists
//! only to provision a local stand-in for the upstream store (development and
//! tests); production deployments point at the real upstream database and
//! leave it alone.
//!
//! ## Adding New Migrations
//!
//! 1. Create a new file in `migrations/catalog/` with the next sequence number
//! 2. Name format: `NNN_description.sql`
//! 3. Write idempotent SQL (`IF NOT EXISTS` where possible)
//! 4. Never modify an existing migration - always add a new one

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

/// Embedded migrations for the catalog store.
static CATALOG_MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/catalog");

/// Embedded schema for a locally-provisioned inventory source.
static INVENTORY_MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/inventory");

/// Runs all pending catalog-store migrations.
///
/// Idempotent: applied migrations are tracked in `_sqlx_migrations` and
/// skipped on later runs.
pub async fn run_catalog_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Checking for pending catalog migrations");

    CATALOG_MIGRATOR.run(pool).await?;

    info!("Catalog migrations applied");
    Ok(())
}

/// Provisions the inventory schema on a local stand-in store.
pub async fn run_inventory_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Provisioning local inventory schema");

    INVENTORY_MIGRATOR.run(pool).await?;

    info!("Inventory schema provisioned");
    Ok(())
}
