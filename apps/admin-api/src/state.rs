//! Shared application state.

use lumen_db::{CatalogDb, InventoryDb};
use lumen_sync::{CatalogSyncService, StockStatusReporter};

/// State handed to every handler. Everything inside is pool-backed and cheap
/// to clone.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogDb,
    pub inventory: InventoryDb,
    pub sync: CatalogSyncService,
    pub status: StockStatusReporter,
}

impl AppState {
    /// Builds the state (and the sync services) over the two stores.
    pub fn new(catalog: CatalogDb, inventory: InventoryDb) -> Self {
        let sync = CatalogSyncService::new(inventory.clone(), catalog.clone());
        let status = StockStatusReporter::new(catalog.clone());
        AppState {
            catalog,
            inventory,
            sync,
            status,
        }
    }
}
