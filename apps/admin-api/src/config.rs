//! Admin API configuration.
//!
//! Loaded from environment variables with development defaults.

use std::env;

/// Admin API configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// HTTP listen port.
    pub http_port: u16,

    /// Path to the catalog store database file.
    pub catalog_db_path: String,

    /// Path to the inventory source database file.
    pub inventory_db_path: String,

    /// Provision the inventory schema locally on startup.
    /// Only for development against a stand-in store; leave false when the
    /// path points at the real upstream database.
    pub provision_inventory_schema: bool,
}

impl AdminConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = AdminConfig {
            http_port: env::var("LUMEN_HTTP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("LUMEN_HTTP_PORT".to_string()))?,

            catalog_db_path: env::var("LUMEN_CATALOG_DB")
                .unwrap_or_else(|_| "data/catalog.db".to_string()),

            inventory_db_path: env::var("LUMEN_INVENTORY_DB")
                .unwrap_or_else(|_| "data/inventory.db".to_string()),

            provision_inventory_schema: env::var("LUMEN_PROVISION_INVENTORY")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
        };

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}")]
    InvalidValue(String),
}
