//! Health route.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// GET /health
///
/// Reports reachability of both stores. Always answers 200; the flags tell
/// the probe what is actually up.
async fn health(State(state): State<AppState>) -> Json<Value> {
    let catalog = state.catalog.health_check().await;
    let inventory = state.inventory.health_check().await;

    Json(json!({
        "success": catalog && inventory,
        "catalog": catalog,
        "inventory": inventory,
    }))
}
