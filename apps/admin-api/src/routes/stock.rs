//! Stock routes: drift report, initialization, manual sync.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::audit;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/stock-status", get(stock_status))
        .route("/api/initialize-stock", post(initialize_stock))
        .route("/api/sync-stock", post(sync_stock))
}

/// GET /api/stock-status
///
/// One row per catalog product with the drift flags, plus the summary.
async fn stock_status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    let status = state.status.stock_status().await?;

    audit::record(
        &audit::actor_from(&headers),
        "VIEW_STOCK_STATUS",
        json!({
            "count": status.summary.total,
            "needsSync": status.summary.needs_sync,
        }),
    );

    Ok(Json(json!({
        "success": true,
        "products": status.products,
        "summary": status.summary,
    })))
}

/// POST /api/initialize-stock
///
/// Creates stock records for catalog products that have none, seeded with
/// the source's current quantities.
async fn initialize_stock(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    let report = state.sync.initialize_missing_stock().await?;

    audit::record(
        &audit::actor_from(&headers),
        "INITIALIZE_STOCK",
        json!({ "count": report.initialized }),
    );

    let message = if report.initialized == 0 {
        "All products already have stock entries".to_string()
    } else {
        format!("Initialized stock for {} products", report.initialized)
    };

    Ok(Json(json!({
        "success": true,
        "message": message,
        "initialized": report.initialized,
    })))
}

#[derive(Debug, Deserialize)]
struct SyncStockRequest {
    product_ids: Vec<String>,
}

/// POST /api/sync-stock
///
/// Display-only manual sync for the selected products. Per-id failures ride
/// in the results list; the call itself still answers 200.
async fn sync_stock(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<SyncStockRequest>,
) -> ApiResult<Json<Value>> {
    if payload.product_ids.is_empty() {
        return Err(ApiError::InvalidRequest(
            "product_ids array is required".to_string(),
        ));
    }

    let report = state.sync.manual_sync(&payload.product_ids).await?;

    audit::record(
        &audit::actor_from(&headers),
        "SYNC_STOCK",
        json!({
            "productIds": payload.product_ids,
            "successCount": report.success,
            "failCount": report.failed,
            "results": report.results,
        }),
    );

    let message = if report.failed > 0 {
        format!("Synced {} products, {} failed", report.success, report.failed)
    } else {
        format!("Synced {} products", report.success)
    };

    Ok(Json(json!({
        "success": true,
        "message": message,
        "results": report.results,
        "summary": { "successCount": report.success, "failCount": report.failed },
    })))
}
