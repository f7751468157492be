//! Product routes: sync trigger, published listings, publication workflow.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use lumen_core::{CatalogProduct, StockRecord, DEFAULT_SYNC_LIMIT};

use crate::audit;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_or_sync))
        .route("/api/products/existing", get(existing))
        .route("/api/products/pending", get(pending))
        .route("/api/products/pending-count", get(pending_count))
        .route("/api/products/publish", post(publish))
        .route("/api/products/{id}/status", put(set_publish_status))
}

// =============================================================================
// Sync Trigger
// =============================================================================

#[derive(Debug, Deserialize)]
struct ProductsQuery {
    sync: Option<String>,
    after: Option<String>,
    limit: Option<u32>,
}

/// GET /api/products
///
/// With `sync=true`, runs a full sync batch against the inventory source.
/// Without it, serves the published-products listing.
async fn list_or_sync(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ProductsQuery>,
) -> ApiResult<Json<Value>> {
    let wants_sync = matches!(params.sync.as_deref(), Some("true") | Some("1"));
    if !wants_sync {
        return existing_body(&state).await.map(Json);
    }

    let after = match params.after.as_deref() {
        Some(raw) => Some(parse_cursor(raw)?),
        None => None,
    };
    let limit = params.limit.unwrap_or(DEFAULT_SYNC_LIMIT);

    let report = state.sync.run_sync(after, limit).await?;

    audit::record(
        &audit::actor_from(&headers),
        "SYNC_PRODUCTS",
        json!({
            "synced": report.synced,
            "skipped": report.skipped,
            "stock": report.stock,
        }),
    );

    Ok(Json(json!({
        "success": true,
        "synced": report.synced,
        "skipped": report.skipped,
        "stock": report.stock,
        "timestamp": report.timestamp,
    })))
}

fn parse_cursor(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ApiError::InvalidRequest(format!("invalid `after` cursor: {raw}")))
}

// =============================================================================
// Published Listing
// =============================================================================

/// A published catalog row with its stock figures merged in.
#[derive(Debug, Serialize)]
struct ProductWithStock {
    #[serde(flatten)]
    product: CatalogProduct,
    /// Shopper-facing quantity; zero when no stock record exists.
    quantity: i64,
    current_quantity: Option<i64>,
    display_quantity: Option<i64>,
    last_sync_at: Option<DateTime<Utc>>,
}

async fn existing_body(state: &AppState) -> ApiResult<Value> {
    let products = state.catalog.products().list_is_published(100).await?;
    let records = state.catalog.stock().list_all().await?;

    let by_id: HashMap<&str, &StockRecord> = records
        .iter()
        .map(|r| (r.product_id.as_str(), r))
        .collect();

    let merged: Vec<ProductWithStock> = products
        .into_iter()
        .map(|product| {
            let stock = by_id.get(product.product_id.as_str()).copied();
            ProductWithStock {
                quantity: stock.map(|s| s.display_quantity).unwrap_or(0),
                current_quantity: stock.map(|s| s.current_quantity),
                display_quantity: stock.map(|s| s.display_quantity),
                last_sync_at: stock.map(|s| s.last_sync_at),
                product,
            }
        })
        .collect();

    Ok(json!({ "success": true, "products": merged }))
}

/// GET /api/products/existing
async fn existing(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    existing_body(&state).await.map(Json)
}

// =============================================================================
// Publication Workflow
// =============================================================================

/// GET /api/products/pending
async fn pending(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let products = state.catalog.products().pending().await?;
    Ok(Json(json!({ "success": true, "products": products })))
}

/// GET /api/products/pending-count
async fn pending_count(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let count = state.catalog.products().pending_count().await?;
    Ok(Json(json!({ "count": count })))
}

#[derive(Debug, Deserialize)]
struct PublishRequest {
    product_ids: Vec<String>,
    description: Option<String>,
}

/// POST /api/products/publish
///
/// Publishes the selected rows (by catalog-local id), optionally attaching a
/// description. Sets both `is_published` and `publish_status`.
async fn publish(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<PublishRequest>,
) -> ApiResult<Json<Value>> {
    if payload.product_ids.is_empty() {
        return Err(ApiError::InvalidRequest(
            "product_ids array is required".to_string(),
        ));
    }

    let description = payload
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());

    let published = state
        .catalog
        .products()
        .publish(&payload.product_ids, description)
        .await?;

    audit::record(
        &audit::actor_from(&headers),
        "PUBLISH_PRODUCTS",
        json!({ "requested": payload.product_ids.len(), "published": published }),
    );

    Ok(Json(json!({ "success": true, "published": published })))
}

/// PUT /api/products/{id}/status
///
/// Flips `publish_status` on, making the row visible to the storefront.
async fn set_publish_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let product = state.catalog.products().set_publish_status(&id).await?;

    audit::record(
        &audit::actor_from(&headers),
        "SET_PUBLISH_STATUS",
        json!({ "id": id, "product_id": product.product_id }),
    );

    Ok(Json(json!({ "success": true, "product": product })))
}
