//! Storefront routes.
//!
//! Every read path here goes through the publication gate: only rows with
//! `publish_status = true` are served.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use lumen_core::CatalogProduct;

use crate::error::ApiResult;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: u32 = 100;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/client-products", get(client_products))
        .route("/api/client-products/categories", get(categories))
}

#[derive(Debug, Deserialize)]
struct ClientProductsQuery {
    page: Option<u32>,
    limit: Option<u32>,
    status: Option<String>,
    category: Option<String>,
    search: Option<String>,
}

/// A storefront row: the catalog product plus its shopper-facing quantity.
#[derive(Debug, Serialize)]
struct StorefrontProduct {
    #[serde(flatten)]
    product: CatalogProduct,
    display_quantity: i64,
    last_sync_at: Option<DateTime<Utc>>,
}

/// GET /api/client-products
///
/// Publication-gated listing with pagination, optional status/category
/// filters, and a name search. `all` filter values mean "no filter".
async fn client_products(
    State(state): State<AppState>,
    Query(params): Query<ClientProductsQuery>,
) -> ApiResult<Json<Value>> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, DEFAULT_PAGE_SIZE);
    let offset = (page - 1) * limit;

    let status = filter_value(params.status.as_deref());
    let category = filter_value(params.category.as_deref());
    let search = params
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let products = state
        .catalog
        .products()
        .list_storefront(status, category, search, limit, offset)
        .await?;

    let total = state
        .catalog
        .products()
        .count_storefront(status, category, search)
        .await?;

    let mut rows = Vec::with_capacity(products.len());
    for product in products {
        let stock = state.catalog.stock().get(&product.product_id).await?;
        rows.push(StorefrontProduct {
            display_quantity: stock.as_ref().map(|s| s.display_quantity).unwrap_or(0),
            last_sync_at: stock.as_ref().map(|s| s.last_sync_at),
            product,
        });
    }

    let total_pages = (total as u64).div_ceil(u64::from(limit));

    Ok(Json(json!({
        "success": true,
        "products": rows,
        "pagination": {
            "page": page,
            "limit": limit,
            "total": total,
            "totalPages": total_pages,
        },
        "timestamp": Utc::now(),
    })))
}

/// `all` (or blank) means no filtering on that field.
fn filter_value(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

/// GET /api/client-products/categories
async fn categories(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let categories = state.catalog.products().distinct_categories().await?;
    Ok(Json(json!({
        "success": true,
        "categories": categories,
        "timestamp": Utc::now(),
    })))
}
