//! Route assembly.
//!
//! One module per resource; each contributes a `router()` that is merged
//! here and wired to the shared state.

pub mod health;
pub mod products;
pub mod stock;
pub mod storefront;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(products::router())
        .merge(stock::router())
        .merge(storefront::router())
        .merge(health::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
