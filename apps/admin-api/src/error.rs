//! Error types for the Admin API.
//!
//! Every error renders as `{ "success": false, "error": …, "details": … }`.
//! Anchor-step sync failures map to 502/500; per-item failures never reach
//! this type - they ride inside 200 response bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use lumen_db::DbError;
use lumen_sync::SyncError;

/// Admin API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Db(#[from] DbError),
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Short machine-readable label for the response body.
    fn label(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest(_) => "invalid_request",
            ApiError::NotFound(_) => "not_found",
            ApiError::Sync(SyncError::SourceUnavailable(_)) => "source_unavailable",
            ApiError::Sync(SyncError::CatalogWriteFailure(_)) => "catalog_write_failed",
            ApiError::Sync(SyncError::DriftQueryFailure(_)) => "stock_status_unavailable",
            ApiError::Sync(_) => "sync_failed",
            ApiError::Db(DbError::NotFound { .. }) => "not_found",
            ApiError::Db(_) => "database_error",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            // the caller should retry later; nothing was written
            ApiError::Sync(SyncError::SourceUnavailable(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Sync(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Db(DbError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "success": false,
            "error": self.label(),
            "details": self.to_string(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::InvalidRequest("bad cursor".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Sync(SyncError::SourceUnavailable("down".into())).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::Sync(SyncError::CatalogWriteFailure("disk".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Db(DbError::not_found("CatalogProduct", "x")).status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
