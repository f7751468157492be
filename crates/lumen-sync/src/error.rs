//! # Sync Error Types
//!
//! The sync taxonomy distinguishes which step of a run failed, because the
//! steps have different blast radii:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SourceUnavailable     inventory fetch failed   → whole run aborts,     │
//! │                                                   nothing was written   │
//! │  CatalogWriteFailure   product upsert failed    → whole run aborts,     │
//! │                                                   no stock reconcile    │
//! │  ReconcileItemFailure  one product's stock      → recorded per item,    │
//! │                        write failed               siblings continue     │
//! │  DriftQueryFailure     both status query paths  → status call fails     │
//! │                        failed                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Sync error type covering the pipeline's failure modes.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The inventory source was unreachable or returned malformed data.
    /// Single attempt per run; the caller retries later.
    #[error("inventory source unavailable: {0}")]
    SourceUnavailable(String),

    /// The catalog product upsert (the anchor step) failed.
    #[error("catalog write failed: {0}")]
    CatalogWriteFailure(String),

    /// One product's stock write failed. Never escapes a batch: the
    /// reconciler converts it into a per-item result.
    #[error("stock reconcile failed: {0}")]
    ReconcileItemFailure(String),

    /// Both the joined stock-status query and the two-fetch fallback failed.
    #[error("stock status unavailable: {0}")]
    DriftQueryFailure(String),

    /// Internal sync error.
    #[error("internal sync error: {0}")]
    Internal(String),
}

impl SyncError {
    /// Wraps an inventory-source failure.
    pub fn source(err: impl std::fmt::Display) -> Self {
        SyncError::SourceUnavailable(err.to_string())
    }

    /// Wraps a catalog-store failure.
    pub fn catalog(err: impl std::fmt::Display) -> Self {
        SyncError::CatalogWriteFailure(err.to_string())
    }

    /// Wraps a per-item stock failure.
    pub fn item(err: impl std::fmt::Display) -> Self {
        SyncError::ReconcileItemFailure(err.to_string())
    }

    /// Wraps a stock-status query failure.
    pub fn drift(err: impl std::fmt::Display) -> Self {
        SyncError::DriftQueryFailure(err.to_string())
    }

    /// True when re-running the operation later can succeed without any
    /// state repair (upserts are idempotent, so a partial run is safe to
    /// replay).
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SyncError::SourceUnavailable(_)
                | SyncError::CatalogWriteFailure(_)
                | SyncError::DriftQueryFailure(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(SyncError::source("connection refused").is_retryable());
        assert!(SyncError::catalog("pool closed").is_retryable());
        assert!(!SyncError::Internal("bug".into()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = SyncError::source("connection refused");
        assert_eq!(
            err.to_string(),
            "inventory source unavailable: connection refused"
        );
    }
}
