//! Audit event emission.
//!
//! The backend does not persist audit records itself; it emits structured
//! events on a dedicated tracing target and an external collaborator ships
//! them to the audit store. Events carry the initiating actor (validated by
//! the upstream auth layer and forwarded in a header), an action name, and a
//! details payload.

use axum::http::HeaderMap;
use tracing::info;

/// Header carrying the authenticated actor id, set by the upstream layer.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Fallback actor for unattributed calls (cron triggers, local tooling).
const SYSTEM_ACTOR: &str = "system";

/// Extracts the acting identity from request headers.
pub fn actor_from(headers: &HeaderMap) -> String {
    headers
        .get(ACTOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(SYSTEM_ACTOR)
        .to_string()
}

/// Emits one audit event.
pub fn record(actor: &str, action: &str, details: serde_json::Value) {
    info!(
        target: "audit",
        actor,
        action,
        details = %details,
        "audit event"
    );
}
