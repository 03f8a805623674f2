use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status plus whether the store answered.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let store_healthy = match state.store.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Health check: store unavailable: {e}");
            false
        }
    };
    let status = if store_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if store_healthy { "ok" } else { "degraded" },
            "version": env!("CARGO_PKG_VERSION"),
            "service": "marketplace-api",
            "store_healthy": store_healthy,
        })),
    )
}
