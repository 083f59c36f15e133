use axum::{extract::State, Json};

use crate::api::handlers::AppState;

/// Service identity and startup-time readiness snapshot
pub async fn root(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "Vanna AI SQL Generator",
        "status": "running",
        "vanna_initialized": state.vanna.is_some(),
        "database_connected": state.database_connected_at_startup,
    }))
}

/// Health check endpoint
///
/// Database reachability is recomputed on every call by acquiring and
/// releasing a fresh connection, so the report reflects the current state
/// rather than the startup probe.
pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let database = match state.provider.acquire().await {
        Ok(connection) => {
            connection.close().await;
            "connected"
        }
        Err(_) => "disconnected",
    };

    let vanna = if state.vanna.is_some() {
        "connected"
    } else {
        "not configured"
    };

    Json(serde_json::json!({
        "status": "healthy",
        "vanna": vanna,
        "database": database,
    }))
}
