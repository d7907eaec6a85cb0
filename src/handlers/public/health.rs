// handlers/public/health.rs - GET / and GET /health

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};

/// GET / - service banner
pub async fn root(State(state): State<AppState>) -> ApiResult<serde_json::Value> {
    Ok(ApiResponse::success(json!({
        "name": state.config.app_name,
        "version": env!("CARGO_PKG_VERSION"),
        "auth_mode": state.auth.mode(),
        "reviewer_generation": state.reviewers.is_available(),
    })))
}

/// GET /health - 200 when the store answers, 503 otherwise
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {"status": "ok", "timestamp": now, "database": "ok"}
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "Database temporarily unavailable",
                    "code": "SERVICE_UNAVAILABLE"
                })),
            )
        }
    }
}
