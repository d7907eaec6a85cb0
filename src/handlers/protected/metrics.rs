// handlers/protected/metrics.rs - /api/metrics (global catalogue)

use axum::extract::State;

use crate::app::AppState;
use crate::database::models::{Metric, MetricInput};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentAdmin, EntityId, ValidJson};
use crate::services::require_metric;

pub async fn list(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
) -> ApiResult<Vec<Metric>> {
    Ok(ApiResponse::success(state.store.list_metrics().await?))
}

pub async fn get(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    EntityId(id): EntityId,
) -> ApiResult<Metric> {
    Ok(ApiResponse::success(
        require_metric(state.store.as_ref(), id).await?,
    ))
}

pub async fn create(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    ValidJson(payload): ValidJson<MetricInput>,
) -> ApiResult<Metric> {
    let metric = state.store.insert_metric(&payload).await?;
    tracing::info!(metric_id = metric.id, admin_id = admin.id, "Metric created");
    Ok(ApiResponse::created(metric))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    EntityId(id): EntityId,
    ValidJson(payload): ValidJson<MetricInput>,
) -> ApiResult<Metric> {
    let metric = state
        .store
        .update_metric(id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Metric not found"))?;
    Ok(ApiResponse::success(metric))
}

/// DELETE /api/metrics/:id - clears task references and drops its statistics
pub async fn delete(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    EntityId(id): EntityId,
) -> ApiResult<()> {
    if !state.store.delete_metric(id).await? {
        return Err(ApiError::not_found("Metric not found"));
    }
    tracing::info!(metric_id = id, admin_id = admin.id, "Metric deleted");
    Ok(ApiResponse::no_content())
}
