// handlers/protected/statistics.rs - /api/statistics

use axum::extract::State;

use crate::app::AppState;
use crate::database::models::{Admin, Statistic, StatisticInput};
use crate::database::EntityRef;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentAdmin, EntityId, ValidJson};
use crate::services::{ensure_owned, require_metric};

async fn check_references(
    state: &AppState,
    admin: &Admin,
    payload: &StatisticInput,
) -> Result<(), ApiError> {
    let store = state.store.as_ref();
    ensure_owned(store, EntityRef::User(payload.user_id), admin).await?;
    require_metric(store, payload.metric_id).await?;
    Ok(())
}

pub async fn list(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
) -> ApiResult<Vec<Statistic>> {
    Ok(ApiResponse::success(
        state.store.list_statistics(admin.id).await?,
    ))
}

pub async fn get(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    EntityId(id): EntityId,
) -> ApiResult<Statistic> {
    ensure_owned(state.store.as_ref(), EntityRef::Statistic(id), &admin).await?;
    let statistic = state
        .store
        .get_statistic(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Statistic not found"))?;
    Ok(ApiResponse::success(statistic))
}

/// POST /api/statistics - one row per (date, user, metric)
pub async fn create(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    ValidJson(payload): ValidJson<StatisticInput>,
) -> ApiResult<Statistic> {
    check_references(&state, &admin, &payload).await?;
    let statistic = state.store.insert_statistic(&payload).await?;
    Ok(ApiResponse::created(statistic))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    EntityId(id): EntityId,
    ValidJson(payload): ValidJson<StatisticInput>,
) -> ApiResult<Statistic> {
    ensure_owned(state.store.as_ref(), EntityRef::Statistic(id), &admin).await?;
    check_references(&state, &admin, &payload).await?;
    let statistic = state
        .store
        .update_statistic(id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Statistic not found"))?;
    Ok(ApiResponse::success(statistic))
}

pub async fn delete(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    EntityId(id): EntityId,
) -> ApiResult<()> {
    ensure_owned(state.store.as_ref(), EntityRef::Statistic(id), &admin).await?;
    if !state.store.delete_statistic(id).await? {
        return Err(ApiError::not_found("Statistic not found"));
    }
    Ok(ApiResponse::no_content())
}
