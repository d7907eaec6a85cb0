// handlers/protected/departments.rs - /api/departments

use axum::extract::State;

use crate::app::AppState;
use crate::database::models::{DepartmentInput, DepartmentSummary};
use crate::database::EntityRef;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentAdmin, EntityId, ValidJson};
use crate::services::ensure_owned;

async fn summary(state: &AppState, id: i64) -> Result<DepartmentSummary, ApiError> {
    state
        .store
        .department_summary(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Department not found"))
}

pub async fn list(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
) -> ApiResult<Vec<DepartmentSummary>> {
    let departments = state.store.list_departments(admin.id).await?;
    Ok(ApiResponse::success(departments))
}

pub async fn get(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    EntityId(id): EntityId,
) -> ApiResult<DepartmentSummary> {
    ensure_owned(state.store.as_ref(), EntityRef::Department(id), &admin).await?;
    Ok(ApiResponse::success(summary(&state, id).await?))
}

/// POST /api/departments - the caller becomes the owner
pub async fn create(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    ValidJson(payload): ValidJson<DepartmentInput>,
) -> ApiResult<DepartmentSummary> {
    let department = state.store.insert_department(admin.id, &payload).await?;
    tracing::info!(department_id = department.id, admin_id = admin.id, "Department created");
    Ok(ApiResponse::created(summary(&state, department.id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    EntityId(id): EntityId,
    ValidJson(payload): ValidJson<DepartmentInput>,
) -> ApiResult<DepartmentSummary> {
    ensure_owned(state.store.as_ref(), EntityRef::Department(id), &admin).await?;
    state
        .store
        .update_department(id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Department not found"))?;
    Ok(ApiResponse::success(summary(&state, id).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    EntityId(id): EntityId,
) -> ApiResult<()> {
    ensure_owned(state.store.as_ref(), EntityRef::Department(id), &admin).await?;
    if !state.store.delete_department(id).await? {
        return Err(ApiError::not_found("Department not found"));
    }
    tracing::info!(department_id = id, admin_id = admin.id, "Department deleted");
    Ok(ApiResponse::no_content())
}
