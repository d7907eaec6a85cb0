// handlers/protected/jobs.rs - /api/jobs

use axum::extract::State;

use crate::app::AppState;
use crate::database::models::{Admin, Job, JobInput};
use crate::database::EntityRef;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentAdmin, EntityId, ValidJson};
use crate::services::{ensure_owned, require_reviewer};

/// Department must be the caller's; reviewer, if any, must exist
async fn check_references(
    state: &AppState,
    admin: &Admin,
    payload: &JobInput,
) -> Result<(), ApiError> {
    let store = state.store.as_ref();
    ensure_owned(store, EntityRef::Department(payload.department_id), admin).await?;
    if let Some(reviewer_id) = payload.reviewer_id {
        require_reviewer(store, reviewer_id).await?;
    }
    Ok(())
}

pub async fn list(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
) -> ApiResult<Vec<Job>> {
    Ok(ApiResponse::success(state.store.list_jobs(admin.id).await?))
}

pub async fn get(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    EntityId(id): EntityId,
) -> ApiResult<Job> {
    ensure_owned(state.store.as_ref(), EntityRef::Job(id), &admin).await?;
    let job = state
        .store
        .get_job(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found"))?;
    Ok(ApiResponse::success(job))
}

pub async fn create(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    ValidJson(payload): ValidJson<JobInput>,
) -> ApiResult<Job> {
    check_references(&state, &admin, &payload).await?;
    let job = state.store.insert_job(&payload).await?;
    tracing::info!(job_id = job.id, admin_id = admin.id, "Job created");
    Ok(ApiResponse::created(job))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    EntityId(id): EntityId,
    ValidJson(payload): ValidJson<JobInput>,
) -> ApiResult<Job> {
    ensure_owned(state.store.as_ref(), EntityRef::Job(id), &admin).await?;
    check_references(&state, &admin, &payload).await?;
    let job = state
        .store
        .update_job(id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found"))?;
    Ok(ApiResponse::success(job))
}

pub async fn delete(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    EntityId(id): EntityId,
) -> ApiResult<()> {
    ensure_owned(state.store.as_ref(), EntityRef::Job(id), &admin).await?;
    if !state.store.delete_job(id).await? {
        return Err(ApiError::not_found("Job not found"));
    }
    tracing::info!(job_id = id, admin_id = admin.id, "Job deleted");
    Ok(ApiResponse::no_content())
}
