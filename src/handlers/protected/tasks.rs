// handlers/protected/tasks.rs - /api/tasks

use axum::extract::State;

use crate::app::AppState;
use crate::database::models::{Admin, Task, TaskInput};
use crate::database::EntityRef;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentAdmin, EntityId, ValidJson};
use crate::services::{ensure_owned, require_metric};

async fn check_references(
    state: &AppState,
    admin: &Admin,
    payload: &TaskInput,
) -> Result<(), ApiError> {
    let store = state.store.as_ref();
    ensure_owned(store, EntityRef::User(payload.user_id), admin).await?;
    if let Some(metric_id) = payload.metric_id {
        require_metric(store, metric_id).await?;
    }
    Ok(())
}

pub async fn list(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
) -> ApiResult<Vec<Task>> {
    Ok(ApiResponse::success(state.store.list_tasks(admin.id).await?))
}

pub async fn get(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    EntityId(id): EntityId,
) -> ApiResult<Task> {
    ensure_owned(state.store.as_ref(), EntityRef::Task(id), &admin).await?;
    let task = state
        .store
        .get_task(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;
    Ok(ApiResponse::success(task))
}

pub async fn create(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    ValidJson(payload): ValidJson<TaskInput>,
) -> ApiResult<Task> {
    check_references(&state, &admin, &payload).await?;
    let task = state.store.insert_task(&payload).await?;
    tracing::info!(task_id = task.id, admin_id = admin.id, "Task created");
    Ok(ApiResponse::created(task))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    EntityId(id): EntityId,
    ValidJson(payload): ValidJson<TaskInput>,
) -> ApiResult<Task> {
    ensure_owned(state.store.as_ref(), EntityRef::Task(id), &admin).await?;
    check_references(&state, &admin, &payload).await?;
    let task = state
        .store
        .update_task(id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;
    Ok(ApiResponse::success(task))
}

pub async fn delete(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    EntityId(id): EntityId,
) -> ApiResult<()> {
    ensure_owned(state.store.as_ref(), EntityRef::Task(id), &admin).await?;
    if !state.store.delete_task(id).await? {
        return Err(ApiError::not_found("Task not found"));
    }
    Ok(ApiResponse::no_content())
}
