// handlers/protected/users.rs - /api/users

use axum::extract::State;

use crate::app::AppState;
use crate::database::models::{User, UserInput};
use crate::database::EntityRef;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentAdmin, EntityId, ValidJson};
use crate::services::ensure_owned;

pub async fn list(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
) -> ApiResult<Vec<User>> {
    Ok(ApiResponse::success(state.store.list_users(admin.id).await?))
}

pub async fn get(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    EntityId(id): EntityId,
) -> ApiResult<User> {
    ensure_owned(state.store.as_ref(), EntityRef::User(id), &admin).await?;
    let user = state
        .store
        .get_user(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(ApiResponse::success(user))
}

pub async fn create(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    ValidJson(payload): ValidJson<UserInput>,
) -> ApiResult<User> {
    ensure_owned(state.store.as_ref(), EntityRef::Job(payload.job_id), &admin).await?;
    let user = state.store.insert_user(&payload).await?;
    tracing::info!(user_id = user.id, admin_id = admin.id, "User created");
    Ok(ApiResponse::created(user))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    EntityId(id): EntityId,
    ValidJson(payload): ValidJson<UserInput>,
) -> ApiResult<User> {
    let store = state.store.as_ref();
    ensure_owned(store, EntityRef::User(id), &admin).await?;
    ensure_owned(store, EntityRef::Job(payload.job_id), &admin).await?;
    let user = store
        .update_user(id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(ApiResponse::success(user))
}

/// DELETE /api/users/:id - also removes the user's tasks and statistics
pub async fn delete(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    EntityId(id): EntityId,
) -> ApiResult<()> {
    ensure_owned(state.store.as_ref(), EntityRef::User(id), &admin).await?;
    if !state.store.delete_user(id).await? {
        return Err(ApiError::not_found("User not found"));
    }
    tracing::info!(user_id = id, admin_id = admin.id, "User deleted");
    Ok(ApiResponse::no_content())
}
