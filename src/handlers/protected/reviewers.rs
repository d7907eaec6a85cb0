// handlers/protected/reviewers.rs - /api/reviewers and reviewer generation

use axum::extract::State;

use crate::app::AppState;
use crate::database::models::{Reviewer, ReviewerDescriptionRequest, ReviewerInput};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentAdmin, EntityId, ValidJson};
use crate::services::{require_reviewer, StructuredReviewer};

pub async fn list(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
) -> ApiResult<Vec<Reviewer>> {
    Ok(ApiResponse::success(state.store.list_reviewers().await?))
}

pub async fn get(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    EntityId(id): EntityId,
) -> ApiResult<Reviewer> {
    Ok(ApiResponse::success(
        require_reviewer(state.store.as_ref(), id).await?,
    ))
}

pub async fn create(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    ValidJson(payload): ValidJson<ReviewerInput>,
) -> ApiResult<Reviewer> {
    let reviewer = state.store.insert_reviewer(&payload).await?;
    tracing::info!(reviewer_id = reviewer.id, admin_id = admin.id, "Reviewer created");
    Ok(ApiResponse::created(reviewer))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    EntityId(id): EntityId,
    ValidJson(payload): ValidJson<ReviewerInput>,
) -> ApiResult<Reviewer> {
    let reviewer = state
        .store
        .update_reviewer(id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Reviewer not found"))?;
    Ok(ApiResponse::success(reviewer))
}

/// DELETE /api/reviewers/:id - jobs using it keep running without a reviewer
pub async fn delete(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    EntityId(id): EntityId,
) -> ApiResult<()> {
    if !state.store.delete_reviewer(id).await? {
        return Err(ApiError::not_found("Reviewer not found"));
    }
    Ok(ApiResponse::no_content())
}

/// POST /api/reviewers/description - ask the chat service for a profile.
/// The result is returned only, never stored.
pub async fn describe(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    ValidJson(payload): ValidJson<ReviewerDescriptionRequest>,
) -> ApiResult<StructuredReviewer> {
    tracing::info!(admin_id = admin.id, name = %payload.name, "Generating reviewer profile");
    let reviewer = state
        .reviewers
        .generate(&payload.name, &payload.description)
        .await?;
    Ok(ApiResponse::success(reviewer))
}
