// handlers/protected/admins.rs - /api/admins

use axum::extract::State;

use crate::app::AppState;
use crate::auth::hash_password;
use crate::database::models::{AdminChanges, AdminCreate, AdminUpdate, AdminView, NewAdmin};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentAdmin, EntityId, MaybeAdmin, ValidJson};

pub async fn list(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
) -> ApiResult<Vec<AdminView>> {
    let admins = state.store.list_admins().await?;
    Ok(ApiResponse::success(
        admins.into_iter().map(AdminView::from).collect(),
    ))
}

pub async fn get(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    EntityId(id): EntityId,
) -> ApiResult<AdminView> {
    let admin = state
        .store
        .get_admin(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Admin not found"))?;
    Ok(ApiResponse::success(admin.into()))
}

/// POST /api/admins - anonymous only while no admin exists yet
pub async fn create(
    State(state): State<AppState>,
    MaybeAdmin(caller): MaybeAdmin,
    ValidJson(payload): ValidJson<AdminCreate>,
) -> ApiResult<AdminView> {
    if caller.is_none() && state.store.count_admins().await? > 0 {
        return Err(ApiError::unauthenticated(
            "Admin credentials required to create further admins",
        ));
    }

    if state
        .store
        .find_admin_by_email(&payload.email)
        .await?
        .is_some()
    {
        return Err(ApiError::conflict("Admin with this email already exists"));
    }

    let admin = state
        .store
        .insert_admin(NewAdmin {
            email: payload.email,
            full_name: payload.full_name,
            password_hash: hash_password(&payload.password),
        })
        .await?;

    match &caller {
        Some(creator) => {
            tracing::info!(admin_id = admin.id, created_by = creator.id, "Admin created")
        }
        None => tracing::info!(admin_id = admin.id, "Bootstrap admin created"),
    }
    Ok(ApiResponse::created(admin.into()))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    EntityId(id): EntityId,
    ValidJson(payload): ValidJson<AdminUpdate>,
) -> ApiResult<AdminView> {
    let changes = AdminChanges {
        password_hash: payload.new_password().map(hash_password),
        full_name: payload.full_name,
    };

    let admin = state
        .store
        .update_admin(id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found("Admin not found"))?;
    Ok(ApiResponse::success(admin.into()))
}

pub async fn delete(
    State(state): State<AppState>,
    CurrentAdmin(caller): CurrentAdmin,
    EntityId(id): EntityId,
) -> ApiResult<()> {
    if state.store.get_admin(id).await?.is_none() {
        return Err(ApiError::not_found("Admin not found"));
    }
    if state.store.count_departments_of(id).await? > 0 {
        return Err(ApiError::conflict(
            "Cannot delete admin with assigned departments",
        ));
    }

    if !state.store.delete_admin(id).await? {
        return Err(ApiError::not_found("Admin not found"));
    }
    tracing::info!(admin_id = id, deleted_by = caller.id, "Admin deleted");
    Ok(ApiResponse::no_content())
}
