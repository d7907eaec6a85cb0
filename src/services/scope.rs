// services/scope.rs - ownership checks along admin -> department -> job -> user
use crate::database::models::{Admin, Metric, Reviewer};
use crate::database::{EntityRef, Store};
use crate::error::ApiError;

/// Fails with `NotFound` unless `entity` exists and belongs to `admin`.
///
/// A row owned by someone else is reported exactly like a missing one.
pub async fn ensure_owned(
    store: &dyn Store,
    entity: EntityRef,
    admin: &Admin,
) -> Result<(), ApiError> {
    match store.owner_of(entity).await? {
        Some(owner) if owner == admin.id => Ok(()),
        owner => {
            if owner.is_some() {
                tracing::debug!(
                    admin_id = admin.id,
                    entity = entity.kind(),
                    id = entity.id(),
                    "Rejected access outside ownership scope"
                );
            }
            Err(ApiError::not_found(format!("{} not found", entity.kind())))
        }
    }
}

/// Metrics are global, so only existence is checked
pub async fn require_metric(store: &dyn Store, id: i64) -> Result<Metric, ApiError> {
    store
        .get_metric(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Metric not found"))
}

pub async fn require_reviewer(store: &dyn Store, id: i64) -> Result<Reviewer, ApiError> {
    store
        .get_reviewer(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Reviewer not found"))
}
