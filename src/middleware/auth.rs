// middleware/auth.rs - extractors that resolve the acting admin
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::app::AppState;
use crate::auth::AuthMode;
use crate::database::models::Admin;
use crate::error::ApiError;

/// The authenticated admin; rejects anonymous requests
#[derive(Debug, Clone)]
pub struct CurrentAdmin(pub Admin);

/// Like [`CurrentAdmin`] but lets anonymous requests through as `None`.
/// Invalid credentials are still rejected.
#[derive(Debug, Clone)]
pub struct MaybeAdmin(pub Option<Admin>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match state
            .auth
            .resolve(&parts.headers, state.store.as_ref())
            .await
        {
            Ok(admin) => Ok(MaybeAdmin(admin)),
            Err(err) => {
                tracing::warn!(
                    method = %parts.method,
                    path = %parts.uri.path(),
                    "Authentication failed: {}",
                    err
                );
                Err(err)
            }
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let MaybeAdmin(admin) = MaybeAdmin::from_request_parts(parts, state).await?;
        admin.map(CurrentAdmin).ok_or_else(|| {
            ApiError::unauthenticated(match state.auth.mode() {
                AuthMode::Bearer => "Missing bearer token",
                AuthMode::Header => "Missing X-Admin-Id header",
            })
        })
    }
}
