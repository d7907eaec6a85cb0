use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use std::sync::Arc;

use super::{decode_token, AuthMode};
use crate::config::SecurityConfig;
use crate::database::models::Admin;
use crate::database::Store;
use crate::error::ApiError;

pub const ADMIN_ID_HEADER: &str = "x-admin-id";

/// Turns request headers into the acting admin.
///
/// `Ok(None)` means no credential material was sent at all. Credentials that
/// are present but unusable are always an error, so callers that tolerate
/// anonymous access still reject a bad token.
#[async_trait]
pub trait AuthResolver: Send + Sync {
    fn mode(&self) -> AuthMode;

    async fn resolve(&self, headers: &HeaderMap, store: &dyn Store)
        -> Result<Option<Admin>, ApiError>;
}

pub fn resolver_for(security: &SecurityConfig) -> Arc<dyn AuthResolver> {
    match security.auth_mode {
        AuthMode::Bearer => Arc::new(BearerResolver::new(security.auth_secret.clone())),
        AuthMode::Header => Arc::new(HeaderResolver),
    }
}

pub struct BearerResolver {
    secret: String,
}

impl BearerResolver {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

#[async_trait]
impl AuthResolver for BearerResolver {
    fn mode(&self) -> AuthMode {
        AuthMode::Bearer
    }

    async fn resolve(
        &self,
        headers: &HeaderMap,
        store: &dyn Store,
    ) -> Result<Option<Admin>, ApiError> {
        let Some(token) = bearer_token(headers) else {
            return Ok(None);
        };

        let claims = decode_token(&self.secret, token)?;
        let admin_id = claims.admin_id()?;

        match store.get_admin(admin_id).await? {
            Some(admin) => Ok(Some(admin)),
            None => {
                tracing::debug!(admin_id, "Token subject no longer exists");
                Err(ApiError::invalid_credential("Invalid or expired token"))
            }
        }
    }
}

pub struct HeaderResolver;

#[async_trait]
impl AuthResolver for HeaderResolver {
    fn mode(&self) -> AuthMode {
        AuthMode::Header
    }

    async fn resolve(
        &self,
        headers: &HeaderMap,
        store: &dyn Store,
    ) -> Result<Option<Admin>, ApiError> {
        let Some(raw) = headers.get(ADMIN_ID_HEADER) else {
            return Ok(None);
        };

        let admin_id: i64 = raw
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .ok_or_else(|| ApiError::malformed_input("X-Admin-Id must be an integer"))?;

        match store.get_admin(admin_id).await? {
            Some(admin) => Ok(Some(admin)),
            None => Err(ApiError::invalid_credential("Unknown admin")),
        }
    }
}

/// Token from `Authorization: Bearer <token>`; other schemes count as absent
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") {
        Some(token.trim())
    } else {
        None
    }
}
