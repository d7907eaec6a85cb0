// handlers/public/auth.rs - POST /api/auth/login

use axum::extract::State;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::app::AppState;
use crate::auth::{issue_token, verify_password};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, ValidJson};

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub email: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}

/// POST /api/auth/login - exchange admin email and password for a bearer token
///
/// Unknown email and wrong password produce the same error.
pub async fn login(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let admin = state.store.find_admin_by_email(&payload.email).await?;

    let admin = match admin {
        Some(admin) if verify_password(&payload.password, &admin.password_hash) => admin,
        _ => {
            tracing::warn!("Failed login attempt");
            return Err(ApiError::invalid_credential("Invalid email or password"));
        }
    };

    let issued = issue_token(&state.config.security, admin.id, &admin.email)?;
    tracing::info!(admin_id = admin.id, "Admin logged in");

    Ok(ApiResponse::success(LoginResponse {
        message: "Login successful",
        access_token: issued.access_token,
        token_type: issued.token_type,
        expires_in: issued.expires_in,
    }))
}
