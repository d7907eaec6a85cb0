// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::auth::JwtError;
use crate::database::DatabaseError;
use crate::services::gigachat::UpstreamError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 401 Unauthorized - no credential material at all
    Unauthenticated(String),

    // 401 Unauthorized - credential present but unusable
    InvalidCredential(String),

    // 400 Bad Request
    MalformedInput {
        message: String,
        field_errors: Option<BTreeMap<String, String>>,
    },

    // 404 Not Found (also used for resources outside the caller's scope)
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 502 Bad Gateway (chat service unreachable or returned an error status)
    UpstreamUnavailable {
        message: String,
        status: Option<u16>,
        body: Option<String>,
    },

    // 502 Bad Gateway (chat service reply not in the expected shape)
    UpstreamFormatError(String),

    // 500 Internal Server Error
    Internal(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Unauthenticated(_) => 401,
            ApiError::InvalidCredential(_) => 401,
            ApiError::MalformedInput { .. } => 400,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::UpstreamUnavailable { .. } => 502,
            ApiError::UpstreamFormatError(_) => 502,
            ApiError::Internal(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::Unauthenticated(msg) => msg,
            ApiError::InvalidCredential(msg) => msg,
            ApiError::MalformedInput { message, .. } => message,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::UpstreamUnavailable { message, .. } => message,
            ApiError::UpstreamFormatError(msg) => msg,
            ApiError::Internal(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Unauthenticated(_) => "UNAUTHENTICATED",
            ApiError::InvalidCredential(_) => "INVALID_CREDENTIAL",
            ApiError::MalformedInput { .. } => "MALFORMED_INPUT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::UpstreamUnavailable { .. } => "UPSTREAM_UNAVAILABLE",
            ApiError::UpstreamFormatError(_) => "UPSTREAM_FORMAT_ERROR",
            ApiError::Internal(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        let mut response = json!({
            "success": false,
            "error": self.message(),
            "code": self.error_code()
        });

        match self {
            ApiError::MalformedInput {
                field_errors: Some(field_errors),
                ..
            } => {
                response["field_errors"] = json!(field_errors);
            }
            ApiError::UpstreamUnavailable { status, body, .. } => {
                if status.is_some() || body.is_some() {
                    response["upstream"] = json!({ "status": status, "body": body });
                }
            }
            _ => {}
        }

        response
    }
}

impl ApiError {
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ApiError::Unauthenticated(message.into())
    }

    pub fn invalid_credential(message: impl Into<String>) -> Self {
        ApiError::InvalidCredential(message.into())
    }

    pub fn malformed_input(message: impl Into<String>) -> Self {
        ApiError::MalformedInput {
            message: message.into(),
            field_errors: None,
        }
    }

    pub fn validation_error(
        message: impl Into<String>,
        field_errors: BTreeMap<String, String>,
    ) -> Self {
        ApiError::MalformedInput {
            message: message.into(),
            field_errors: Some(field_errors),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn upstream_format(message: impl Into<String>) -> Self {
        ApiError::UpstreamFormatError(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => ApiError::not_found(msg),
            DatabaseError::Conflict(msg) => ApiError::conflict(msg),
            DatabaseError::ConfigMissing(_) | DatabaseError::InvalidDatabaseUrl => {
                tracing::error!("Database misconfigured: {}", err);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            DatabaseError::MigrationError(msg) => {
                tracing::error!("Migration error: {}", msg);
                ApiError::service_unavailable("Service is being updated, please try again later")
            }
            DatabaseError::Sqlx(sqlx::Error::PoolTimedOut)
            | DatabaseError::Sqlx(sqlx::Error::PoolClosed)
            | DatabaseError::Sqlx(sqlx::Error::Io(_)) => {
                tracing::error!("Database connection error: {}", err);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            DatabaseError::Sqlx(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal("Database error occurred")
            }
        }
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Status { status, body } => {
                tracing::warn!("Chat service returned status {}", status);
                ApiError::UpstreamUnavailable {
                    message: format!("Chat service returned status {}", status),
                    status: Some(status),
                    body: Some(body),
                }
            }
            UpstreamError::Transport(msg) => {
                tracing::warn!("Chat service unreachable: {}", msg);
                ApiError::UpstreamUnavailable {
                    message: format!("Chat service unreachable: {}", msg),
                    status: None,
                    body: None,
                }
            }
            UpstreamError::NotConfigured(msg) => ApiError::UpstreamUnavailable {
                message: msg,
                status: None,
                body: None,
            },
            UpstreamError::Format(msg) => ApiError::upstream_format(msg),
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired | JwtError::InvalidSignature | JwtError::Invalid(_) => {
                ApiError::invalid_credential("Invalid or expired token")
            }
            JwtError::TokenGeneration(msg) => {
                tracing::error!("Token generation failed: {}", msg);
                ApiError::internal("Failed to issue access token")
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
