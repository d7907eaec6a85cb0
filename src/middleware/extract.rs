//! Request extractors that report failures as `MalformedInput`

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::error::ApiError;

/// JSON body that has been deserialized and validated
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::malformed_input(rejection.body_text()))?;

        value.validate().map_err(|errors| {
            let mut fields = BTreeMap::new();
            collect_field_errors(&errors, "", &mut fields);
            ApiError::validation_error("Request body failed validation", fields)
        })?;

        Ok(Self(value))
    }
}

/// Flattens nested errors into `metrics[0].value` style keys
fn collect_field_errors(
    errors: &ValidationErrors,
    prefix: &str,
    out: &mut BTreeMap<String, String>,
) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                let message = list
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("failed '{}' check", e.code))
                    })
                    .collect::<Vec<_>>()
                    .join("; ");
                out.insert(path, message);
            }
            ValidationErrorsKind::Struct(inner) => collect_field_errors(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_errors(inner, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

/// Numeric `:id` path segment
#[derive(Debug, Clone, Copy)]
pub struct EntityId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for EntityId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::malformed_input(rejection.body_text()))?;

        raw.parse()
            .map(EntityId)
            .map_err(|_| ApiError::malformed_input(format!("Invalid id '{}': expected an integer", raw)))
    }
}
