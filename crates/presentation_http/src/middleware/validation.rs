//! Request validation
//!
//! Provides a `ValidatedJson` extractor that deserializes a JSON body and
//! validates it with the validator crate. Rejections use the same `{detail}`
//! body as every other API error.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use validator::{Validate, ValidationErrors};

use crate::error::ErrorResponse;

/// Validation error type
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Body missing, not JSON, or not the expected shape
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] JsonRejection),
    /// Body parsed but a field constraint failed
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl ValidationError {
    /// HTTP status for the rejection
    ///
    /// JSON rejections keep axum's status (400 syntax, 415 content type,
    /// 422 shape); constraint failures are 422.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::JsonError(e) => e.status(),
            Self::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            Self::JsonError(e) => e.body_text(),
            Self::ValidationFailed(msg) => msg.clone(),
        };

        debug!(%status, %detail, "Rejected request body");

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

/// Flatten field errors into `field: message; field: message`
fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                format!(
                    "{}: {}",
                    field,
                    error
                        .message
                        .as_ref()
                        .map_or_else(|| error.code.to_string(), ToString::to_string)
                )
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

/// A JSON extractor that also validates the request body
///
/// Use this instead of `Json<T>` for request bodies with `validator`
/// constraints.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidationError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;

        value
            .validate()
            .map_err(|e| ValidationError::ValidationFailed(describe(&e)))?;

        Ok(Self(value))
    }
}
