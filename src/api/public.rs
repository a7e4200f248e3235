//! Public API types

use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde_json::json;

use crate::intent::ResolveError;
use crate::runtime::RuntimeError;

// Errors

pub struct ApiError(anyhow::Error);

impl ApiError {
    /// Map domain failures to response status codes. Anything not in the
    /// taxonomy is a 500.
    fn status(&self) -> StatusCode {
        if let Some(err) = self.0.downcast_ref::<ResolveError>() {
            match err {
                ResolveError::UnknownIntent(_)
                | ResolveError::EmptyCustomPrompt
                | ResolveError::UnknownModel(_) => StatusCode::BAD_REQUEST,
            }
        } else if let Some(err) = self.0.downcast_ref::<RuntimeError>() {
            match err {
                RuntimeError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                RuntimeError::Invocation(_) => StatusCode::BAD_GATEWAY,
            }
        } else if self.0.downcast_ref::<interactions::UploadTooLarge>().is_some() {
            StatusCode::PAYLOAD_TOO_LARGE
        } else if self.0.downcast_ref::<interactions::MissingFile>().is_some() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Convert `ApiError` into an Axum compatible response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Always log the error
        tracing::error!("{}", self.0);

        let status = self.status();
        (status, axum::Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Enables using `?` on functions that return `Result<_,
/// anyhow::Error>` to turn them into `Result<_, ApiError>`
impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

// Re-export public types from each route

pub mod chat {
    pub use crate::api::routes::chat::public::*;
}

pub mod intents {
    pub use crate::api::routes::intents::public::*;
}

pub mod interactions {
    pub use crate::api::routes::interactions::public::*;
}
