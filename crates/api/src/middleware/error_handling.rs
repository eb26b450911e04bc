//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and a uniform JSON body:
//!
//! ```json
//! { "error": "discussion_full", "detail": "discussion is full" }
//! ```
//!
//! `error` is the machine-readable kind from [`SpeakError::kind`]; `detail`
//! is the human-readable message.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use speakspace_core::errors::{ErrorClass, SpeakError};
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// Handlers return `Result<_, AppError>` and use `?` on anything yielding
/// a [`SpeakError`] or an `eyre::Report`.
#[derive(Debug)]
pub struct AppError(pub SpeakError);

/// Status code for a domain error.
///
/// Duplicate identity data is a 409; every other conflict is a 400 because
/// the request was well-formed but not admissible in the current state.
pub fn status_for(err: &SpeakError) -> StatusCode {
    match err {
        SpeakError::DuplicateUser(_) | SpeakError::DuplicateCategory(_) => StatusCode::CONFLICT,
        SpeakError::Authentication(_) => StatusCode::UNAUTHORIZED,
        SpeakError::Authorization(_) => StatusCode::FORBIDDEN,
        other => match other.class() {
            ErrorClass::Validation | ErrorClass::Conflict => StatusCode::BAD_REQUEST,
            ErrorClass::NotFound => StatusCode::NOT_FOUND,
            ErrorClass::Auth => StatusCode::UNAUTHORIZED,
            ErrorClass::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        },
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);

        if status.is_server_error() {
            error!("Request failed: {:?}", self.0);
        }

        let body = Json(json!({
            "error": self.0.kind(),
            "detail": self.0.to_string(),
        }));

        (status, body).into_response()
    }
}

impl From<SpeakError> for AppError {
    fn from(err: SpeakError) -> Self {
        AppError(err)
    }
}

/// Storage failures surfacing as bare reports are database errors.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(SpeakError::Database(err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError(SpeakError::Validation(rejection.body_text()))
    }
}

/// A path segment that does not parse as an identifier names nothing.
impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError(SpeakError::NotFound(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError(SpeakError::Validation(rejection.body_text()))
    }
}

/// Maps a SpeakError straight to an HTTP response
pub fn map_error(err: SpeakError) -> Response {
    AppError(err).into_response()
}
