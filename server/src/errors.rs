use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use boolsearch_core::SearchError;
use serde_json::json;

/// Maps to a status code and a `{"error": "..."}` body.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    /// Document source could not be read (422).
    Unprocessable(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::SourceUnavailable { .. } => ApiError::Unprocessable(err.to_string()),
            SearchError::InvalidOperator(_) => ApiError::BadRequest(err.to_string()),
        }
    }
}
