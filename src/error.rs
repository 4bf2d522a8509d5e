//! Error types for the lesson store and the HTTP surface.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// The catalog source could not be read or parsed.
    #[error("Catalog could not be loaded: {0}")]
    CatalogLoad(String),
    #[error("Catalog could not be saved: {0}")]
    Persist(String),
    #[error("Invalid lesson: {0}")]
    Validation(String),
    #[error("Lesson not found: {0}")]
    NotFound(String),
    #[error("Lesson id already exists: {0}")]
    DuplicateId(String),
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Store(StoreError::CatalogLoad(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "catalog_load")
            }
            ApiError::Store(StoreError::Persist(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "persist")
            }
            ApiError::Store(StoreError::Validation(_)) => (StatusCode::BAD_REQUEST, "validation"),
            ApiError::Store(StoreError::NotFound(_)) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Store(StoreError::DuplicateId(_)) => (StatusCode::CONFLICT, "duplicate_id"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = Json(json!({
            "error": { "code": code, "message": self.to_string() }
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_http_status() {
        let cases = [
            (StoreError::CatalogLoad("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (StoreError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (StoreError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (StoreError::DuplicateId("x".into()), StatusCode::CONFLICT),
            (StoreError::Persist("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }
}
