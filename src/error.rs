use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Failure surfaced to API callers as a status code plus `{"message": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    /// Detail is logged, never sent to the caller.
    #[error("Internal Server Error")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string()
        }))
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EmployeeNotFound(id) => {
                ApiError::NotFound(format!("Employee with ID {} not found", id))
            }
            StoreError::LeaveNotFound(id) => {
                ApiError::NotFound(format!("Leave with ID {} not found", id))
            }
            StoreError::NotificationNotFound(_) => {
                ApiError::NotFound("Notification not found".to_string())
            }
            StoreError::AlreadyProcessed { id, status } => {
                ApiError::Validation(format!("Leave with ID {} is already {}", id, status))
            }
            StoreError::InsufficientBalance { requested, available } => {
                ApiError::Validation(format!(
                    "Not enough leave balance. Employee has {} leaves, requested {} leaves.",
                    available, requested
                ))
            }
            other => {
                tracing::error!(error = %other, "Storage failure");
                ApiError::Internal(other.to_string())
            }
        }
    }
}

// Extractor failures go through ApiError so every error body is `{"message": ...}`.

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::Validation(format!("Invalid request body: {}", err)).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::Validation(format!("Invalid query parameters: {}", err)).into()
}

pub fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    ApiError::NotFound(format!("No resource at {}: {}", req.path(), err)).into()
}
