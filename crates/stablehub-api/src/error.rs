//! Maps domain errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use stablehub_core::error::{AppError, ErrorKind};
use stablehub_service::ShareAccessError;

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Optional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Any error a handler can return.
#[derive(Debug)]
pub enum ApiError {
    /// A general application error.
    App(AppError),
    /// A denied or failed share-link resolution.
    Share(ShareAccessError),
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<ShareAccessError> for ApiError {
    fn from(err: ShareAccessError) -> Self {
        Self::Share(err)
    }
}

impl ApiError {
    /// HTTP status and error code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::App(err) => app_status(err),
            Self::Share(err) => (share_status(err), err.code()),
        }
    }
}

fn app_status(err: &AppError) -> (StatusCode, &'static str) {
    match err.kind {
        ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        ErrorKind::Authentication => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        ErrorKind::Authorization => (StatusCode::FORBIDDEN, "FORBIDDEN"),
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
        ErrorKind::RateLimit => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
        ErrorKind::Database | ErrorKind::Storage | ErrorKind::ServiceUnavailable => {
            (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
        }
        ErrorKind::Internal | ErrorKind::Configuration | ErrorKind::Serialization => {
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        }
    }
}

fn share_status(err: &ShareAccessError) -> StatusCode {
    match err {
        ShareAccessError::NotFound => StatusCode::NOT_FOUND,
        ShareAccessError::Expired | ShareAccessError::Exhausted => StatusCode::GONE,
        ShareAccessError::PasswordRequired => StatusCode::UNAUTHORIZED,
        ShareAccessError::PasswordInvalid => StatusCode::FORBIDDEN,
        ShareAccessError::TooManyAttempts => StatusCode::TOO_MANY_REQUESTS,
        ShareAccessError::Upstream(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();

        // Upstream details stay in the logs.
        let message = match &self {
            Self::App(err) if err.kind.is_upstream() => {
                tracing::error!(error = %err, "Request failed on a backing service");
                match status {
                    StatusCode::SERVICE_UNAVAILABLE => {
                        "Service temporarily unavailable, try again later".to_string()
                    }
                    _ => "Internal server error".to_string(),
                }
            }
            Self::App(err) => err.message.clone(),
            Self::Share(err) => err.to_string(),
        };

        let body = ApiErrorResponse {
            error: error_code.to_string(),
            message,
            details: None,
        };

        (status, Json(body)).into_response()
    }
}
