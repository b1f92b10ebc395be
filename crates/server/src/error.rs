//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dockyard_metadata::MetadataError;
use dockyard_registry::RegistryError;
use serde::Serialize;

/// API error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Error code for programmatic handling.
    pub code: String,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    OwnershipMismatch(String),

    #[error("{0}")]
    IncompleteUpload(String),

    #[error("{0}")]
    ChecksumPending(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("metadata error: {0}")]
    Metadata(#[from] MetadataError),
}

impl ApiError {
    /// Get the error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::BadRequest(_) => "bad_request",
            Self::Validation(_) => "validation_error",
            Self::OwnershipMismatch(_) => "ownership_mismatch",
            Self::IncompleteUpload(_) => "incomplete_upload",
            Self::ChecksumPending(_) => "checksum_pending",
            Self::Unauthorized(_) => "unauthorized",
            Self::Forbidden(_) => "forbidden",
            Self::Internal(_) => "internal_error",
            Self::Metadata(_) => "persistence_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_)
            | Self::Validation(_)
            | Self::OwnershipMismatch(_)
            | Self::IncompleteUpload(_)
            | Self::ChecksumPending(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Internal(_) | Self::Metadata(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RegistryError> for ApiError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::NotFound(msg) => Self::NotFound(msg),
            RegistryError::OwnershipMismatch(msg) => Self::OwnershipMismatch(msg),
            RegistryError::Validation(msg) => Self::Validation(msg),
            RegistryError::IncompleteUpload(msg) => Self::IncompleteUpload(msg),
            RegistryError::ChecksumPending(msg) => Self::ChecksumPending(msg),
            RegistryError::Persistence(e) => Self::Metadata(e),
        }
    }
}

impl From<dockyard_core::Error> for ApiError {
    fn from(e: dockyard_core::Error) -> Self {
        Self::Validation(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Server-side failures are logged in full; clients get a generic message.
        let error = if status.is_server_error() {
            tracing::error!(error = %self, code = self.code(), "Request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error,
            code: self.code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
