//! Shared handler helpers.

use crate::error::{ApiError, ApiResult};
use axum::body::Bytes;
use axum::extract::Request;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use dockyard_core::RepositoryName;
use serde::Serialize;

/// Content type of every JSON body the registry returns.
pub const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

pub const X_DOCKER_TOKEN: HeaderName = HeaderName::from_static("x-docker-token");
pub const X_DOCKER_ENDPOINTS: HeaderName = HeaderName::from_static("x-docker-endpoints");
pub const X_DOCKER_REGISTRY_VERSION: HeaderName =
    HeaderName::from_static("x-docker-registry-version");
pub const X_DOCKER_REGISTRY_CONFIG: HeaderName =
    HeaderName::from_static("x-docker-registry-config");

/// Serialize `value` as a JSON response with the registry content type.
pub fn json_response<T: Serialize>(status: StatusCode, value: &T) -> ApiResult<Response> {
    let body = serde_json::to_vec(value)
        .map_err(|e| ApiError::Internal(format!("failed to encode response: {e}")))?;
    Ok((
        status,
        [(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))],
        body,
    )
        .into_response())
}

/// Build a header value from configuration or generated text.
pub fn header_value(value: &str) -> ApiResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| ApiError::Internal(format!("invalid header value: {e}")))
}

/// Validate the namespace and repository path segments.
pub fn repository_name(namespace: &str, repository: &str) -> ApiResult<RepositoryName> {
    Ok(RepositoryName::parse(namespace, repository)?)
}

/// Read the request body up to `limit` bytes.
pub async fn read_body(req: Request, limit: usize) -> ApiResult<Bytes> {
    axum::body::to_bytes(req.into_body(), limit)
        .await
        .map_err(|e| ApiError::BadRequest(format!("failed to read body: {e}")))
}
