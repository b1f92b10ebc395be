//! Docker v1 repository endpoints.
//!
//! Push: register the repository (`PUT /v1/repositories/{ns}/{repo}`), upload
//! images through the artifact endpoints, write tags, then signal completion
//! (`PUT .../images`). Pull: read the image list and the tag map.

use crate::auth::require_principal;
use crate::error::ApiResult;
use crate::handlers::common::{
    X_DOCKER_ENDPOINTS, X_DOCKER_TOKEN, header_value, json_response, read_body, repository_name,
};
use crate::metrics;
use crate::state::AppState;
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::http::header::{USER_AGENT, WWW_AUTHENTICATE};
use axum::response::Response;
use dockyard_core::{Access, TagName};
use dockyard_registry::RegistryError;

/// PUT /v1/repositories/{namespace}/{repo_name}
///
/// Body: the build-ordered image list `[{"id": ...}, ...]`.
#[tracing::instrument(skip_all, fields(namespace = %namespace, repository = %repo_name))]
pub async fn put_repository(
    State(state): State<AppState>,
    Path((namespace, repo_name)): Path<(String, String)>,
    req: Request,
) -> ApiResult<Response> {
    let name = repository_name(&namespace, &repo_name)?;
    let principal = require_principal(&req)?.clone();
    principal.require_repository(&name, Access::Write)?;
    let body = read_body(req, state.config.server.max_body_size).await?;

    let registration = state
        .registration
        .register(&principal.registrant(), &name, &body)
        .await?;
    metrics::REPOSITORIES_REGISTERED.inc();

    let token = header_value(&registration.token.to_string())?;
    let endpoints = header_value(&state.config.server.endpoints)?;

    let mut response = json_response(StatusCode::OK, &"")?;
    let headers = response.headers_mut();
    headers.insert(X_DOCKER_TOKEN, token.clone());
    headers.insert(WWW_AUTHENTICATE, token);
    headers.insert(X_DOCKER_ENDPOINTS, endpoints);
    Ok(response)
}

/// PUT /v1/repositories/{namespace}/{repo_name}/tags/{tag}
///
/// Body: the quoted head image id, e.g. `"511136ea3c5a"`.
#[tracing::instrument(skip_all, fields(namespace = %namespace, repository = %repo_name, tag = %tag))]
pub async fn put_tag(
    State(state): State<AppState>,
    Path((namespace, repo_name, tag)): Path<(String, String, String)>,
    req: Request,
) -> ApiResult<Response> {
    let name = repository_name(&namespace, &repo_name)?;
    let tag = TagName::parse(&tag)?;
    require_principal(&req)?.require_repository(&name, Access::Write)?;

    let agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = read_body(req, state.config.server.max_body_size).await?;

    state
        .tags
        .put_tag(&name, &tag, &body, agent.as_deref())
        .await?;
    metrics::TAGS_WRITTEN.inc();

    json_response(StatusCode::OK, &"")
}

/// PUT /v1/repositories/{namespace}/{repo_name}/images
///
/// Completion check. The request body is ignored; the manifest registered
/// earlier is authoritative.
#[tracing::instrument(skip_all, fields(namespace = %namespace, repository = %repo_name))]
pub async fn put_repository_images(
    State(state): State<AppState>,
    Path((namespace, repo_name)): Path<(String, String)>,
    req: Request,
) -> ApiResult<StatusCode> {
    let name = repository_name(&namespace, &repo_name)?;
    require_principal(&req)?.require_repository(&name, Access::Write)?;

    let result = state.verifier.verify_and_finalize(&name).await;
    metrics::record_completion(match &result {
        Ok(_) => "committed",
        Err(RegistryError::IncompleteUpload(_)) => "incomplete_upload",
        Err(RegistryError::ChecksumPending(_)) => "checksum_pending",
        Err(RegistryError::NotFound(_)) => "not_found",
        Err(_) => "error",
    });
    result?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/repositories/{namespace}/{repo_name}/images
#[tracing::instrument(skip_all, fields(namespace = %namespace, repository = %repo_name))]
pub async fn get_repository_images(
    State(state): State<AppState>,
    Path((namespace, repo_name)): Path<(String, String)>,
    req: Request,
) -> ApiResult<Response> {
    let name = repository_name(&namespace, &repo_name)?;
    require_principal(&req)?.require_repository(&name, Access::Read)?;

    let manifest = state.resolver.resolve_pull_manifest(&name).await?;
    metrics::PULL_MANIFESTS_SERVED.inc();

    let mut response = json_response(StatusCode::OK, &manifest)?;
    response.headers_mut().insert(
        X_DOCKER_ENDPOINTS,
        header_value(&state.config.server.endpoints)?,
    );
    Ok(response)
}

/// GET /v1/repositories/{namespace}/{repo_name}/tags
#[tracing::instrument(skip_all, fields(namespace = %namespace, repository = %repo_name))]
pub async fn get_repository_tags(
    State(state): State<AppState>,
    Path((namespace, repo_name)): Path<(String, String)>,
    req: Request,
) -> ApiResult<Response> {
    let name = repository_name(&namespace, &repo_name)?;
    require_principal(&req)?.require_repository(&name, Access::Read)?;

    let tags = state.resolver.resolve_tags(&name).await?;

    let mut response = json_response(StatusCode::OK, &tags)?;
    response.headers_mut().insert(
        X_DOCKER_ENDPOINTS,
        header_value(&state.config.server.endpoints)?,
    );
    Ok(response)
}
