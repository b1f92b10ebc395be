//! Authentication and authorization middleware.

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;
use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use dockyard_core::hash::sha256_hex;
use dockyard_core::{Access, AccessToken, BasicCredentials, Credentials, RepositoryName};
use dockyard_metadata::models::UserRow;
use dockyard_registry::Registrant;
use tracing::Instrument;
use uuid::Uuid;

/// Maximum length for trace IDs.
/// Longer trace IDs are truncated to prevent log bloat and potential log injection.
const MAX_TRACE_ID_LEN: usize = 128;

/// Trace ID for request correlation.
#[derive(Clone, Debug)]
pub struct TraceId(pub String);

impl TraceId {
    /// Generate a new random trace ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create a trace ID from a client-provided value.
    /// The value is truncated to MAX_TRACE_ID_LEN characters and restricted to printable ASCII.
    pub fn from_client(value: &str) -> Self {
        let sanitized: String = value
            .chars()
            .take(MAX_TRACE_ID_LEN)
            .filter(|c| c.is_ascii_graphic() || *c == ' ')
            .collect();

        if sanitized.is_empty() {
            Self::new()
        } else {
            Self(sanitized)
        }
    }

    /// Get the trace ID as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The authenticated account behind a request.
#[derive(Clone, Debug)]
pub struct Principal {
    pub user_id: Uuid,
    pub username: String,
    /// Present when the request authenticated with a repository token.
    pub grant: Option<AccessToken>,
}

impl Principal {
    fn from_user(user: UserRow, grant: Option<AccessToken>) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username,
            grant,
        }
    }

    /// The principal as the acting account of a registration.
    pub fn registrant(&self) -> Registrant {
        Registrant {
            user_id: self.user_id,
            username: self.username.clone(),
        }
    }

    /// Require that a token grant, if any, covers `name` with at least `access`.
    ///
    /// Basic-authenticated principals pass; ownership is checked by the
    /// operation itself where it applies.
    pub fn require_repository(&self, name: &RepositoryName, access: Access) -> ApiResult<()> {
        let Some(grant) = &self.grant else {
            return Ok(());
        };

        if !grant.covers(name.namespace(), name.repository()) {
            metrics::record_auth_failure("wrong_repository");
            return Err(ApiError::Forbidden(
                "token is not valid for this repository".to_string(),
            ));
        }
        if !grant.access.implies(&access) {
            metrics::record_auth_failure("insufficient_access");
            return Err(ApiError::Forbidden(format!(
                "token does not grant {} access",
                access.as_str()
            )));
        }
        Ok(())
    }
}

/// Extract the raw Authorization header value.
fn extract_authorization(req: &Request) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Extract trace ID from X-Trace-Id header or generate a new one.
fn extract_or_generate_trace_id(req: &Request) -> TraceId {
    req.headers()
        .get(TRACE_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(TraceId::from_client)
        .unwrap_or_else(TraceId::new)
}

fn unauthorized(reason: &'static str) -> ApiError {
    metrics::record_auth_failure(reason);
    ApiError::Unauthorized("Unauthorized".to_string())
}

fn inactive_user() -> ApiError {
    metrics::record_auth_failure("inactive_user");
    ApiError::Forbidden("user does not exist or is not active".to_string())
}

/// Resolve a presented token against the issued token rows.
async fn authenticate_token(state: &AppState, token: AccessToken) -> ApiResult<Principal> {
    let row = state
        .metadata
        .get_token_by_signature_hash(&sha256_hex(&token.signature))
        .await?
        .ok_or_else(|| unauthorized("unknown_token"))?;

    if row.revoked_at.is_some() {
        return Err(unauthorized("revoked_token"));
    }
    if row.namespace != token.namespace
        || row.repository != token.repository
        || row.access != token.access.as_str()
    {
        tracing::warn!(
            token_id = %row.token_id,
            "Token claims do not match the issued token"
        );
        return Err(unauthorized("token_mismatch"));
    }

    let user = state
        .metadata
        .get_user(row.user_id)
        .await?
        .filter(|user| user.active)
        .ok_or_else(inactive_user)?;

    Ok(Principal::from_user(user, Some(token)))
}

/// Resolve basic credentials against the account table.
async fn authenticate_basic(state: &AppState, basic: BasicCredentials) -> ApiResult<Principal> {
    let user = state
        .metadata
        .get_user_by_name(&basic.username)
        .await?
        .filter(|user| user.active)
        .ok_or_else(inactive_user)?;

    if sha256_hex(&basic.password) != user.password_hash {
        return Err(unauthorized("bad_password"));
    }

    Ok(Principal::from_user(user, None))
}

/// Header carrying the request trace id, read from clients and echoed back.
pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// Authentication middleware that resolves credentials and sets up trace context.
///
/// Requests without an Authorization header pass through without a
/// [`Principal`]; handlers that need one call [`require_principal`]. Every
/// response, including authentication failures, carries the trace id.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let trace_id = extract_or_generate_trace_id(&req);
    let span = tracing::info_span!("request", trace_id = %trace_id);

    let mut response = async move {
        if let Some(header) = extract_authorization(&req) {
            let credentials =
                Credentials::parse(header).map_err(|_| unauthorized("malformed_header"))?;

            let principal = match credentials {
                Credentials::Token(token) => authenticate_token(&state, token).await?,
                Credentials::Basic(basic) => authenticate_basic(&state, basic).await?,
            };

            tracing::debug!(username = %principal.username, "Request authenticated");
            req.extensions_mut().insert(principal);
        }

        Ok::<Response, ApiError>(next.run(req).await)
    }
    .instrument(span)
    .await
    .unwrap_or_else(IntoResponse::into_response);

    if let Ok(value) = HeaderValue::from_str(trace_id.as_str()) {
        response.headers_mut().insert(TRACE_ID_HEADER, value);
    }
    response
}

/// Require authentication.
pub fn require_principal(req: &Request) -> ApiResult<&Principal> {
    req.extensions().get::<Principal>().ok_or_else(|| {
        metrics::record_auth_failure("missing_credentials");
        ApiError::Unauthorized("Unauthorized".to_string())
    })
}
