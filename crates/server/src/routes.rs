//! Route configuration.

use crate::auth::auth_middleware;
use crate::handlers;
use crate::handlers::common::{X_DOCKER_REGISTRY_CONFIG, X_DOCKER_REGISTRY_VERSION};
use crate::metrics::metrics_handler;
use crate::state::AppState;
use axum::Router;
use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, put};
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Liveness for docker clients
        .route("/v1/_ping", get(handlers::ping))
        // Health check (intentionally unauthenticated for load balancers/k8s probes)
        .route("/v1/health", get(handlers::health_check))
        // Push: registration and completion share the repository path
        .route(
            "/v1/repositories/{namespace}/{repo_name}",
            put(handlers::put_repository),
        )
        .route(
            "/v1/repositories/{namespace}/{repo_name}/images",
            put(handlers::put_repository_images).get(handlers::get_repository_images),
        )
        .route(
            "/v1/repositories/{namespace}/{repo_name}/tags",
            get(handlers::get_repository_tags),
        )
        .route(
            "/v1/repositories/{namespace}/{repo_name}/tags/{tag}",
            put(handlers::put_tag),
        );

    let mut router = Router::new().merge(api_routes);

    // SECURITY: When enabled, this endpoint MUST be network-restricted
    // to authorized Prometheus scraper IPs only.
    if state.config.server.metrics_enabled {
        let metrics_routes = Router::new().route("/metrics", get(metrics_handler));
        router = router.merge(metrics_routes);
    }

    // Order of execution: TraceLayer -> registry headers -> Auth -> Handler
    router
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            registry_headers_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Stamp the registry version and config headers on every response,
/// including auth failures.
async fn registry_headers_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;

    let headers = response.headers_mut();
    if let Ok(version) = HeaderValue::from_str(&state.config.server.registry_version) {
        headers.insert(X_DOCKER_REGISTRY_VERSION, version);
    }
    if let Ok(config) = HeaderValue::from_str(&state.config.server.registry_config) {
        headers.insert(X_DOCKER_REGISTRY_CONFIG, config);
    }

    response
}
