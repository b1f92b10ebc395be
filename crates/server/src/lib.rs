//! HTTP API server for the dockyard registry.
//!
//! This crate provides the docker v1 repository endpoints:
//! - Repository registration with repository-scoped write tokens
//! - Tag writes
//! - The upload completion check
//! - Pull-side image list and tag map reads
//! - Health, ping and Prometheus metrics

pub mod auth;
pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod routes;
pub mod state;

pub use auth::{Principal, TraceId};
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
