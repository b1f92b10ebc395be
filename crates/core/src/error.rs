//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid image id: {0}")]
    InvalidImageId(String),

    #[error("invalid repository name: {0}")]
    InvalidRepositoryName(String),

    #[error("invalid tag name: {0}")]
    InvalidTagName(String),

    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("invalid ancestry: {0}")]
    InvalidAncestry(String),

    #[error("invalid tag body: {0}")]
    InvalidTagBody(String),

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("invalid hash: {0}")]
    InvalidHash(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
