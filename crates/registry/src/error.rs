//! Error taxonomy of the registry core.

use dockyard_metadata::MetadataError;
use thiserror::Error;

/// Errors produced by registry operations.
///
/// Every variant is terminal for the operation that produced it.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Repository, tag or image absent, or repository not yet pull-visible.
    #[error("{0}")]
    NotFound(String),

    /// Registering principal does not own the target namespace.
    #[error("{0}")]
    OwnershipMismatch(String),

    /// Malformed input or an internal data inconsistency.
    #[error("{0}")]
    Validation(String),

    /// A manifest image has not finished uploading.
    #[error("{0}")]
    IncompleteUpload(String),

    /// A manifest image has not had its checksum verified.
    #[error("{0}")]
    ChecksumPending(String),

    #[error("persistence error: {0}")]
    Persistence(#[from] MetadataError),
}

impl From<dockyard_core::Error> for RegistryError {
    fn from(e: dockyard_core::Error) -> Self {
        RegistryError::Validation(e.to_string())
    }
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
