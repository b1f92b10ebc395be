//! Application state shared across handlers.

use dockyard_core::config::AppConfig;
use dockyard_metadata::MetadataStore;
use dockyard_registry::{
    AncestryResolver, RegistrationService, RepositoryLocks, TagService, UploadCompletionVerifier,
};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Metadata store.
    pub metadata: Arc<dyn MetadataStore>,
    pub registration: Arc<RegistrationService>,
    pub tags: Arc<TagService>,
    pub verifier: Arc<UploadCompletionVerifier>,
    pub resolver: Arc<AncestryResolver>,
}

impl AppState {
    /// Create a new application state, wiring every registry component to
    /// the same store and lock table.
    pub fn new(config: AppConfig, metadata: Arc<dyn MetadataStore>) -> Self {
        let locks = Arc::new(RepositoryLocks::new());

        Self {
            config: Arc::new(config),
            registration: Arc::new(RegistrationService::new(metadata.clone(), locks.clone())),
            tags: Arc::new(TagService::new(metadata.clone(), locks.clone())),
            verifier: Arc::new(UploadCompletionVerifier::new(
                metadata.clone(),
                locks,
            )),
            resolver: Arc::new(AncestryResolver::new(metadata.clone())),
            metadata,
        }
    }
}
