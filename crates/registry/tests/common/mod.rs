//! Common test utilities for the registry core.

use dockyard_core::ancestry::chain_to_json;
use dockyard_core::hash::sha256_hex;
use dockyard_core::{ImageId, RepositoryName};
use dockyard_metadata::models::{ImageRow, UserRow};
use dockyard_metadata::{MetadataStore, SqliteStore};
use dockyard_registry::{
    AncestryResolver, Registrant, RegistrationService, RepositoryLocks, TagService,
    UploadCompletionVerifier,
};
use std::sync::Arc;
use tempfile::TempDir;
use time::OffsetDateTime;
use uuid::Uuid;

/// Registry components wired to a temporary SQLite store.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestRegistry {
    pub metadata: Arc<dyn MetadataStore>,
    pub locks: Arc<RepositoryLocks>,
    pub registration: RegistrationService,
    pub tags: TagService,
    pub verifier: UploadCompletionVerifier,
    pub resolver: AncestryResolver,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestRegistry {
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("metadata.db");
        let metadata: Arc<dyn MetadataStore> = Arc::new(
            SqliteStore::new(&db_path, None)
                .await
                .expect("Failed to create metadata store"),
        );
        let locks = Arc::new(RepositoryLocks::new());

        Self {
            registration: RegistrationService::new(metadata.clone(), locks.clone()),
            tags: TagService::new(metadata.clone(), locks.clone()),
            verifier: UploadCompletionVerifier::new(metadata.clone(), locks.clone()),
            resolver: AncestryResolver::new(metadata.clone()),
            metadata,
            locks,
            _temp_dir: temp_dir,
        }
    }

    /// Create an active account and return it as a registrant.
    pub async fn create_user(&self, username: &str) -> Registrant {
        let now = OffsetDateTime::now_utc();
        let user = UserRow {
            user_id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: sha256_hex(format!("{username}-password")),
            active: true,
            created_at: now,
            updated_at: now,
        };
        self.metadata
            .create_user(&user)
            .await
            .expect("Failed to create user");

        Registrant {
            user_id: user.user_id,
            username: user.username,
        }
    }

    /// Write an image record the way the artifact endpoints would.
    pub async fn put_image(
        &self,
        image_id: &str,
        ancestry: &[&str],
        size: i64,
        uploaded: bool,
        checksummed: bool,
    ) {
        let now = OffsetDateTime::now_utc();
        let image = ImageRow {
            image_id: image_id.to_string(),
            ancestry_json: encode_chain(ancestry),
            size,
            uploaded,
            checksummed,
            created_at: now,
            updated_at: now,
        };
        self.metadata
            .upsert_image(&image)
            .await
            .expect("Failed to upsert image");
    }

    /// Register a repository owned by `registrant` with the given image ids.
    pub async fn register(&self, registrant: &Registrant, name: &RepositoryName, ids: &[&str]) {
        self.registration
            .register(registrant, name, manifest_body(ids).as_bytes())
            .await
            .expect("Failed to register repository");
    }
}

/// Build a registration body `[{"id": ...}, ...]`.
#[allow(dead_code)]
pub fn manifest_body(ids: &[&str]) -> String {
    let entries: Vec<String> = ids.iter().map(|id| format!(r#"{{"id":"{id}"}}"#)).collect();
    format!("[{}]", entries.join(","))
}

/// Parse a repository name, panicking on invalid input.
#[allow(dead_code)]
pub fn repo(namespace: &str, repository: &str) -> RepositoryName {
    RepositoryName::parse(namespace, repository).expect("valid repository name")
}

/// Collect manifest ids as plain strings.
#[allow(dead_code)]
pub fn ids_of(ids: impl IntoIterator<Item = ImageId>) -> Vec<String> {
    ids.into_iter().map(ImageId::into_string).collect()
}

/// Encode an ancestor chain the way the artifact endpoints store it.
#[allow(dead_code)]
pub fn encode_chain(chain: &[&str]) -> String {
    let ids: Vec<ImageId> = chain
        .iter()
        .map(|id| ImageId::parse(id).expect("valid image id"))
        .collect();
    chain_to_json(&ids).expect("Failed to encode ancestry")
}
