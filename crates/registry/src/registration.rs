//! Repository registration and write-token issuance.

use crate::error::{RegistryError, RegistryResult};
use crate::locks::RepositoryLocks;
use dockyard_core::hash::sha256_hex;
use dockyard_core::{Access, AccessToken, Manifest, RepositoryName};
use dockyard_metadata::MetadataStore;
use dockyard_metadata::models::{RepositoryRow, RepositoryTokenRow};
use rand::RngCore;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

/// The account registering a repository.
#[derive(Debug, Clone)]
pub struct Registrant {
    pub user_id: Uuid,
    pub username: String,
}

/// Result of a successful registration.
#[derive(Debug)]
pub struct Registration {
    /// Freshly issued write token for the repository.
    pub token: AccessToken,
    /// Stored repository record after the upsert.
    pub repository: RepositoryRow,
    /// Earlier tokens of the same user for this repository that were revoked.
    pub revoked_tokens: u64,
}

/// Creates or replaces repository manifests.
pub struct RegistrationService {
    metadata: Arc<dyn MetadataStore>,
    locks: Arc<RepositoryLocks>,
}

impl RegistrationService {
    pub fn new(metadata: Arc<dyn MetadataStore>, locks: Arc<RepositoryLocks>) -> Self {
        Self { metadata, locks }
    }

    /// Record the declared manifest and issue a write token.
    ///
    /// Re-registration replaces the manifest only; rollup fields keep their
    /// values.
    #[tracing::instrument(
        skip(self, registrant, name, body),
        fields(
            namespace = %name.namespace(),
            repository = %name.repository(),
            username = %registrant.username
        )
    )]
    pub async fn register(
        &self,
        registrant: &Registrant,
        name: &RepositoryName,
        body: &[u8],
    ) -> RegistryResult<Registration> {
        if registrant.username != name.namespace() {
            return Err(RegistryError::OwnershipMismatch(
                "username does not match namespace".to_string(),
            ));
        }

        let manifest = Manifest::parse(body)?;
        let manifest_json = manifest.to_json()?;

        let _guard = self
            .locks
            .acquire(name.namespace(), name.repository())
            .await;

        let now = OffsetDateTime::now_utc();
        let row = RepositoryRow {
            repository_id: Uuid::new_v4(),
            namespace: name.namespace().to_string(),
            name: name.repository().to_string(),
            manifest_json,
            uploaded: false,
            checksummed: false,
            size: 0,
            created_at: now,
            updated_at: now,
        };
        let repository = self.metadata.upsert_repository(&row).await?;

        let token = AccessToken::new(
            generate_signature(),
            name.namespace(),
            name.repository(),
            Access::Write,
        );
        let token_row = RepositoryTokenRow {
            token_id: Uuid::new_v4(),
            signature_hash: sha256_hex(&token.signature),
            user_id: registrant.user_id,
            namespace: token.namespace.clone(),
            repository: token.repository.clone(),
            access: token.access.as_str().to_string(),
            created_at: now,
            revoked_at: None,
        };
        let revoked_tokens = self.metadata.issue_repository_token(&token_row).await?;

        info!(
            images = manifest.len(),
            revoked_tokens, "Repository registered"
        );

        Ok(Registration {
            token,
            repository,
            revoked_tokens,
        })
    }
}

/// Generate a token signature using cryptographically secure RNG.
fn generate_signature() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
