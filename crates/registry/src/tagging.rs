//! Tag writes.

use crate::error::{RegistryError, RegistryResult};
use crate::locks::RepositoryLocks;
use dockyard_core::{ImageId, RepositoryName, TagName, parse_tag_body};
use dockyard_metadata::MetadataStore;
use dockyard_metadata::models::TagRow;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

/// Points tag names at head images.
pub struct TagService {
    metadata: Arc<dyn MetadataStore>,
    locks: Arc<RepositoryLocks>,
}

impl TagService {
    pub fn new(metadata: Arc<dyn MetadataStore>, locks: Arc<RepositoryLocks>) -> Self {
        Self { metadata, locks }
    }

    /// Create or move a tag.
    ///
    /// The repository must be registered. The head image is not checked here;
    /// a dangling tag surfaces when the pull manifest is resolved.
    #[tracing::instrument(
        skip(self, name, tag, body),
        fields(
            namespace = %name.namespace(),
            repository = %name.repository(),
            tag = %tag.as_str()
        )
    )]
    pub async fn put_tag(
        &self,
        name: &RepositoryName,
        tag: &TagName,
        body: &[u8],
        agent: Option<&str>,
    ) -> RegistryResult<ImageId> {
        let _guard = self
            .locks
            .acquire(name.namespace(), name.repository())
            .await;

        let repository = self
            .metadata
            .get_repository(name.namespace(), name.repository())
            .await?
            .ok_or_else(|| {
                RegistryError::NotFound("unknown namespace and repository".to_string())
            })?;

        let image_id = parse_tag_body(body)?;

        let now = OffsetDateTime::now_utc();
        let row = TagRow {
            tag_id: Uuid::new_v4(),
            repository_id: repository.repository_id,
            name: tag.as_str().to_string(),
            image_id: image_id.as_str().to_string(),
            agent: agent.map(str::to_string),
            created_at: now,
            updated_at: now,
        };
        self.metadata.upsert_tag(&row).await?;

        info!(image_id = %image_id, "Tag written");
        Ok(image_id)
    }
}
