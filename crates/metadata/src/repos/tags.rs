//! Tag records.

use crate::error::MetadataResult;
use crate::models::TagRow;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository for tag operations.
#[async_trait]
pub trait TagRepo: Send + Sync {
    /// Create a tag or point an existing one at a new image.
    ///
    /// Upserts on `(repository_id, name)`. An existing tag keeps its
    /// `tag_id`, `created_at` and position in [`TagRepo::list_tags`].
    async fn upsert_tag(&self, tag: &TagRow) -> MetadataResult<()>;

    /// Get a tag by repository and name.
    async fn get_tag(&self, repository_id: Uuid, name: &str) -> MetadataResult<Option<TagRow>>;

    /// List all tags of a repository in insertion order.
    async fn list_tags(&self, repository_id: Uuid) -> MetadataResult<Vec<TagRow>>;
}
