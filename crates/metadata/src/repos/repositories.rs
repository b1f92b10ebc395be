//! Repository (image collection) records.

use crate::error::MetadataResult;
use crate::models::RepositoryRow;
use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

/// Repository for repository records.
#[async_trait]
pub trait RepositoryRepo: Send + Sync {
    /// Create a repository or replace the manifest of an existing one.
    ///
    /// Runs as a single `INSERT .. ON CONFLICT DO UPDATE` so concurrent
    /// registrations cannot interleave a read-modify-write. Only
    /// `manifest_json` and `updated_at` change on conflict; the rollup fields
    /// and `repository_id` of an existing row are preserved.
    ///
    /// Returns the stored row.
    async fn upsert_repository(&self, repository: &RepositoryRow) -> MetadataResult<RepositoryRow>;

    /// Get a repository by `(namespace, name)`.
    async fn get_repository(
        &self,
        namespace: &str,
        name: &str,
    ) -> MetadataResult<Option<RepositoryRow>>;

    /// Commit the rollup fields (`uploaded`, `checksummed`, `size`) in one update.
    ///
    /// Returns `NotFound` if the repository does not exist.
    async fn finalize_repository(
        &self,
        repository_id: Uuid,
        size: i64,
        updated_at: OffsetDateTime,
    ) -> MetadataResult<()>;

    /// List repositories in a namespace, ordered by name.
    async fn list_repositories(&self, namespace: &str) -> MetadataResult<Vec<RepositoryRow>>;
}
