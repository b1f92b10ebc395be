//! Pull-side visibility of repositories.

use crate::error::{RegistryError, RegistryResult};
use dockyard_core::RepositoryName;
use dockyard_metadata::MetadataStore;
use dockyard_metadata::models::RepositoryRow;

/// Whether a repository may be served to pull clients.
///
/// Incomplete repositories are reported exactly like missing ones.
pub fn is_pull_visible(repository: &RepositoryRow) -> bool {
    repository.uploaded && repository.checksummed
}

/// Load a repository for a pull-side read.
pub(crate) async fn load_pull_visible(
    metadata: &dyn MetadataStore,
    name: &RepositoryName,
) -> RegistryResult<RepositoryRow> {
    match metadata
        .get_repository(name.namespace(), name.repository())
        .await?
    {
        Some(repository) if is_pull_visible(&repository) => Ok(repository),
        _ => Err(RegistryError::NotFound("repository not found".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn row(uploaded: bool, checksummed: bool) -> RepositoryRow {
        let now = OffsetDateTime::now_utc();
        RepositoryRow {
            repository_id: Uuid::new_v4(),
            namespace: "alice".to_string(),
            name: "app".to_string(),
            manifest_json: "[]".to_string(),
            uploaded,
            checksummed,
            size: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_visible_only_when_both_flags_set() {
        assert!(is_pull_visible(&row(true, true)));
        assert!(!is_pull_visible(&row(true, false)));
        assert!(!is_pull_visible(&row(false, true)));
        assert!(!is_pull_visible(&row(false, false)));
    }
}
