//! Upload completion gate.
//!
//! A push uploads every image independently and out of order, so no single
//! request can tell when the push is done. The client signals completion and
//! the verifier re-scans the registered manifest against the per-image
//! records. Only when every image is uploaded and checksummed are the
//! repository's rollup fields (`uploaded`, `checksummed`, `size`) committed,
//! together, in one update. Any failing image aborts the scan before anything
//! is written.

use crate::error::{RegistryError, RegistryResult};
use crate::locks::RepositoryLocks;
use dockyard_core::{ImageId, Manifest, RepositoryName};
use dockyard_metadata::MetadataStore;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{debug, info};

/// Outcome of a successful completion check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionSummary {
    /// Distinct images verified.
    pub image_count: usize,
    /// Committed repository size in bytes.
    pub size: i64,
}

/// Verifies a repository push and commits its rollup state.
pub struct UploadCompletionVerifier {
    metadata: Arc<dyn MetadataStore>,
    locks: Arc<RepositoryLocks>,
}

impl UploadCompletionVerifier {
    pub fn new(metadata: Arc<dyn MetadataStore>, locks: Arc<RepositoryLocks>) -> Self {
        Self { metadata, locks }
    }

    /// Check every manifest image and, if all pass, mark the repository
    /// uploaded and checksummed with the summed size.
    ///
    /// Idempotent: a repeated call after success re-verifies and rewrites the
    /// same values.
    #[tracing::instrument(
        skip(self, name),
        fields(namespace = %name.namespace(), repository = %name.repository())
    )]
    pub async fn verify_and_finalize(
        &self,
        name: &RepositoryName,
    ) -> RegistryResult<CompletionSummary> {
        let _guard = self
            .locks
            .acquire(name.namespace(), name.repository())
            .await;

        let repository = self
            .metadata
            .get_repository(name.namespace(), name.repository())
            .await?
            .ok_or_else(|| RegistryError::NotFound("repository not found".to_string()))?;

        let manifest = Manifest::parse(repository.manifest_json.as_bytes()).map_err(|e| {
            RegistryError::Validation(format!("stored manifest is malformed: {e}"))
        })?;
        let image_ids = manifest.unique_image_ids();

        let size = self.scan(&image_ids).await?;

        self.metadata
            .finalize_repository(repository.repository_id, size, OffsetDateTime::now_utc())
            .await?;

        info!(
            images = image_ids.len(),
            size, "Repository upload verified and committed"
        );

        Ok(CompletionSummary {
            image_count: image_ids.len(),
            size,
        })
    }

    /// Short-circuiting scan; returns the summed size when every image passes.
    async fn scan(&self, image_ids: &[ImageId]) -> RegistryResult<i64> {
        let mut total: i64 = 0;

        for image_id in image_ids {
            let image = self
                .metadata
                .get_image(image_id.as_str())
                .await?
                .ok_or_else(|| {
                    RegistryError::NotFound(format!(
                        "manifest references image {image_id} which was never uploaded"
                    ))
                })?;

            if !image.uploaded {
                debug!(image_id = %image_id, "Image upload not complete");
                return Err(RegistryError::IncompleteUpload(
                    "the image layer upload is not complete, please try again".to_string(),
                ));
            }

            if !image.checksummed {
                debug!(image_id = %image_id, "Image checksum not verified");
                return Err(RegistryError::ChecksumPending(
                    "the image layer checksum is not verified, please try again".to_string(),
                ));
            }

            total = total.checked_add(image.size).ok_or_else(|| {
                RegistryError::Validation("repository size overflows".to_string())
            })?;
        }

        Ok(total)
    }
}
