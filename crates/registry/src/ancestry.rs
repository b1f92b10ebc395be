//! Pull-side resolution of tags and image ancestry.

use crate::error::{RegistryError, RegistryResult};
use crate::visibility::load_pull_visible;
use dockyard_core::ancestry::parse_chain;
use dockyard_core::{AncestryAccumulator, ImageId, Manifest, RepositoryName, lineage};
use dockyard_metadata::MetadataStore;
use dockyard_metadata::models::TagRow;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Builds pull manifests and tag maps for complete repositories.
pub struct AncestryResolver {
    metadata: Arc<dyn MetadataStore>,
}

impl AncestryResolver {
    pub fn new(metadata: Arc<dyn MetadataStore>) -> Self {
        Self { metadata }
    }

    /// The deduplicated list of images a pull client must fetch.
    ///
    /// Tags are walked in persisted order and each tag's lineage (head image,
    /// then its ancestors nearest first) is prepended to the running list, so
    /// lineages of later tags come first. Each image then keeps only its first
    /// position.
    #[tracing::instrument(
        skip(self, name),
        fields(namespace = %name.namespace(), repository = %name.repository())
    )]
    pub async fn resolve_pull_manifest(&self, name: &RepositoryName) -> RegistryResult<Manifest> {
        let tags = self.visible_tags(name).await?;

        let mut accumulator = AncestryAccumulator::new();
        for tag in &tags {
            let head = ImageId::parse(&tag.image_id).map_err(|e| {
                RegistryError::Validation(format!("tag {} has an invalid head image: {e}", tag.name))
            })?;

            let image = self
                .metadata
                .get_image(head.as_str())
                .await?
                .ok_or_else(|| {
                    RegistryError::Validation(format!(
                        "tag {} references image {head} which does not exist",
                        tag.name
                    ))
                })?;

            let chain = parse_chain(&image.ancestry_json).map_err(|e| {
                RegistryError::Validation(format!("ancestry of image {head} is malformed: {e}"))
            })?;

            accumulator.prepend(lineage(&head, &chain));
        }

        let manifest = accumulator.finish();
        debug!(
            tags = tags.len(),
            images = manifest.len(),
            "Resolved pull manifest"
        );
        Ok(manifest)
    }

    /// Tag name to head image id.
    #[tracing::instrument(
        skip(self, name),
        fields(namespace = %name.namespace(), repository = %name.repository())
    )]
    pub async fn resolve_tags(
        &self,
        name: &RepositoryName,
    ) -> RegistryResult<BTreeMap<String, String>> {
        let tags = self.visible_tags(name).await?;
        Ok(tags
            .into_iter()
            .map(|tag| (tag.name, tag.image_id))
            .collect())
    }

    async fn visible_tags(&self, name: &RepositoryName) -> RegistryResult<Vec<TagRow>> {
        let repository = load_pull_visible(self.metadata.as_ref(), name).await?;
        let tags = self.metadata.list_tags(repository.repository_id).await?;
        if tags.is_empty() {
            return Err(RegistryError::NotFound("no tags found".to_string()));
        }
        Ok(tags)
    }
}
