//! Image records.
//!
//! Image rows are owned by the per-image artifact endpoints (JSON, layer,
//! checksum). The registry core only reads them; `upsert_image` is the write
//! path those endpoints use.

use crate::error::MetadataResult;
use crate::models::ImageRow;
use async_trait::async_trait;

/// Repository for image operations.
#[async_trait]
pub trait ImageRepo: Send + Sync {
    /// Create or fully replace an image record.
    async fn upsert_image(&self, image: &ImageRow) -> MetadataResult<()>;

    /// Get an image by id.
    async fn get_image(&self, image_id: &str) -> MetadataResult<Option<ImageRow>>;
}
