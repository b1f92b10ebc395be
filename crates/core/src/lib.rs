//! Core domain types for the dockyard registry metadata coordinator.
//!
//! This crate defines the canonical data model shared by every other crate:
//! - Image identifiers and repository/tag names
//! - Repository manifests (ordered image lists) and their JSON codec
//! - Ancestry lineage and order-preserving deduplication
//! - The `Token signature=...` access-token grammar and basic credentials
//! - Tag-write body decoding
//! - Configuration

pub mod ancestry;
pub mod config;
pub mod credentials;
pub mod error;
pub mod hash;
pub mod image;
pub mod manifest;
pub mod repository;
pub mod tag_body;
pub mod token;

pub use ancestry::{AncestryAccumulator, dedup_preserving_order, lineage};
pub use credentials::{BasicCredentials, Credentials};
pub use error::{Error, Result};
pub use image::ImageId;
pub use manifest::{Manifest, ManifestEntry};
pub use repository::{RepositoryName, TagName};
pub use tag_body::parse_tag_body;
pub use token::{Access, AccessToken};

/// Registry protocol version advertised in `X-Docker-Registry-Version`.
pub const DEFAULT_REGISTRY_VERSION: &str = "0.6.0";
