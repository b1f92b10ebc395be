//! Repository manifests: the ordered image lists exchanged on push and pull.
//!
//! The wire form is a JSON array of objects carrying an `id` field, e.g.
//! `[{"id": "img1"}, {"id": "img2"}]`. Clients may send extra fields per entry
//! (`checksum`, `Tag`); they are ignored.

use crate::image::ImageId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single manifest entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Image identifier.
    pub id: ImageId,
}

/// An ordered list of image identifiers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Build a manifest from image ids, preserving order.
    pub fn from_ids(ids: impl IntoIterator<Item = ImageId>) -> Self {
        Self {
            entries: ids.into_iter().map(|id| ManifestEntry { id }).collect(),
        }
    }

    /// Decode a manifest from its JSON wire form.
    pub fn parse(bytes: &[u8]) -> crate::Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| crate::Error::InvalidManifest(e.to_string()))
    }

    /// Encode the manifest as normalized JSON (`[{"id": ...}]`).
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string(self).map_err(|e| crate::Error::Serialization(e.to_string()))
    }

    /// Image ids in submitted order (duplicates included).
    pub fn image_ids(&self) -> impl Iterator<Item = &ImageId> {
        self.entries.iter().map(|e| &e.id)
    }

    /// Image ids with duplicates removed, first occurrence wins.
    pub fn unique_image_ids(&self) -> Vec<ImageId> {
        let mut seen = HashSet::with_capacity(self.entries.len());
        self.image_ids()
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manifest has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(manifest: &Manifest) -> Vec<&str> {
        manifest.image_ids().map(ImageId::as_str).collect()
    }

    #[test]
    fn test_parse_preserves_order() {
        let manifest = Manifest::parse(br#"[{"id":"img2"},{"id":"img1"}]"#).unwrap();
        assert_eq!(ids(&manifest), vec!["img2", "img1"]);
    }

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let body = br#"[{"id":"abc","checksum":"sha256:00","Tag":"latest"}]"#;
        let manifest = Manifest::parse(body).unwrap();
        assert_eq!(ids(&manifest), vec!["abc"]);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(Manifest::parse(b"not json").is_err());
        assert!(Manifest::parse(br#"{"id":"img1"}"#).is_err());
        assert!(Manifest::parse(br#"["img1"]"#).is_err());
        assert!(Manifest::parse(br#"[{"name":"img1"}]"#).is_err());
        assert!(Manifest::parse(br#"[{"id":""}]"#).is_err());
        assert!(Manifest::parse(br#"[{"id":"a/b"}]"#).is_err());
    }

    #[test]
    fn test_to_json_is_normalized() {
        let manifest = Manifest::parse(br#"[{"id":"abc","checksum":"x"}]"#).unwrap();
        assert_eq!(manifest.to_json().unwrap(), r#"[{"id":"abc"}]"#);
    }

    #[test]
    fn test_unique_image_ids_keeps_first_occurrence() {
        let manifest =
            Manifest::parse(br#"[{"id":"a"},{"id":"b"},{"id":"a"},{"id":"c"}]"#).unwrap();
        let unique: Vec<String> = manifest
            .unique_image_ids()
            .into_iter()
            .map(ImageId::into_string)
            .collect();
        assert_eq!(unique, vec!["a", "b", "c"]);
        assert_eq!(manifest.len(), 4);
    }

    #[test]
    fn test_empty_manifest() {
        let manifest = Manifest::parse(b"[]").unwrap();
        assert!(manifest.is_empty());
        assert_eq!(manifest.to_json().unwrap(), "[]");
    }
}
