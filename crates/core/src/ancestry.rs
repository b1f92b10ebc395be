//! Ancestry lineage and pull-manifest accumulation.

use crate::image::ImageId;
use crate::manifest::Manifest;
use std::collections::HashSet;

/// Decode a stored ancestor chain (JSON array of image ids, nearest first).
pub fn parse_chain(json: &str) -> crate::Result<Vec<ImageId>> {
    serde_json::from_str(json).map_err(|e| crate::Error::InvalidAncestry(e.to_string()))
}

/// Encode an ancestor chain for storage.
pub fn chain_to_json(chain: &[ImageId]) -> crate::Result<String> {
    serde_json::to_string(chain).map_err(|e| crate::Error::Serialization(e.to_string()))
}

/// The head image followed by its ancestors, nearest first.
///
/// Stored chains may already start with the head image itself; that leading
/// entry is not repeated.
pub fn lineage(head: &ImageId, chain: &[ImageId]) -> Vec<ImageId> {
    let ancestors = match chain.first() {
        Some(first) if first == head => &chain[1..],
        _ => chain,
    };
    let mut ids = Vec::with_capacity(ancestors.len() + 1);
    ids.push(head.clone());
    ids.extend_from_slice(ancestors);
    ids
}

/// Remove duplicates, keeping each id at the position of its first occurrence.
pub fn dedup_preserving_order(ids: impl IntoIterator<Item = ImageId>) -> Vec<ImageId> {
    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

/// Accumulates tag lineages into a pull manifest.
///
/// Each new lineage is prepended, so lineages pushed later take positional
/// priority over earlier ones.
#[derive(Debug, Default)]
pub struct AncestryAccumulator {
    ids: Vec<ImageId>,
}

impl AncestryAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a lineage to the running list.
    pub fn prepend(&mut self, mut lineage: Vec<ImageId>) {
        lineage.append(&mut self.ids);
        self.ids = lineage;
    }

    /// Deduplicate and produce the pull manifest.
    pub fn finish(self) -> Manifest {
        Manifest::from_ids(dedup_preserving_order(self.ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ImageId {
        ImageId::parse(s).unwrap()
    }

    fn ids(values: &[&str]) -> Vec<ImageId> {
        values.iter().map(|s| id(s)).collect()
    }

    fn names(manifest: &Manifest) -> Vec<&str> {
        manifest.image_ids().map(ImageId::as_str).collect()
    }

    #[test]
    fn test_parse_chain() {
        assert_eq!(parse_chain(r#"["a","b"]"#).unwrap(), ids(&["a", "b"]));
        assert!(parse_chain("[]").unwrap().is_empty());
        assert!(parse_chain("{}").is_err());
        assert!(parse_chain(r#"["a-b"]"#).is_err());
    }

    #[test]
    fn test_lineage_adds_head() {
        assert_eq!(lineage(&id("img2"), &ids(&["img1"])), ids(&["img2", "img1"]));
        assert_eq!(lineage(&id("img1"), &[]), ids(&["img1"]));
    }

    #[test]
    fn test_lineage_does_not_repeat_self_inclusive_chain() {
        assert_eq!(
            lineage(&id("c"), &ids(&["c", "b", "a"])),
            ids(&["c", "b", "a"])
        );
    }

    #[test]
    fn test_dedup_keeps_first_position() {
        assert_eq!(
            dedup_preserving_order(ids(&["a", "b", "a", "c", "b"])),
            ids(&["a", "b", "c"])
        );
    }

    #[test]
    fn test_accumulator_prepends_later_lineages() {
        let mut acc = AncestryAccumulator::new();
        acc.prepend(ids(&["img2", "img1"]));
        acc.prepend(ids(&["img1"]));
        assert_eq!(names(&acc.finish()), vec!["img1", "img2"]);

        let mut acc = AncestryAccumulator::new();
        acc.prepend(ids(&["img1"]));
        acc.prepend(ids(&["img2", "img1"]));
        assert_eq!(names(&acc.finish()), vec!["img2", "img1"]);
    }

    #[test]
    fn test_accumulator_shared_base() {
        let mut acc = AncestryAccumulator::new();
        acc.prepend(ids(&["web", "base"]));
        acc.prepend(ids(&["api", "base"]));
        acc.prepend(ids(&["worker", "api", "base"]));
        assert_eq!(
            names(&acc.finish()),
            vec!["worker", "api", "base", "web"]
        );
    }
}
