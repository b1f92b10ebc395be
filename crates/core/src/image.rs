//! Image identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum accepted length of an image identifier.
///
/// Also bounds tag-write bodies: an overlong first quoted token rejects the
/// whole body.
pub const MAX_IMAGE_ID_LEN: usize = 128;

/// An image identifier (non-empty ASCII alphanumeric).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageId(String);

impl ImageId {
    /// Parse and validate an image identifier.
    pub fn parse(s: &str) -> crate::Result<Self> {
        if s.is_empty() {
            return Err(crate::Error::InvalidImageId("empty image id".to_string()));
        }
        if s.len() > MAX_IMAGE_ID_LEN {
            return Err(crate::Error::InvalidImageId(format!(
                "image id exceeds {MAX_IMAGE_ID_LEN} characters"
            )));
        }
        if !s.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(crate::Error::InvalidImageId(format!(
                "image id must be alphanumeric: {s:?}"
            )));
        }
        Ok(Self(s.to_string()))
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the underlying string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ImageId {
    type Error = crate::Error;

    fn try_from(value: String) -> crate::Result<Self> {
        Self::parse(&value)
    }
}

impl From<ImageId> for String {
    fn from(id: ImageId) -> Self {
        id.0
    }
}

impl AsRef<str> for ImageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageId({})", self.0)
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
