//! Repository and tag names.

use std::fmt;

/// Maximum accepted length of a repository or tag name.
pub const MAX_NAME_LEN: usize = 128;

/// A `(namespace, repository)` pair identifying a repository.
///
/// The namespace is the owning account name (ASCII alphanumeric). The
/// repository part is any printable ASCII without `/`, `"` or whitespace.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RepositoryName {
    namespace: String,
    repository: String,
}

impl RepositoryName {
    /// Validate and build a repository name.
    pub fn parse(namespace: &str, repository: &str) -> crate::Result<Self> {
        if namespace.is_empty() || namespace.len() > MAX_NAME_LEN {
            return Err(crate::Error::InvalidRepositoryName(format!(
                "namespace must be 1-{MAX_NAME_LEN} characters"
            )));
        }
        if !namespace.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(crate::Error::InvalidRepositoryName(format!(
                "namespace must be alphanumeric: {namespace:?}"
            )));
        }
        if repository.is_empty() || repository.len() > MAX_NAME_LEN {
            return Err(crate::Error::InvalidRepositoryName(format!(
                "repository must be 1-{MAX_NAME_LEN} characters"
            )));
        }
        if !repository
            .chars()
            .all(|c| c.is_ascii_graphic() && c != '/' && c != '"')
        {
            return Err(crate::Error::InvalidRepositoryName(format!(
                "repository contains invalid characters: {repository:?}"
            )));
        }
        Ok(Self {
            namespace: namespace.to_string(),
            repository: repository.to_string(),
        })
    }

    /// The owning namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The repository name within the namespace.
    pub fn repository(&self) -> &str {
        &self.repository
    }
}

impl fmt::Debug for RepositoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RepositoryName({}/{})", self.namespace, self.repository)
    }
}

impl fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.repository)
    }
}

/// A tag name (`[A-Za-z0-9_.-]`, 1-128 characters).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TagName(String);

impl TagName {
    /// Validate a tag name.
    pub fn parse(s: &str) -> crate::Result<Self> {
        if s.is_empty() || s.len() > MAX_NAME_LEN {
            return Err(crate::Error::InvalidTagName(format!(
                "tag must be 1-{MAX_NAME_LEN} characters"
            )));
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        {
            return Err(crate::Error::InvalidTagName(format!(
                "tag contains invalid characters: {s:?}"
            )));
        }
        Ok(Self(s.to_string()))
    }

    /// Get the tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
