//! Access tokens issued at repository registration.
//!
//! Wire form (the value of `Authorization`, `X-Docker-Token` and
//! `WWW-Authenticate`):
//!
//! ```text
//! Token signature=<alnum+>,repository="<alnum+>/<graph+>",access=<read|write|delete>
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Access level granted by a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    /// Pull only.
    Read,
    /// Push (register, tag, complete).
    Write,
    /// Delete; implies every other level.
    Delete,
}

impl Access {
    /// Parse from string.
    pub fn parse(s: &str) -> crate::Result<Self> {
        match s {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "delete" => Ok(Self::Delete),
            _ => Err(crate::Error::InvalidToken(format!(
                "unknown access level: {s}"
            ))),
        }
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Delete => "delete",
        }
    }

    /// Check if this access level implies another.
    pub fn implies(&self, other: &Self) -> bool {
        match self {
            Self::Delete => true,
            Self::Write => matches!(other, Self::Write | Self::Read),
            Self::Read => matches!(other, Self::Read),
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded access token.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// Opaque signature (ASCII alphanumeric).
    pub signature: String,
    /// Namespace the token is scoped to.
    pub namespace: String,
    /// Repository the token is scoped to.
    pub repository: String,
    /// Granted access level.
    pub access: Access,
}

impl AccessToken {
    /// Build a token for a repository.
    pub fn new(
        signature: impl Into<String>,
        namespace: impl Into<String>,
        repository: impl Into<String>,
        access: Access,
    ) -> Self {
        Self {
            signature: signature.into(),
            namespace: namespace.into(),
            repository: repository.into(),
            access,
        }
    }

    /// Decode a token from its header form. The whole value must match.
    pub fn parse(value: &str) -> crate::Result<Self> {
        let mut cursor = Cursor::new(value);

        cursor.expect("Token signature=")?;
        let signature = cursor.take_nonempty("signature", |c| c.is_ascii_alphanumeric())?;
        cursor.expect(",repository=\"")?;
        let namespace = cursor.take_nonempty("namespace", |c| c.is_ascii_alphanumeric())?;
        cursor.expect("/")?;
        let repository =
            cursor.take_nonempty("repository", |c| c.is_ascii_graphic() && c != '"')?;
        cursor.expect("\",access=")?;
        let access = cursor.take_nonempty("access", |c| c.is_ascii_alphanumeric())?;
        let access = Access::parse(access)?;

        if !cursor.is_empty() {
            return Err(crate::Error::InvalidToken(
                "unexpected trailing content".to_string(),
            ));
        }

        Ok(Self::new(signature, namespace, repository, access))
    }

    /// Whether the token is scoped to the given repository.
    pub fn covers(&self, namespace: &str, repository: &str) -> bool {
        self.namespace == namespace && self.repository == repository
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Keep the signature out of logs.
        f.debug_struct("AccessToken")
            .field("namespace", &self.namespace)
            .field("repository", &self.repository)
            .field("access", &self.access)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token signature={},repository=\"{}/{}\",access={}",
            self.signature, self.namespace, self.repository, self.access
        )
    }
}

struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { rest: input }
    }

    fn expect(&mut self, literal: &str) -> crate::Result<()> {
        match self.rest.strip_prefix(literal) {
            Some(rest) => {
                self.rest = rest;
                Ok(())
            }
            None => Err(crate::Error::InvalidToken(format!(
                "expected {literal:?}"
            ))),
        }
    }

    fn take_nonempty(
        &mut self,
        field: &str,
        accept: impl Fn(char) -> bool,
    ) -> crate::Result<&'a str> {
        let end = self
            .rest
            .char_indices()
            .find(|(_, c)| !accept(*c))
            .map(|(i, _)| i)
            .unwrap_or(self.rest.len());
        if end == 0 {
            return Err(crate::Error::InvalidToken(format!("empty {field}")));
        }
        let (taken, rest) = self.rest.split_at(end);
        self.rest = rest;
        Ok(taken)
    }

    fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }
}
