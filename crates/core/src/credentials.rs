//! `Authorization` header decoding.

use crate::token::AccessToken;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt;

/// Username/password pair from a `Basic` header.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl BasicCredentials {
    /// Decode `Basic <base64(user:password)>`. The scheme is case-insensitive.
    pub fn parse(value: &str) -> crate::Result<Self> {
        let encoded = value
            .get(..6)
            .filter(|scheme| scheme.eq_ignore_ascii_case("basic "))
            .map(|_| value[6..].trim())
            .ok_or_else(|| crate::Error::InvalidCredentials("not a basic header".to_string()))?;

        let decoded = STANDARD
            .decode(encoded)
            .map_err(|e| crate::Error::InvalidCredentials(format!("invalid base64: {e}")))?;
        let decoded = String::from_utf8(decoded)
            .map_err(|_| crate::Error::InvalidCredentials("credentials are not UTF-8".to_string()))?;

        let (username, password) = decoded
            .split_once(':')
            .ok_or_else(|| crate::Error::InvalidCredentials("missing ':' separator".to_string()))?;
        if username.is_empty() {
            return Err(crate::Error::InvalidCredentials("empty username".to_string()));
        }

        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Credentials presented on a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
    Token(AccessToken),
    Basic(BasicCredentials),
}

impl Credentials {
    /// Decode an `Authorization` value; the token grammar is tried first.
    pub fn parse(value: &str) -> crate::Result<Self> {
        if let Ok(token) = AccessToken::parse(value) {
            return Ok(Self::Token(token));
        }
        BasicCredentials::parse(value).map(Self::Basic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Access;

    fn basic(raw: &str) -> String {
        format!("Basic {}", STANDARD.encode(raw))
    }

    #[test]
    fn test_basic_parse() {
        let creds = BasicCredentials::parse(&basic("alice:s3cr:et")).unwrap();
        assert_eq!(creds.username, "alice");
        assert_eq!(creds.password, "s3cr:et");

        let creds = BasicCredentials::parse(&basic("bob:pw").replace("Basic", "BASIC")).unwrap();
        assert_eq!(creds.username, "bob");
    }

    #[test]
    fn test_basic_parse_rejects_malformed() {
        assert!(BasicCredentials::parse("Basic !!!").is_err());
        assert!(BasicCredentials::parse(&basic("nocolon")).is_err());
        assert!(BasicCredentials::parse(&basic(":pw")).is_err());
        assert!(BasicCredentials::parse("Bearer abc").is_err());
        assert!(BasicCredentials::parse("Basic").is_err());
    }

    #[test]
    fn test_credentials_prefers_token() {
        let creds =
            Credentials::parse("Token signature=abc,repository=\"alice/app\",access=read").unwrap();
        match creds {
            Credentials::Token(token) => assert_eq!(token.access, Access::Read),
            other => panic!("expected token, got {other:?}"),
        }

        let creds = Credentials::parse(&basic("alice:pw")).unwrap();
        assert!(matches!(creds, Credentials::Basic(_)));

        assert!(Credentials::parse("garbage").is_err());
    }
}
