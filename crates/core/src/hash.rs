//! SHA-256 helpers used for password and token-signature lookup keys.

use sha2::{Digest, Sha256};

/// Hash arbitrary bytes and return the lowercase hex digest.
pub fn sha256_hex(data: impl AsRef<[u8]>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data.as_ref());
    hex::encode(hasher.finalize())
}

/// Normalize a configured SHA-256 digest.
///
/// Accepts an optional `sha256:` prefix and any hex case; returns the bare
/// lowercase digest.
pub fn normalize_sha256_hex(value: &str) -> crate::Result<String> {
    let hex = value.strip_prefix("sha256:").unwrap_or(value).to_lowercase();
    if hex.len() != 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(crate::Error::InvalidHash(
            "expected 64 hex characters".to_string(),
        ));
    }
    Ok(hex)
}
