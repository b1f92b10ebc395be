//! Test fixtures for generating test data.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use dockyard_core::ImageId;
use dockyard_core::ancestry::chain_to_json;
use dockyard_core::hash::sha256_hex;

/// Compute SHA-256 hash of data as hex string.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub fn sha256_hash(data: &[u8]) -> String {
    sha256_hex(data)
}

/// Build a `Basic` Authorization header value.
#[allow(dead_code)]
pub fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

/// Build a registration body `[{"id": ...}, ...]`.
#[allow(dead_code)]
pub fn manifest_body(ids: &[&str]) -> String {
    let entries: Vec<String> = ids.iter().map(|id| format!(r#"{{"id":"{id}"}}"#)).collect();
    format!("[{}]", entries.join(","))
}

/// Encode an ancestor chain the way the artifact endpoints store it.
#[allow(dead_code)]
pub fn ancestry_json(chain: &[&str]) -> String {
    let ids: Vec<ImageId> = chain
        .iter()
        .map(|id| ImageId::parse(id).expect("valid image id"))
        .collect();
    chain_to_json(&ids).expect("Failed to encode ancestry")
}
