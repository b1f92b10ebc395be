//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Value of the `X-Docker-Registry-Version` header.
    #[serde(default = "default_registry_version")]
    pub registry_version: String,
    /// Value of the `X-Docker-Registry-Config` header.
    #[serde(default = "default_registry_config")]
    pub registry_config: String,
    /// Value of the `X-Docker-Endpoints` header returned to push and pull clients.
    #[serde(default = "default_endpoints")]
    pub endpoints: String,
    /// Maximum accepted request body size in bytes (registration manifests, tag bodies).
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
    /// Enable the /metrics endpoint for Prometheus scraping (default: true).
    /// SECURITY: When enabled, ensure this endpoint is network-restricted
    /// to authorized scraper IPs at the infrastructure level.
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_registry_version() -> String {
    crate::DEFAULT_REGISTRY_VERSION.to_string()
}

fn default_registry_config() -> String {
    "prod".to_string()
}

fn default_endpoints() -> String {
    "localhost:5000".to_string()
}

fn default_max_body_size() -> usize {
    4 * 1024 * 1024 // 4 MiB
}

fn default_metrics_enabled() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            registry_version: default_registry_version(),
            registry_config: default_registry_config(),
            endpoints: default_endpoints(),
            max_body_size: default_max_body_size(),
            metrics_enabled: default_metrics_enabled(),
        }
    }
}

/// Metadata store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MetadataConfig {
    /// SQLite database.
    Sqlite {
        /// Database file path.
        path: PathBuf,
        /// Query timeout in seconds (advisory only - SQLite cannot force-cancel queries).
        #[serde(default = "default_sqlite_query_timeout_secs")]
        query_timeout_secs: Option<u64>,
    },
}

fn default_sqlite_query_timeout_secs() -> Option<u64> {
    Some(600) // 10 minutes (advisory only)
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self::Sqlite {
            path: PathBuf::from("./data/metadata.db"),
            query_timeout_secs: default_sqlite_query_timeout_secs(),
        }
    }
}

/// A registry account seeded at startup.
///
/// Accounts are owned by the external credential store; seeding them from
/// configuration keeps single-node deployments self-contained.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserConfig {
    /// Account name; doubles as the namespace the account may push to.
    pub username: String,
    /// SHA-256 of the password (hex, optional `sha256:` prefix).
    /// Generate with: `echo -n "your-password" | sha256sum`
    pub password_hash: String,
    /// Inactive accounts are rejected with 403.
    #[serde(default = "default_user_active")]
    pub active: bool,
}

fn default_user_active() -> bool {
    true
}

/// Complete application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Metadata store configuration.
    #[serde(default)]
    pub metadata: MetadataConfig,
    /// Accounts to create or update at startup.
    #[serde(default)]
    pub users: Vec<UserConfig>,
}

impl AppConfig {
    /// Create a test configuration with sensible defaults.
    ///
    /// **For testing only.** Uses SQLite metadata and no seeded users.
    pub fn for_testing() -> Self {
        Self {
            server: ServerConfig {
                metrics_enabled: false,
                ..ServerConfig::default()
            },
            metadata: MetadataConfig::default(),
            users: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind, "127.0.0.1:5000");
        assert_eq!(config.registry_version, crate::DEFAULT_REGISTRY_VERSION);
        assert!(config.metrics_enabled);
    }

    #[test]
    fn test_app_config_deserialize_minimal() {
        let json = r#"{"users": [{"username": "alice", "password_hash": "00"}]}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.server.endpoints, "localhost:5000");
        assert_eq!(config.users.len(), 1);
        assert!(config.users[0].active);
        match config.metadata {
            MetadataConfig::Sqlite {
                query_timeout_secs, ..
            } => assert_eq!(query_timeout_secs, Some(600)),
        }
    }

    #[test]
    fn test_metadata_config_tagged() {
        let json = r#"{"type": "sqlite", "path": "/tmp/meta.db"}"#;
        let config: MetadataConfig = serde_json::from_str(json).unwrap();
        let MetadataConfig::Sqlite { path, .. } = config;
        assert_eq!(path, PathBuf::from("/tmp/meta.db"));
    }
}
