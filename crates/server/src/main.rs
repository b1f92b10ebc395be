//! dockyard server binary.

use anyhow::{Context, Result};
use clap::Parser;
use dockyard_core::config::AppConfig;
use dockyard_server::bootstrap::ensure_users;
use dockyard_server::{AppState, create_router};
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// dockyard - docker v1 registry metadata server
#[derive(Parser, Debug)]
#[command(name = "dockyardd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "DOCKYARD_CONFIG",
        default_value = "config/server.toml"
    )]
    config: String,
}

/// Load configuration from the optional TOML file and `DOCKYARD_` env vars.
///
/// Every field has a default, so an absent file is not an error.
fn load_config(path: &str) -> Result<AppConfig> {
    let mut figment = Figment::new();

    if std::path::Path::new(path).exists() {
        tracing::info!(config_path = %path, "Loading configuration from file");
        figment = figment.merge(Toml::file(path));
    } else {
        tracing::info!(
            config_path = %path,
            "No config file found, using defaults and environment variables"
        );
    }

    figment
        .merge(Env::prefixed("DOCKYARD_").split("__"))
        .extract()
        .context("failed to load configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("dockyard v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args.config)?;

    if config.server.metrics_enabled {
        dockyard_server::metrics::register_metrics();
        tracing::info!("Prometheus metrics registered");
    }

    let metadata = dockyard_metadata::from_config(&config.metadata)
        .await
        .context("failed to initialize metadata store")?;
    metadata
        .health_check()
        .await
        .context("metadata store health check failed")?;
    tracing::info!("Metadata store initialized");

    ensure_users(metadata.as_ref(), &config.users).await?;
    if config.users.is_empty() {
        tracing::warn!("No users configured; only previously stored accounts can authenticate");
    }

    let addr: SocketAddr = config.server.bind.parse().context("invalid bind address")?;

    let state = AppState::new(config, metadata);
    let app = create_router(state);

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_config_without_file_uses_defaults() {
        let config = load_config("/nonexistent/dockyard.toml").unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:5000");
        assert!(config.users.is_empty());
    }

    #[test]
    fn load_config_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        std::fs::write(
            &path,
            r#"
[server]
bind = "0.0.0.0:5001"
endpoints = "registry.example.com"

[metadata]
type = "sqlite"
path = "/var/lib/dockyard/metadata.db"

[[users]]
username = "alice"
password_hash = "sha256:2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b"
"#,
        )
        .unwrap();

        let config = load_config(path.to_str().unwrap()).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:5001");
        assert_eq!(config.server.endpoints, "registry.example.com");
        assert_eq!(config.users.len(), 1);
        assert!(config.users[0].active);
    }
}
