//! Server test utilities.

use super::fixtures::{ancestry_json, sha256_hash};
use dockyard_core::config::{AppConfig, MetadataConfig};
use dockyard_metadata::models::{ImageRow, UserRow};
use dockyard_metadata::{MetadataStore, SqliteStore};
use dockyard_server::{AppState, create_router};
use std::sync::Arc;
use tempfile::TempDir;
use time::OffsetDateTime;
use uuid::Uuid;

/// A test server wrapper with all dependencies.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a new test server with a temporary metadata store.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test server with custom config modifications.
    pub async fn with_config<F>(modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

        let db_path = temp_dir.path().join("metadata.db");
        let metadata: Arc<dyn MetadataStore> = Arc::new(
            SqliteStore::new(&db_path, None)
                .await
                .expect("Failed to create metadata store"),
        );

        let mut config = AppConfig::for_testing();
        config.metadata = MetadataConfig::Sqlite {
            path: db_path,
            query_timeout_secs: None,
        };
        modifier(&mut config);

        if config.server.metrics_enabled {
            dockyard_server::metrics::register_metrics();
        }

        let state = AppState::new(config, metadata);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            _temp_dir: temp_dir,
        }
    }

    /// Get access to the underlying metadata.
    pub fn metadata(&self) -> Arc<dyn MetadataStore> {
        self.state.metadata.clone()
    }

    /// Create an account with the given password.
    pub async fn create_user(&self, username: &str, password: &str, active: bool) -> Uuid {
        let now = OffsetDateTime::now_utc();
        let user = UserRow {
            user_id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: sha256_hash(password.as_bytes()),
            active,
            created_at: now,
            updated_at: now,
        };
        self.metadata()
            .create_user(&user)
            .await
            .expect("Failed to create user");
        user.user_id
    }

    /// Write an image record the way the artifact endpoints would.
    pub async fn put_image(
        &self,
        image_id: &str,
        chain: &[&str],
        size: i64,
        uploaded: bool,
        checksummed: bool,
    ) {
        let now = OffsetDateTime::now_utc();
        let image = ImageRow {
            image_id: image_id.to_string(),
            ancestry_json: ancestry_json(chain),
            size,
            uploaded,
            checksummed,
            created_at: now,
            updated_at: now,
        };
        self.metadata()
            .upsert_image(&image)
            .await
            .expect("Failed to upsert image");
    }
}
