//! Metadata store trait and implementations.

use crate::error::{MetadataError, MetadataResult};
use crate::repos::{ImageRepo, RepositoryRepo, TagRepo, TokenRepo, UserRepo};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Combined metadata store trait.
#[async_trait]
pub trait MetadataStore:
    RepositoryRepo + TagRepo + ImageRepo + UserRepo + TokenRepo + Send + Sync
{
    /// Run database migrations.
    async fn migrate(&self) -> MetadataResult<()>;

    /// Check database connectivity and health.
    async fn health_check(&self) -> MetadataResult<()>;
}

/// SQLite-based metadata store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
    query_timeout_secs: u64,
}

impl SqliteStore {
    /// Create a new SQLite store.
    pub async fn new(
        path: impl AsRef<Path>,
        query_timeout_secs: Option<u64>,
    ) -> MetadataResult<Self> {
        let path = path.as_ref();
        let query_timeout_secs = query_timeout_secs.unwrap_or(600); // 10 minutes default

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .foreign_keys(true)
            // Prevent transient "database is locked" errors under concurrent access.
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            // SQLite permits a single writer; one connection serializes statements
            // instead of surfacing "database is locked" under axum concurrency.
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(query_timeout_secs))
            .connect_with(opts)
            .await?;

        let store = Self {
            pool,
            query_timeout_secs,
        };
        store.migrate().await?;

        tracing::debug!(
            path = %path.display(),
            query_timeout_secs = store.query_timeout_secs,
            "SQLite metadata store opened"
        );

        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl MetadataStore for SqliteStore {
    async fn migrate(&self) -> MetadataResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

// Implement all the repository traits for SqliteStore
mod sqlite_impl {
    use super::*;
    use crate::models::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    #[async_trait]
    impl RepositoryRepo for SqliteStore {
        async fn upsert_repository(
            &self,
            repository: &RepositoryRow,
        ) -> MetadataResult<RepositoryRow> {
            let row = sqlx::query_as::<_, RepositoryRow>(
                r#"
                INSERT INTO repositories (
                    repository_id, namespace, name, manifest_json,
                    uploaded, checksummed, size, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT (namespace, name) DO UPDATE SET
                    manifest_json = excluded.manifest_json,
                    updated_at = excluded.updated_at
                RETURNING *
                "#,
            )
            .bind(repository.repository_id)
            .bind(&repository.namespace)
            .bind(&repository.name)
            .bind(&repository.manifest_json)
            .bind(repository.uploaded)
            .bind(repository.checksummed)
            .bind(repository.size)
            .bind(repository.created_at)
            .bind(repository.updated_at)
            .fetch_one(&self.pool)
            .await?;
            Ok(row)
        }

        async fn get_repository(
            &self,
            namespace: &str,
            name: &str,
        ) -> MetadataResult<Option<RepositoryRow>> {
            let row = sqlx::query_as::<_, RepositoryRow>(
                "SELECT * FROM repositories WHERE namespace = ? AND name = ?",
            )
            .bind(namespace)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
            Ok(row)
        }

        async fn finalize_repository(
            &self,
            repository_id: Uuid,
            size: i64,
            updated_at: OffsetDateTime,
        ) -> MetadataResult<()> {
            let result = sqlx::query(
                "UPDATE repositories SET uploaded = 1, checksummed = 1, size = ?, updated_at = ? WHERE repository_id = ?",
            )
            .bind(size)
            .bind(updated_at)
            .bind(repository_id)
            .execute(&self.pool)
            .await?;

            if result.rows_affected() == 0 {
                return Err(MetadataError::NotFound(format!(
                    "repository_id {} not found",
                    repository_id
                )));
            }
            Ok(())
        }

        async fn list_repositories(&self, namespace: &str) -> MetadataResult<Vec<RepositoryRow>> {
            let rows = sqlx::query_as::<_, RepositoryRow>(
                "SELECT * FROM repositories WHERE namespace = ? ORDER BY name",
            )
            .bind(namespace)
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        }
    }

    #[async_trait]
    impl TagRepo for SqliteStore {
        async fn upsert_tag(&self, tag: &TagRow) -> MetadataResult<()> {
            sqlx::query(
                r#"
                INSERT INTO tags (
                    tag_id, repository_id, name, image_id, agent, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT (repository_id, name) DO UPDATE SET
                    image_id = excluded.image_id,
                    agent = excluded.agent,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(tag.tag_id)
            .bind(tag.repository_id)
            .bind(&tag.name)
            .bind(&tag.image_id)
            .bind(&tag.agent)
            .bind(tag.created_at)
            .bind(tag.updated_at)
            .execute(&self.pool)
            .await?;
            Ok(())
        }

        async fn get_tag(&self, repository_id: Uuid, name: &str) -> MetadataResult<Option<TagRow>> {
            let row = sqlx::query_as::<_, TagRow>(
                "SELECT * FROM tags WHERE repository_id = ? AND name = ?",
            )
            .bind(repository_id)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
            Ok(row)
        }

        async fn list_tags(&self, repository_id: Uuid) -> MetadataResult<Vec<TagRow>> {
            // rowid survives ON CONFLICT DO UPDATE, so this is first-insert order.
            let rows = sqlx::query_as::<_, TagRow>(
                "SELECT * FROM tags WHERE repository_id = ? ORDER BY rowid",
            )
            .bind(repository_id)
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        }
    }

    #[async_trait]
    impl ImageRepo for SqliteStore {
        async fn upsert_image(&self, image: &ImageRow) -> MetadataResult<()> {
            sqlx::query(
                r#"
                INSERT INTO images (
                    image_id, ancestry_json, size, uploaded, checksummed, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT (image_id) DO UPDATE SET
                    ancestry_json = excluded.ancestry_json,
                    size = excluded.size,
                    uploaded = excluded.uploaded,
                    checksummed = excluded.checksummed,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(&image.image_id)
            .bind(&image.ancestry_json)
            .bind(image.size)
            .bind(image.uploaded)
            .bind(image.checksummed)
            .bind(image.created_at)
            .bind(image.updated_at)
            .execute(&self.pool)
            .await?;
            Ok(())
        }

        async fn get_image(&self, image_id: &str) -> MetadataResult<Option<ImageRow>> {
            let row = sqlx::query_as::<_, ImageRow>("SELECT * FROM images WHERE image_id = ?")
                .bind(image_id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }
    }

    #[async_trait]
    impl UserRepo for SqliteStore {
        async fn create_user(&self, user: &UserRow) -> MetadataResult<()> {
            if self.get_user_by_name(&user.username).await?.is_some() {
                return Err(MetadataError::AlreadyExists(format!(
                    "username '{}' already exists",
                    user.username
                )));
            }

            sqlx::query(
                "INSERT INTO users (user_id, username, password_hash, active, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(user.user_id)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(user.active)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await?;
            Ok(())
        }

        async fn get_user(&self, user_id: Uuid) -> MetadataResult<Option<UserRow>> {
            let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn get_user_by_name(&self, username: &str) -> MetadataResult<Option<UserRow>> {
            let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE username = ?")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn update_user_credentials(
            &self,
            user_id: Uuid,
            password_hash: &str,
            active: bool,
            updated_at: OffsetDateTime,
        ) -> MetadataResult<()> {
            let result = sqlx::query(
                "UPDATE users SET password_hash = ?, active = ?, updated_at = ? WHERE user_id = ?",
            )
            .bind(password_hash)
            .bind(active)
            .bind(updated_at)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

            if result.rows_affected() == 0 {
                return Err(MetadataError::NotFound(format!(
                    "user_id {} not found",
                    user_id
                )));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl TokenRepo for SqliteStore {
        async fn issue_repository_token(&self, token: &RepositoryTokenRow) -> MetadataResult<u64> {
            let mut tx = self.pool.begin().await?;

            let revoked = sqlx::query(
                r#"
                UPDATE repository_tokens SET revoked_at = ?
                WHERE user_id = ? AND namespace = ? AND repository = ? AND revoked_at IS NULL
                "#,
            )
            .bind(token.created_at)
            .bind(token.user_id)
            .bind(&token.namespace)
            .bind(&token.repository)
            .execute(&mut *tx)
            .await?
            .rows_affected();

            sqlx::query(
                r#"
                INSERT INTO repository_tokens (
                    token_id, signature_hash, user_id, namespace, repository,
                    access, created_at, revoked_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(token.token_id)
            .bind(&token.signature_hash)
            .bind(token.user_id)
            .bind(&token.namespace)
            .bind(&token.repository)
            .bind(&token.access)
            .bind(token.created_at)
            .bind(token.revoked_at)
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
            Ok(revoked)
        }

        async fn get_token_by_signature_hash(
            &self,
            signature_hash: &str,
        ) -> MetadataResult<Option<RepositoryTokenRow>> {
            let row = sqlx::query_as::<_, RepositoryTokenRow>(
                "SELECT * FROM repository_tokens WHERE signature_hash = ?",
            )
            .bind(signature_hash)
            .fetch_optional(&self.pool)
            .await?;
            Ok(row)
        }

        async fn revoke_token(
            &self,
            token_id: Uuid,
            revoked_at: OffsetDateTime,
        ) -> MetadataResult<()> {
            sqlx::query("UPDATE repository_tokens SET revoked_at = ? WHERE token_id = ?")
                .bind(revoked_at)
                .bind(token_id)
                .execute(&self.pool)
                .await?;
            Ok(())
        }

        async fn list_active_tokens(
            &self,
            user_id: Uuid,
        ) -> MetadataResult<Vec<RepositoryTokenRow>> {
            let rows = sqlx::query_as::<_, RepositoryTokenRow>(
                "SELECT * FROM repository_tokens WHERE user_id = ? AND revoked_at IS NULL ORDER BY created_at DESC",
            )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        }
    }
}

const SCHEMA_SQL: &str = r#"
-- Accounts
CREATE TABLE IF NOT EXISTS users (
    user_id BLOB PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Repository-scoped access tokens issued at registration
CREATE TABLE IF NOT EXISTS repository_tokens (
    token_id BLOB PRIMARY KEY,
    signature_hash TEXT NOT NULL UNIQUE,
    user_id BLOB NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    namespace TEXT NOT NULL,
    repository TEXT NOT NULL,
    access TEXT NOT NULL,
    created_at TEXT NOT NULL,
    revoked_at TEXT
);
CREATE INDEX IF NOT EXISTS idx_repository_tokens_scope
    ON repository_tokens(user_id, namespace, repository, revoked_at);

-- Repositories
CREATE TABLE IF NOT EXISTS repositories (
    repository_id BLOB PRIMARY KEY,
    namespace TEXT NOT NULL,
    name TEXT NOT NULL,
    manifest_json TEXT NOT NULL,
    uploaded INTEGER NOT NULL DEFAULT 0,
    checksummed INTEGER NOT NULL DEFAULT 0,
    size INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE (namespace, name)
);

-- Tags
CREATE TABLE IF NOT EXISTS tags (
    tag_id BLOB PRIMARY KEY,
    repository_id BLOB NOT NULL REFERENCES repositories(repository_id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    image_id TEXT NOT NULL,
    agent TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE (repository_id, name)
);

-- Images (populated by the artifact endpoints)
CREATE TABLE IF NOT EXISTS images (
    image_id TEXT PRIMARY KEY,
    ancestry_json TEXT NOT NULL DEFAULT '[]',
    size INTEGER NOT NULL DEFAULT 0,
    uploaded INTEGER NOT NULL DEFAULT 0,
    checksummed INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;
