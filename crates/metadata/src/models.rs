//! Database models mapping to the metadata schema.

use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

// =============================================================================
// Accounts and tokens
// =============================================================================

/// Registry account.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub user_id: Uuid,
    pub username: String,
    /// SHA-256 hex of the password.
    pub password_hash: String,
    pub active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Access token issued at registration, scoped to one repository.
#[derive(Debug, Clone, FromRow)]
pub struct RepositoryTokenRow {
    pub token_id: Uuid,
    /// SHA-256 hex of the token signature; the signature itself is never stored.
    pub signature_hash: String,
    pub user_id: Uuid,
    pub namespace: String,
    pub repository: String,
    pub access: String, // "read", "write", "delete"
    pub created_at: OffsetDateTime,
    pub revoked_at: Option<OffsetDateTime>,
}

// =============================================================================
// Repositories and tags
// =============================================================================

/// Repository record.
#[derive(Debug, Clone, FromRow)]
pub struct RepositoryRow {
    pub repository_id: Uuid,
    pub namespace: String,
    pub name: String,
    /// Registered manifest, normalized to `[{"id": ...}]` in build order.
    pub manifest_json: String,
    // Rollup fields, committed together by the completion gate.
    pub uploaded: bool,
    pub checksummed: bool,
    pub size: i64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Tag record.
#[derive(Debug, Clone, FromRow)]
pub struct TagRow {
    pub tag_id: Uuid,
    pub repository_id: Uuid,
    pub name: String,
    pub image_id: String,
    /// User-Agent of the client that last wrote the tag.
    pub agent: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

// =============================================================================
// Images
// =============================================================================

/// Per-image record maintained by the artifact endpoints.
#[derive(Debug, Clone, FromRow)]
pub struct ImageRow {
    pub image_id: String,
    /// JSON array of ancestor image ids, nearest first.
    pub ancestry_json: String,
    pub size: i64,
    pub uploaded: bool,
    pub checksummed: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
