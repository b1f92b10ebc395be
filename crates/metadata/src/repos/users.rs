//! Account records.

use crate::error::MetadataResult;
use crate::models::UserRow;
use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

/// Repository for account operations.
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Create an account. Fails with `AlreadyExists` if the username is taken.
    async fn create_user(&self, user: &UserRow) -> MetadataResult<()>;

    /// Get an account by id.
    async fn get_user(&self, user_id: Uuid) -> MetadataResult<Option<UserRow>>;

    /// Get an account by username.
    async fn get_user_by_name(&self, username: &str) -> MetadataResult<Option<UserRow>>;

    /// Replace the password hash and active flag of an account.
    async fn update_user_credentials(
        &self,
        user_id: Uuid,
        password_hash: &str,
        active: bool,
        updated_at: OffsetDateTime,
    ) -> MetadataResult<()>;
}
