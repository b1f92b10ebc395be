//! Repository-scoped access tokens.

use crate::error::MetadataResult;
use crate::models::RepositoryTokenRow;
use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

/// Repository for token operations.
#[async_trait]
pub trait TokenRepo: Send + Sync {
    /// Store a newly issued token and revoke the same user's earlier tokens
    /// for the same `(namespace, repository)`, in one transaction.
    ///
    /// Returns the number of tokens revoked.
    async fn issue_repository_token(&self, token: &RepositoryTokenRow) -> MetadataResult<u64>;

    /// Get a token by signature hash (revoked tokens included).
    async fn get_token_by_signature_hash(
        &self,
        signature_hash: &str,
    ) -> MetadataResult<Option<RepositoryTokenRow>>;

    /// Revoke a token.
    async fn revoke_token(&self, token_id: Uuid, revoked_at: OffsetDateTime) -> MetadataResult<()>;

    /// List a user's unrevoked tokens, newest first.
    async fn list_active_tokens(&self, user_id: Uuid) -> MetadataResult<Vec<RepositoryTokenRow>>;
}
