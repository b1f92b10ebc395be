//! Account seeding from configuration.

use anyhow::{Context, Result, bail};
use dockyard_core::config::UserConfig;
use dockyard_core::hash::normalize_sha256_hex;
use dockyard_metadata::MetadataStore;
use dockyard_metadata::models::UserRow;
use std::collections::HashSet;
use time::OffsetDateTime;
use uuid::Uuid;

/// Ensure every configured account exists with the configured password hash
/// and active flag.
///
/// Accounts missing from the store are created; existing ones are updated in
/// place so their ids (and the tokens issued to them) survive restarts.
/// Accounts not named in configuration are left untouched.
pub async fn ensure_users(metadata: &dyn MetadataStore, users: &[UserConfig]) -> Result<()> {
    let mut seen = HashSet::new();

    for user in users {
        // Usernames double as namespaces, so they follow the namespace charset.
        if user.username.is_empty() || !user.username.chars().all(|c| c.is_ascii_alphanumeric()) {
            bail!(
                "invalid username '{}': expected ASCII letters and digits",
                user.username
            );
        }
        if !seen.insert(user.username.as_str()) {
            bail!("duplicate username '{}' in configuration", user.username);
        }

        let hash = normalize_sha256_hex(&user.password_hash)
            .with_context(|| format!("invalid password_hash for user '{}'", user.username))?;
        let now = OffsetDateTime::now_utc();

        match metadata.get_user_by_name(&user.username).await? {
            Some(existing) => {
                if existing.password_hash == hash && existing.active == user.active {
                    tracing::debug!(username = %user.username, "User already up to date");
                    continue;
                }
                metadata
                    .update_user_credentials(existing.user_id, &hash, user.active, now)
                    .await?;
                tracing::info!(
                    username = %user.username,
                    active = user.active,
                    "User credentials updated"
                );
            }
            None => {
                let row = UserRow {
                    user_id: Uuid::new_v4(),
                    username: user.username.clone(),
                    password_hash: hash,
                    active: user.active,
                    created_at: now,
                    updated_at: now,
                };
                metadata.create_user(&row).await?;
                tracing::info!(
                    username = %row.username,
                    user_id = %row.user_id,
                    "User created"
                );
            }
        }
    }

    Ok(())
}
