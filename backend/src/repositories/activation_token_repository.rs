//! Database repository for activation-token records.
//!
//! An activation token is single-use: it is deleted on successful activation
//! and also on any failed consumption that found a record, so an expired or
//! mismatched token cannot be retried.

use anyhow::Result;
use sqlx::SqlitePool;

use crate::database::models::ActivationToken;

/// Repository for activation-token database operations.
pub struct ActivationTokenRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> ActivationTokenRepository<'a> {
    /// Creates a new ActivationTokenRepository instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Looks up an activation token by the owning account's email and the
    /// token string. A mismatched token finds nothing.
    pub async fn get_by_email_and_token(
        &self,
        email: &str,
        token: &str,
    ) -> Result<Option<ActivationToken>> {
        let record = sqlx::query_as::<_, ActivationToken>(
            r#"
            SELECT t.id, t.user_id, t.token, t.expires_at, t.created_at
            FROM activation_tokens t
            JOIN users u ON t.user_id = u.id
            WHERE u.email = ? AND t.token = ?
            "#,
        )
        .bind(email)
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(record)
    }

    /// Retrieves the activation token for a user, if any.
    pub async fn get_by_user_id(&self, user_id: &str) -> Result<Option<ActivationToken>> {
        let record = sqlx::query_as::<_, ActivationToken>(
            r#"
            SELECT id, user_id, token, expires_at, created_at
            FROM activation_tokens WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(record)
    }

    /// Deletes an activation token record.
    pub async fn delete_by_id(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM activation_tokens WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
