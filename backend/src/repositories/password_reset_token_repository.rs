//! Database repository for password-reset-token records.
//!
//! At most one reset token is live per account: issuing a new one deletes all
//! prior records for that account before inserting.

use anyhow::Result;
use sqlx::SqlitePool;

use crate::database::models::PasswordResetToken;

/// Repository for password-reset-token database operations.
pub struct PasswordResetTokenRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> PasswordResetTokenRepository<'a> {
    /// Creates a new PasswordResetTokenRepository instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Retrieves the reset token for a user, if any.
    pub async fn get_by_user_id(&self, user_id: &str) -> Result<Option<PasswordResetToken>> {
        let record = sqlx::query_as::<_, PasswordResetToken>(
            r#"
            SELECT id, user_id, token, expires_at, created_at
            FROM password_reset_tokens WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(record)
    }

    /// Deletes a reset token record.
    pub async fn delete_by_id(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM password_reset_tokens WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
