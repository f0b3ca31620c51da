//! Database repository for refresh-token records.
//!
//! A signed refresh token is only honored while its record exists; deleting
//! the record revokes the token. Multiple records per user may coexist
//! (multi-device) and accumulate until they expire or are revoked.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::RefreshToken;

/// Repository for refresh-token database operations.
pub struct RefreshTokenRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> RefreshTokenRepository<'a> {
    /// Creates a new RefreshTokenRepository instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Persists a newly issued refresh token.
    ///
    /// # Returns
    /// The newly created RefreshToken with all fields populated
    pub async fn create(
        &self,
        user_id: &str,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshToken> {
        let id = Uuid::now_v7().to_string();

        let record = sqlx::query_as::<_, RefreshToken>(
            r#"
            INSERT INTO refresh_tokens (id, user_id, token, expires_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, user_id, token, expires_at, created_at
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(token)
        .bind(expires_at)
        .fetch_one(self.pool)
        .await?;

        Ok(record)
    }

    /// Looks up a refresh token record by the exact token string.
    pub async fn get_by_token(&self, token: &str) -> Result<Option<RefreshToken>> {
        let record = sqlx::query_as::<_, RefreshToken>(
            r#"
            SELECT id, user_id, token, expires_at, created_at
            FROM refresh_tokens WHERE token = ?
            "#,
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(record)
    }

    /// Deletes a refresh token record by its token string, revoking it.
    ///
    /// # Returns
    /// `true` if a record was deleted
    pub async fn delete_by_token(&self, token: &str) -> Result<bool> {
        let rows_affected = sqlx::query("DELETE FROM refresh_tokens WHERE token = ?")
            .bind(token)
            .execute(self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }

    /// Housekeeping: removes records whose expiry has passed.
    ///
    /// # Returns
    /// The number of records removed
    pub async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let rows_affected = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < ?")
            .bind(now)
            .execute(self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}
