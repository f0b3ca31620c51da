//! Database repository for user-group lookups.
//!
//! Groups are bootstrap data seeded by migration; this repository is
//! read-only.

use anyhow::Result;
use sqlx::SqlitePool;

use crate::database::models::{UserGroup, UserGroupName};

/// Repository for user-group database operations.
pub struct UserGroupRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> UserGroupRepository<'a> {
    /// Creates a new UserGroupRepository instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Retrieves a group by its enumerated name.
    ///
    /// # Returns
    /// `Some(UserGroup)` if found, `None` otherwise
    pub async fn get_group_by_name(&self, name: UserGroupName) -> Result<Option<UserGroup>> {
        let group = sqlx::query_as::<_, UserGroup>(
            "SELECT id, name, created_at FROM user_groups WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(group)
    }

    /// Retrieves a group by its unique identifier.
    ///
    /// # Returns
    /// `Some(UserGroup)` if found, `None` otherwise
    pub async fn get_group_by_id(&self, id: &str) -> Result<Option<UserGroup>> {
        let group = sqlx::query_as::<_, UserGroup>(
            "SELECT id, name, created_at FROM user_groups WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(group)
    }
}
