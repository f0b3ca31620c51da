//! Database repository for user-profile records.

use anyhow::Result;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{CreateProfile, UserProfile};

/// Repository for profile database operations.
pub struct ProfileRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> ProfileRepository<'a> {
    /// Creates a new ProfileRepository instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a new profile in the database.
    ///
    /// # Arguments
    /// * `profile` - CreateProfile DTO containing profile details
    ///
    /// # Returns
    /// The newly created UserProfile with all fields populated
    pub async fn create(&self, profile: CreateProfile) -> Result<UserProfile> {
        let id = Uuid::now_v7().to_string();

        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            INSERT INTO user_profiles
                (id, user_id, first_name, last_name, gender, date_of_birth, info, avatar)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING
                id, user_id, first_name, last_name, gender, date_of_birth, info, avatar,
                created_at, updated_at
            "#,
        )
        .bind(&id)
        .bind(&profile.user_id)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(profile.gender)
        .bind(profile.date_of_birth)
        .bind(&profile.info)
        .bind(&profile.avatar)
        .fetch_one(self.pool)
        .await?;

        Ok(profile)
    }

    /// Retrieves the profile for a user, if any.
    pub async fn get_by_user_id(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT id, user_id, first_name, last_name, gender, date_of_birth, info, avatar,
                   created_at, updated_at
            FROM user_profiles WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(profile)
    }
}
