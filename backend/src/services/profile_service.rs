//! Profile business logic service.
//!
//! Handles profile creation for registered accounts, including the avatar
//! upload to object storage.

use crate::config::Config;
use crate::database::models::{CreateProfile, Gender, User, UserGroupName};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::profile_repository::ProfileRepository;
use crate::repositories::user_group_repository::UserGroupRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::storage_service::{HttpObjectStorage, ObjectStorage};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use std::sync::Arc;
use validator::Validate;

/// Validated profile fields plus the raw avatar bytes from the multipart
/// form.
#[derive(Debug)]
pub struct CreateProfileData {
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub info: String,
    pub avatar: Vec<u8>,
}

/// Profile representation returned to clients; `avatar` is a resolved URL,
/// not the storage key.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: String,
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub info: String,
    pub avatar: String,
}

pub struct ProfileService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
    /// Object store for avatar blobs
    storage: Option<Arc<dyn ObjectStorage>>,
}

impl<'a> ProfileService<'a> {
    /// Creates a new ProfileService instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    /// * `config` - Application configuration
    pub fn new(pool: &'a SqlitePool, config: &Config) -> Self {
        let storage = match config.storage_config() {
            Some(storage_config) => match HttpObjectStorage::new(storage_config) {
                Ok(client) => Some(Arc::new(client) as Arc<dyn ObjectStorage>),
                Err(e) => {
                    tracing::warn!("Failed to initialize object storage: {}", e);
                    None
                }
            },
            None => None,
        };

        Self { pool, storage }
    }

    /// Creates a profile for `user_id` on behalf of `requester`.
    ///
    /// Only the account owner or an admin may create the profile; the target
    /// account must exist and be active, and may hold at most one profile.
    pub async fn create_profile(
        &self,
        requester: &User,
        user_id: &str,
        data: CreateProfileData,
    ) -> ServiceResult<ProfileResponse> {
        let user_repo = UserRepository::new(self.pool);
        let target = user_repo.get_user_by_id(user_id).await?;

        let target = match target {
            Some(user) if user.is_active => user,
            _ => {
                return Err(ServiceError::unauthenticated(
                    "User not found or not active.",
                ));
            }
        };

        if requester.id != target.id && !self.is_admin(requester).await? {
            return Err(ServiceError::permission_denied(
                "You don't have permission to edit this profile.",
            ));
        }

        let profile_repo = ProfileRepository::new(self.pool);
        if profile_repo.get_by_user_id(&target.id).await?.is_some() {
            return Err(ServiceError::invalid_operation("User already has a profile."));
        }

        Self::validate_birth_date(data.date_of_birth)?;

        if data.avatar.is_empty() {
            return Err(ServiceError::validation("Avatar file is required"));
        }

        let avatar_key = format!("avatars/{}_avatar.jpg", target.id);

        let create = CreateProfile {
            user_id: target.id.clone(),
            first_name: data.first_name,
            last_name: data.last_name,
            gender: data.gender,
            date_of_birth: data.date_of_birth,
            info: data.info,
            avatar: avatar_key.clone(),
        };

        if let Err(validation_errors) = create.validate() {
            let error_messages: Vec<String> = validation_errors
                .field_errors()
                .into_iter()
                .flat_map(|(field, errors)| {
                    errors.iter().map(move |error| {
                        format!(
                            "{}: {}",
                            field,
                            error.message.as_ref().unwrap_or(&"Invalid value".into())
                        )
                    })
                })
                .collect();

            return Err(ServiceError::validation(error_messages.join(", ")));
        }

        let storage = self.storage.as_ref().ok_or_else(|| {
            ServiceError::external_service("Failed to upload avatar. Please try again later.")
        })?;

        storage
            .upload_file(&avatar_key, data.avatar)
            .await
            .map_err(|e| {
                tracing::error!("Avatar upload failed for user {}: {}", target.id, e);
                ServiceError::external_service("Failed to upload avatar. Please try again later.")
            })?;

        let avatar_url = storage.get_file_url(&avatar_key).await?;

        let profile = profile_repo.create(create).await?;

        Ok(ProfileResponse {
            id: profile.id,
            user_id: profile.user_id,
            first_name: profile.first_name,
            last_name: profile.last_name,
            gender: profile.gender,
            date_of_birth: profile.date_of_birth,
            info: profile.info,
            avatar: avatar_url,
        })
    }

    async fn is_admin(&self, user: &User) -> ServiceResult<bool> {
        let group_repo = UserGroupRepository::new(self.pool);
        let group = group_repo
            .get_group_by_id(&user.group_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User group", &user.group_id))?;

        Ok(group.name == UserGroupName::Admin)
    }

    fn validate_birth_date(date_of_birth: NaiveDate) -> ServiceResult<()> {
        let today = Utc::now().date_naive();

        if date_of_birth >= today {
            return Err(ServiceError::validation(
                "Date of birth must be in the past",
            ));
        }

        let mut age = today.year() - date_of_birth.year();
        if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
            age -= 1;
        }

        if age < 18 {
            return Err(ServiceError::validation(
                "You must be at least 18 years old",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn birth_date_must_be_in_the_past() {
        let tomorrow = Utc::now().date_naive() + chrono::Duration::days(1);
        assert!(ProfileService::validate_birth_date(tomorrow).is_err());
    }

    #[test]
    fn minors_are_rejected() {
        let ten_years_old = Utc::now().date_naive() - chrono::Duration::days(10 * 365);
        assert!(ProfileService::validate_birth_date(ten_years_old).is_err());
    }

    #[test]
    fn adults_are_accepted() {
        let thirty_years_old = Utc::now().date_naive() - chrono::Duration::days(30 * 365 + 10);
        assert!(ProfileService::validate_birth_date(thirty_years_old).is_ok());
    }
}
