//! Handler functions for profile-related API endpoints.
//!
//! Profiles arrive as multipart form data (text fields plus the avatar
//! blob); the handler parses and types the fields, then delegates to
//! `ProfileService` for authorization and persistence.

use crate::api::common::{ApiResponse, service_error_to_http};
use crate::config::Config;
use crate::database::models::{Gender, User};
use crate::services::profile_service::{CreateProfileData, ProfileResponse, ProfileService};
use axum::{
    extract::{Extension, Multipart, Path},
    http::StatusCode,
    response::Json as ResponseJson,
};
use chrono::NaiveDate;
use sqlx::SqlitePool;
use std::str::FromStr;

/// Handle profile creation for a user
#[axum::debug_handler]
pub async fn create_profile(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Extension(current_user): Extension<User>,
    Path(user_id): Path<String>,
    multipart: Multipart,
) -> Result<(StatusCode, ResponseJson<ProfileResponse>), (StatusCode, String)> {
    let data = parse_profile_form(multipart).await?;

    let service = ProfileService::new(&pool, &config);
    match service.create_profile(&current_user, &user_id, data).await {
        Ok(profile) => Ok((StatusCode::CREATED, ResponseJson(profile))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Parses the multipart form into typed profile data.
async fn parse_profile_form(
    mut multipart: Multipart,
) -> Result<CreateProfileData, (StatusCode, String)> {
    let mut first_name = None;
    let mut last_name = None;
    let mut gender = None;
    let mut date_of_birth = None;
    let mut info = None;
    let mut avatar = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Malformed multipart form: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "first_name" => first_name = Some(read_text(field, &name).await?),
            "last_name" => last_name = Some(read_text(field, &name).await?),
            "gender" => {
                let value = read_text(field, &name).await?;
                let parsed = Gender::from_str(&value).map_err(bad_request)?;
                gender = Some(parsed);
            }
            "date_of_birth" => {
                let value = read_text(field, &name).await?;
                let parsed = NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                    .map_err(|_| bad_request(format!("Invalid date of birth: {}", value)))?;
                date_of_birth = Some(parsed);
            }
            "info" => info = Some(read_text(field, &name).await?),
            "avatar" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| bad_request(format!("Failed to read avatar: {}", e)))?;
                avatar = Some(bytes.to_vec());
            }
            _ => {}
        }
    }

    Ok(CreateProfileData {
        first_name: first_name.ok_or_else(|| missing_field("first_name"))?,
        last_name: last_name.ok_or_else(|| missing_field("last_name"))?,
        gender: gender.ok_or_else(|| missing_field("gender"))?,
        date_of_birth: date_of_birth.ok_or_else(|| missing_field("date_of_birth"))?,
        info: info.ok_or_else(|| missing_field("info"))?,
        avatar: avatar.ok_or_else(|| missing_field("avatar"))?,
    })
}

async fn read_text(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<String, (StatusCode, String)> {
    field
        .text()
        .await
        .map_err(|e| bad_request(format!("Failed to read field '{}': {}", name, e)))
}

fn missing_field(name: &str) -> (StatusCode, String) {
    bad_request(format!("Missing required field: {}", name))
}

fn bad_request(message: impl Into<String>) -> (StatusCode, String) {
    let error_response = ApiResponse::<()>::error(message, "validation_error", None);
    (
        StatusCode::BAD_REQUEST,
        serde_json::to_string(&error_response).unwrap(),
    )
}
