//! Handler functions for account lifecycle API endpoints.
//!
//! These functions process incoming HTTP requests for registration,
//! activation, password reset, login, and token refresh, parse request data,
//! and interact with the `auth::service` for core business logic.

use crate::api::common::service_error_to_http;
use crate::auth::models::*;
use crate::auth::service::AccountService;
use crate::config::Config;
use crate::database::models::User;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

/// Handle account registration
#[axum::debug_handler]
pub async fn register(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Json(payload): Json<RegistrationRequest>,
) -> Result<(StatusCode, ResponseJson<UserResponse>), (StatusCode, String)> {
    let service = AccountService::new(&pool, &config);

    match service.register(payload).await {
        Ok(user) => Ok((StatusCode::CREATED, ResponseJson(user.into()))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle account activation
#[axum::debug_handler]
pub async fn activate(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Json(payload): Json<ActivationRequest>,
) -> Result<ResponseJson<MessageResponse>, (StatusCode, String)> {
    let service = AccountService::new(&pool, &config);

    match service.activate(payload).await {
        Ok(()) => Ok(ResponseJson(MessageResponse::new(
            "User account activated successfully.",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle a password-reset link request.
///
/// The response is byte-identical whether or not the email belongs to a
/// registered, active account.
#[axum::debug_handler]
pub async fn request_password_reset(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Json(payload): Json<PasswordResetRequest>,
) -> Result<ResponseJson<MessageResponse>, (StatusCode, String)> {
    let service = AccountService::new(&pool, &config);

    match service.request_password_reset(payload).await {
        Ok(()) => Ok(ResponseJson(MessageResponse::new(
            "If you are registered, you will receive an email with instructions.",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle password-reset completion
#[axum::debug_handler]
pub async fn complete_password_reset(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Json(payload): Json<PasswordResetCompleteRequest>,
) -> Result<ResponseJson<MessageResponse>, (StatusCode, String)> {
    let service = AccountService::new(&pool, &config);

    match service.complete_password_reset(payload).await {
        Ok(()) => Ok(ResponseJson(MessageResponse::new(
            "Password reset successfully.",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle user login request
#[axum::debug_handler]
pub async fn login(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<(StatusCode, ResponseJson<LoginResponse>), (StatusCode, String)> {
    let service = AccountService::new(&pool, &config);

    match service.login(payload).await {
        Ok(response) => Ok((StatusCode::CREATED, ResponseJson(response))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle token refresh request
#[axum::debug_handler]
pub async fn refresh_token(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Json(payload): Json<TokenRefreshRequest>,
) -> Result<ResponseJson<TokenRefreshResponse>, (StatusCode, String)> {
    let service = AccountService::new(&pool, &config);

    match service.refresh_access_token(payload).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle logout request, revoking the presented refresh token
#[axum::debug_handler]
pub async fn logout(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Json(payload): Json<LogoutRequest>,
) -> Result<ResponseJson<MessageResponse>, (StatusCode, String)> {
    let service = AccountService::new(&pool, &config);

    match service.logout(payload).await {
        Ok(()) => Ok(ResponseJson(MessageResponse::new("Logged out successfully."))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Get the authenticated account's summary
#[axum::debug_handler]
pub async fn me(
    Extension(user): Extension<User>,
) -> Result<ResponseJson<UserResponse>, (StatusCode, String)> {
    Ok(ResponseJson(user.into()))
}
