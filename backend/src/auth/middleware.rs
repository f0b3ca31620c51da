//! Middleware for protecting authenticated routes.
//!
//! Maps an inbound request's bearer credential to a verified, active account
//! before any business logic runs. Each rejection carries a distinguishing
//! message so clients can tell a missing header from a malformed one, and an
//! expired token from an invalid signature.

use crate::api::common::ApiResponse;
use crate::config::Config;
use crate::errors::ServiceError;
use crate::repositories::user_repository::UserRepository;
use crate::utils::jwt::JwtCodec;
use axum::{
    extract::{Extension, Request},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use sqlx::SqlitePool;

/// Bearer-credential authentication middleware.
///
/// On success the resolved `User` and the decoded claims are inserted into
/// request extensions for downstream handlers. Read-only otherwise.
pub async fn jwt_auth(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok());

    let token = extract_bearer_token(auth_header).map_err(unauthorized)?;

    let codec = JwtCodec::new(&config);
    let claims = codec.decode_access_token(token).map_err(|e| match e {
        ServiceError::TokenExpired => unauthorized("Token has expired"),
        _ => unauthorized("Invalid token"),
    })?;

    let user_repo = UserRepository::new(&pool);
    let user = user_repo
        .get_user_by_id(claims.user_id())
        .await
        .map_err(|e| {
            tracing::error!("User lookup failed during authentication: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        })?
        .ok_or_else(|| unauthorized("Invalid token"))?;

    if !user.is_active {
        return Err(unauthorized("User account is inactive"));
    }

    request.extensions_mut().insert(claims);
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Parses an `Authorization` header value into the bare bearer token.
///
/// The header must be exactly `Bearer <token>`.
fn extract_bearer_token(header: Option<&str>) -> Result<&str, &'static str> {
    let header = header.ok_or("Authorization header is missing")?;

    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err("Invalid Authorization header format. Expected 'Bearer <token>'"),
    }
}

fn unauthorized(message: impl Into<String>) -> (StatusCode, String) {
    let error_response = ApiResponse::<()>::error(message, "unauthenticated", None);
    (
        StatusCode::UNAUTHORIZED,
        serde_json::to_string(&error_response).unwrap(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_header_is_rejected() {
        assert_eq!(
            extract_bearer_token(None),
            Err("Authorization header is missing")
        );
    }

    #[test]
    fn non_bearer_schemes_are_rejected() {
        assert!(extract_bearer_token(Some("Basic dXNlcjpwdw==")).is_err());
        assert!(extract_bearer_token(Some("bearer abc")).is_err());
    }

    #[test]
    fn missing_or_extra_parts_are_rejected() {
        assert!(extract_bearer_token(Some("Bearer")).is_err());
        assert!(extract_bearer_token(Some("Bearer abc def")).is_err());
    }

    #[test]
    fn well_formed_header_yields_the_token() {
        assert_eq!(extract_bearer_token(Some("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
    }
}
