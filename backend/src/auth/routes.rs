//! Defines the HTTP routes for the account lifecycle.
//!
//! These routes handle registration, activation, password reset, login, and
//! token refreshing. They are designed to be integrated into the main Axum
//! router.

use crate::auth::handlers::*;
use crate::auth::middleware::jwt_auth;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Creates the account router with all lifecycle routes
pub fn accounts_router() -> Router {
    Router::new()
        .route("/register/", post(register))
        .route("/activate/", post(activate))
        .route("/password-reset/request/", post(request_password_reset))
        .route("/reset-password/complete/", post(complete_password_reset))
        .route("/login/", post(login))
        .route("/refresh/", post(refresh_token))
        .route("/logout/", post(logout))
        .route("/me/", get(me).layer(middleware::from_fn(jwt_auth)))
}
