//! Defines the HTTP routes for profile management.

use crate::api::profile::handlers::create_profile;
use crate::auth::middleware::jwt_auth;
use axum::{Router, middleware, routing::post};

/// Creates the profile router with all profile-related routes
pub fn profile_router() -> Router {
    Router::new().route(
        "/users/{user_id}/profile/",
        post(create_profile).layer(middleware::from_fn(jwt_auth)),
    )
}
