//! Database repositories, one per persisted entity.

pub mod activation_token_repository;
pub mod password_reset_token_repository;
pub mod profile_repository;
pub mod refresh_token_repository;
pub mod user_group_repository;
pub mod user_repository;
