//! Authentication module for managing accounts, credentials, and access control.
//!
//! This module provides the public interface for the account lifecycle:
//! registration, activation, password reset, login, token refresh, and the
//! authorization middleware protecting the rest of the API.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
