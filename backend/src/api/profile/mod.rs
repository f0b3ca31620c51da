//! Module for profile management API endpoints.
//!
//! This module handles functionalities related to user profiles, such as
//! creating a profile with an avatar upload.

pub mod handlers;
pub mod routes;
