//! Module for core business logic services.
//!
//! This module encapsulates services that perform specific business operations
//! and orchestrate interactions between different parts of the application,
//! such as sending account emails or storing avatar blobs.

pub mod email_service;
pub mod profile_service;
pub mod storage_service;
