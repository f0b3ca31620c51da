//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the database URL, server port, signing secrets, and token lifetimes. The
//! resulting `Config` is constructed once at startup and passed into service
//! constructors; business logic never reads the environment directly.

use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub server_port: u16,
    /// Secret used to sign and verify access tokens.
    pub jwt_access_secret: String,
    /// Secret used to sign and verify refresh tokens. Kept separate so a
    /// leaked access secret does not compromise long-lived credentials.
    pub jwt_refresh_secret: String,
    pub access_token_expires_minutes: i64,
    pub refresh_token_expires_days: i64,
    pub activation_token_expires_hours: i64,
    pub password_reset_token_expires_hours: i64,
    /// Base URL used to build activation and password-reset links.
    pub frontend_url: String,
    email: Option<EmailConfig>,
    storage: Option<StorageConfig>,
}

/// SMTP settings for outbound account emails.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_name: String,
    pub from_email: String,
}

/// HTTP object-store settings for avatar uploads.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL not set")?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS must be a valid number")?;

        let acquire_timeout_seconds = env::var("DB_ACQUIRE_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<u64>()
            .context("DB_ACQUIRE_TIMEOUT_SECONDS must be a valid number")?;

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("SERVER_PORT must be a valid number")?;

        let jwt_access_secret =
            env::var("JWT_SECRET_KEY_ACCESS").context("JWT_SECRET_KEY_ACCESS not set")?;

        let jwt_refresh_secret =
            env::var("JWT_SECRET_KEY_REFRESH").context("JWT_SECRET_KEY_REFRESH not set")?;

        let access_token_expires_minutes = env::var("ACCESS_TOKEN_EXPIRES_MINUTES")
            .unwrap_or_else(|_| "15".to_string())
            .parse::<i64>()
            .context("ACCESS_TOKEN_EXPIRES_MINUTES must be a valid number")?;

        let refresh_token_expires_days = env::var("REFRESH_TOKEN_EXPIRES_DAYS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<i64>()
            .context("REFRESH_TOKEN_EXPIRES_DAYS must be a valid number")?;

        let activation_token_expires_hours = env::var("ACTIVATION_TOKEN_EXPIRES_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse::<i64>()
            .context("ACTIVATION_TOKEN_EXPIRES_HOURS must be a valid number")?;

        let password_reset_token_expires_hours = env::var("PASSWORD_RESET_TOKEN_EXPIRES_HOURS")
            .unwrap_or_else(|_| "1".to_string())
            .parse::<i64>()
            .context("PASSWORD_RESET_TOKEN_EXPIRES_HOURS must be a valid number")?;

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());

        Ok(Config {
            database_url,
            max_connections,
            acquire_timeout_seconds,
            server_port,
            jwt_access_secret,
            jwt_refresh_secret,
            access_token_expires_minutes,
            refresh_token_expires_days,
            activation_token_expires_hours,
            password_reset_token_expires_hours,
            frontend_url,
            email: Self::email_from_env(),
            storage: Self::storage_from_env(),
        })
    }

    /// Returns the SMTP configuration if all required variables are present.
    pub fn email_config(&self) -> Option<EmailConfig> {
        self.email.clone()
    }

    /// Returns the object-store configuration if configured.
    pub fn storage_config(&self) -> Option<StorageConfig> {
        self.storage.clone()
    }

    fn email_from_env() -> Option<EmailConfig> {
        let smtp_host = env::var("SMTP_HOST").ok()?;
        let smtp_username = env::var("SMTP_USERNAME").ok()?;
        let smtp_password = env::var("SMTP_PASSWORD").ok()?;

        let smtp_port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse::<u16>()
            .ok()?;

        let from_email = env::var("EMAIL_FROM").unwrap_or_else(|_| smtp_username.clone());
        let from_name = env::var("EMAIL_FROM_NAME").unwrap_or_else(|_| "Cinema".to_string());

        Some(EmailConfig {
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            from_name,
            from_email,
        })
    }

    fn storage_from_env() -> Option<StorageConfig> {
        let endpoint = env::var("STORAGE_ENDPOINT").ok()?;
        let bucket = env::var("STORAGE_BUCKET").unwrap_or_else(|_| "avatars".to_string());

        Some(StorageConfig { endpoint, bucket })
    }

    /// Builds a config for tests without touching the environment. Email and
    /// storage stay unconfigured so no outbound traffic is attempted.
    #[cfg(test)]
    pub fn for_tests() -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout_seconds: 3,
            server_port: 0,
            jwt_access_secret: "test-access-secret".to_string(),
            jwt_refresh_secret: "test-refresh-secret".to_string(),
            access_token_expires_minutes: 15,
            refresh_token_expires_days: 30,
            activation_token_expires_hours: 24,
            password_reset_token_expires_hours: 1,
            frontend_url: "http://localhost:5173".to_string(),
            email: None,
            storage: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_and_storage_absent_in_test_config() {
        let config = Config::for_tests();
        assert!(config.email_config().is_none());
        assert!(config.storage_config().is_none());
    }
}
