//! Core business logic for the account lifecycle.
//!
//! Registration, activation, password reset, login, and token refresh. Each
//! multi-write operation runs in a single transaction; email notifications
//! are dispatched after commit and can never fail the request.

use crate::auth::models::*;
use crate::config::Config;
use crate::database::models::{User, UserGroupName};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::activation_token_repository::ActivationTokenRepository;
use crate::repositories::password_reset_token_repository::PasswordResetTokenRepository;
use crate::repositories::refresh_token_repository::RefreshTokenRepository;
use crate::repositories::user_group_repository::UserGroupRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::email_service::{EmailSender, EmailService};
use crate::utils::generate_random_string::generate_random_string;
use crate::utils::jwt::JwtCodec;
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use std::future::Future;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Length of opaque activation and password-reset tokens.
const CREDENTIAL_TOKEN_LENGTH: usize = 32;

/// Valid bcrypt hash verified when the email is unknown, so the unknown-email
/// and wrong-password paths do the same amount of work.
const DUMMY_PASSWORD_HASH: &str = "$2a$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW";

/// Account lifecycle service: registration, activation, credentials, tokens.
pub struct AccountService<'a> {
    pool: &'a SqlitePool,
    jwt_codec: JwtCodec,
    email_sender: Option<Arc<dyn EmailSender>>,
    config: Config,
}

impl<'a> AccountService<'a> {
    /// Create a new AccountService instance
    pub fn new(pool: &'a SqlitePool, config: &Config) -> Self {
        let email_sender = match config.email_config() {
            Some(email_config) => match EmailService::new(email_config) {
                Ok(service) => Some(Arc::new(service) as Arc<dyn EmailSender>),
                Err(e) => {
                    tracing::warn!(
                        "Failed to initialize email service: {}. Account emails will be disabled.",
                        e
                    );
                    None
                }
            },
            None => None,
        };

        AccountService {
            pool,
            jwt_codec: JwtCodec::new(config),
            email_sender,
            config: config.clone(),
        }
    }

    /// Registers a new account (inactive until activated).
    ///
    /// The account and its activation token are created in one transaction.
    /// The activation email is dispatched after commit, fire-and-forget.
    pub async fn register(&self, request: RegistrationRequest) -> ServiceResult<User> {
        Self::validate_request(&request)?;

        let user_repo = UserRepository::new(self.pool);
        if user_repo.email_exists(&request.email).await? {
            return Err(ServiceError::already_exists("User", &request.email));
        }

        // The default group is bootstrap data; its absence is a deployment
        // problem, never user input.
        let group_repo = UserGroupRepository::new(self.pool);
        let group = group_repo
            .get_group_by_name(UserGroupName::User)
            .await?
            .ok_or_else(|| ServiceError::internal("Default user group not found"))?;

        let password_hash = Self::hash_password(&request.password)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| ServiceError::Database { source: e.into() })?;

        let user_id = Uuid::now_v7().to_string();
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, group_id, email, password_hash, is_active)
            VALUES (?, ?, ?, ?, 0)
            RETURNING id, group_id, email, password_hash, is_active, created_at, updated_at
            "#,
        )
        .bind(&user_id)
        .bind(&group.id)
        .bind(&request.email)
        .bind(&password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            // Losers of a concurrent-registration race land here.
            let error_msg = e.to_string();
            if error_msg.contains("UNIQUE constraint failed") {
                ServiceError::already_exists("User", &request.email)
            } else {
                ServiceError::Database { source: e.into() }
            }
        })?;

        let token = generate_random_string(CREDENTIAL_TOKEN_LENGTH);
        let expires_at = Utc::now() + Duration::hours(self.config.activation_token_expires_hours);

        sqlx::query(
            "INSERT INTO activation_tokens (id, user_id, token, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(Uuid::now_v7().to_string())
        .bind(&user.id)
        .bind(&token)
        .bind(expires_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| ServiceError::Database { source: e.into() })?;

        tx.commit()
            .await
            .map_err(|e| ServiceError::Database { source: e.into() })?;

        let activation_link = format!(
            "{}/activate?token={}&email={}",
            self.config.frontend_url, token, user.email
        );
        self.dispatch_email(user.email.clone(), move |sender, email| async move {
            sender.send_activation_email(&email, &activation_link).await
        });

        Ok(user)
    }

    /// Activates an account with a single-use token.
    ///
    /// An expired token is deleted when touched, so retrying yields the same
    /// error without leaving a consumable record behind.
    pub async fn activate(&self, request: ActivationRequest) -> ServiceResult<()> {
        Self::validate_request(&request)?;

        let activation_repo = ActivationTokenRepository::new(self.pool);
        let record = activation_repo
            .get_by_email_and_token(&request.email, &request.token)
            .await?
            .ok_or_else(|| {
                ServiceError::invalid_or_expired("Invalid or expired activation token.")
            })?;

        if record.expires_at < Utc::now() {
            activation_repo.delete_by_id(&record.id).await?;
            return Err(ServiceError::invalid_or_expired(
                "Invalid or expired activation token.",
            ));
        }

        let user_repo = UserRepository::new(self.pool);
        let user = user_repo
            .get_user_by_id(&record.user_id)
            .await?
            .ok_or_else(|| ServiceError::internal("Activation token references a missing user"))?;

        if user.is_active {
            return Err(ServiceError::invalid_operation(
                "User account is already active.",
            ));
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| ServiceError::Database { source: e.into() })?;

        sqlx::query("UPDATE users SET is_active = 1, updated_at = CURRENT_TIMESTAMP WHERE id = ?")
            .bind(&user.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| ServiceError::Database { source: e.into() })?;

        sqlx::query("DELETE FROM activation_tokens WHERE id = ?")
            .bind(&record.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| ServiceError::Database { source: e.into() })?;

        tx.commit()
            .await
            .map_err(|e| ServiceError::Database { source: e.into() })?;

        Ok(())
    }

    /// Issues a password-reset token and emails a reset link.
    ///
    /// Returns `Ok(())` whether or not the email belongs to an active
    /// account; the caller must answer with the same generic message in both
    /// cases so account existence cannot be probed.
    pub async fn request_password_reset(
        &self,
        request: PasswordResetRequest,
    ) -> ServiceResult<()> {
        Self::validate_request(&request)?;

        let user_repo = UserRepository::new(self.pool);
        let user = match user_repo.get_user_by_email(&request.email).await? {
            Some(user) if user.is_active => user,
            _ => return Ok(()),
        };

        let token = generate_random_string(CREDENTIAL_TOKEN_LENGTH);
        let expires_at =
            Utc::now() + Duration::hours(self.config.password_reset_token_expires_hours);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| ServiceError::Database { source: e.into() })?;

        // Delete-before-insert keeps at most one live reset token per user.
        sqlx::query("DELETE FROM password_reset_tokens WHERE user_id = ?")
            .bind(&user.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| ServiceError::Database { source: e.into() })?;

        sqlx::query(
            "INSERT INTO password_reset_tokens (id, user_id, token, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(Uuid::now_v7().to_string())
        .bind(&user.id)
        .bind(&token)
        .bind(expires_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| ServiceError::Database { source: e.into() })?;

        tx.commit()
            .await
            .map_err(|e| ServiceError::Database { source: e.into() })?;

        let reset_link = format!(
            "{}/reset-password?token={}&email={}",
            self.config.frontend_url, token, user.email
        );
        self.dispatch_email(user.email.clone(), move |sender, email| async move {
            sender.send_password_reset_email(&email, &reset_link).await
        });

        Ok(())
    }

    /// Completes a password reset with a single-use token.
    ///
    /// Every failure path reports the same error; a found-but-wrong or
    /// found-but-expired token is deleted so it cannot be retried.
    pub async fn complete_password_reset(
        &self,
        request: PasswordResetCompleteRequest,
    ) -> ServiceResult<()> {
        Self::validate_request(&request)?;

        let user_repo = UserRepository::new(self.pool);
        let user = match user_repo.get_user_by_email(&request.email).await? {
            Some(user) if user.is_active => user,
            _ => return Err(ServiceError::invalid_or_expired("Invalid email or token.")),
        };

        let reset_repo = PasswordResetTokenRepository::new(self.pool);
        let record = reset_repo
            .get_by_user_id(&user.id)
            .await?
            .ok_or_else(|| ServiceError::invalid_or_expired("Invalid email or token."))?;

        if record.token != request.token || record.expires_at < Utc::now() {
            reset_repo.delete_by_id(&record.id).await?;
            return Err(ServiceError::invalid_or_expired("Invalid email or token."));
        }

        let password_hash = Self::hash_password(&request.password)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| ServiceError::Database { source: e.into() })?;

        sqlx::query(
            "UPDATE users SET password_hash = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        )
        .bind(&password_hash)
        .bind(&user.id)
        .execute(&mut *tx)
        .await
        .map_err(|e| ServiceError::Database { source: e.into() })?;

        sqlx::query("DELETE FROM password_reset_tokens WHERE id = ?")
            .bind(&record.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| ServiceError::Database { source: e.into() })?;

        tx.commit()
            .await
            .map_err(|e| ServiceError::Database { source: e.into() })?;

        self.dispatch_email(user.email.clone(), move |sender, email| async move {
            sender.send_password_reset_success_email(&email).await
        });

        Ok(())
    }

    /// Authenticates credentials and issues both bearer tokens.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<LoginResponse> {
        Self::validate_request(&request)?;

        let user_repo = UserRepository::new(self.pool);
        let user = match user_repo.get_user_by_email(&request.email).await? {
            Some(user) => user,
            None => {
                // Keep the unknown-email path doing the same work as a
                // password mismatch.
                let _ = verify(&request.password, DUMMY_PASSWORD_HASH);
                return Err(ServiceError::InvalidCredentials);
            }
        };

        let password_matches = verify(&request.password, &user.password_hash)
            .map_err(|e| ServiceError::internal(format!("Password verification failed: {}", e)))?;

        if !password_matches {
            return Err(ServiceError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(ServiceError::AccountNotActive);
        }

        let refresh_token = self.jwt_codec.create_refresh_token(&user.id)?;
        let expires_at = Utc::now() + Duration::days(self.config.refresh_token_expires_days);

        let refresh_repo = RefreshTokenRepository::new(self.pool);

        // Housekeeping only: live records accumulate per device and are never
        // pruned here.
        refresh_repo.delete_expired(Utc::now()).await?;

        refresh_repo
            .create(&user.id, &refresh_token, expires_at)
            .await?;

        let access_token = self.jwt_codec.create_access_token(&user.id)?;

        Ok(LoginResponse {
            access_token,
            refresh_token,
            token_type: "bearer".to_string(),
            expires_in: (self.config.access_token_expires_minutes * 60) as u64,
        })
    }

    /// Exchanges a refresh token for a new access token.
    ///
    /// The signed token alone is not enough: its server-side record must
    /// still exist, so deleting the record revokes the token. The refresh
    /// token is not rotated.
    pub async fn refresh_access_token(
        &self,
        request: TokenRefreshRequest,
    ) -> ServiceResult<TokenRefreshResponse> {
        Self::validate_request(&request)?;

        let claims = self.jwt_codec.decode_refresh_token(&request.refresh_token)?;

        let refresh_repo = RefreshTokenRepository::new(self.pool);
        if refresh_repo
            .get_by_token(&request.refresh_token)
            .await?
            .is_none()
        {
            return Err(ServiceError::unauthenticated("Refresh token not found."));
        }

        let user_repo = UserRepository::new(self.pool);
        let user = user_repo
            .get_user_by_id(claims.user_id())
            .await?
            .ok_or_else(|| ServiceError::not_found("User", claims.user_id()))?;

        let access_token = self.jwt_codec.create_access_token(&user.id)?;

        Ok(TokenRefreshResponse { access_token })
    }

    /// Revokes one refresh token by deleting its server-side record.
    pub async fn logout(&self, request: LogoutRequest) -> ServiceResult<()> {
        Self::validate_request(&request)?;

        let refresh_repo = RefreshTokenRepository::new(self.pool);
        if !refresh_repo.delete_by_token(&request.refresh_token).await? {
            return Err(ServiceError::unauthenticated("Refresh token not found."));
        }

        Ok(())
    }

    /// Hands an email task to the background executor. Delivery failures are
    /// logged and never affect the already-committed operation.
    fn dispatch_email<F, Fut>(&self, email: String, task: F)
    where
        F: FnOnce(Arc<dyn EmailSender>, String) -> Fut + Send + 'static,
        Fut: Future<Output = ServiceResult<()>> + Send + 'static,
    {
        let Some(sender) = self.email_sender.clone() else {
            tracing::warn!("Email service not configured. Email not sent to {}", email);
            return;
        };

        tokio::spawn(async move {
            if let Err(e) = task(sender, email.clone()).await {
                tracing::error!("Failed to send email to {}: {}", email, e);
            }
        });
    }

    fn hash_password(password: &str) -> ServiceResult<String> {
        hash(password, DEFAULT_COST)
            .map_err(|e| ServiceError::internal(format!("Password hashing failed: {}", e)))
    }

    fn validate_request<T: Validate>(request: &T) -> ServiceResult<()> {
        if let Err(validation_errors) = request.validate() {
            let error_messages: Vec<String> = validation_errors
                .field_errors()
                .into_iter()
                .flat_map(|(field, errors)| {
                    errors.iter().map(move |error| {
                        format!(
                            "{}: {}",
                            field,
                            error.message.as_ref().unwrap_or(&"Invalid value".into())
                        )
                    })
                })
                .collect();

            return Err(ServiceError::validation(error_messages.join(", ")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!().run(&pool).await.unwrap();
        pool
    }

    fn registration(email: &str) -> RegistrationRequest {
        RegistrationRequest {
            email: email.to_string(),
            password: "password123".to_string(),
        }
    }

    async fn activation_token_for(pool: &SqlitePool, user_id: &str) -> String {
        ActivationTokenRepository::new(pool)
            .get_by_user_id(user_id)
            .await
            .unwrap()
            .unwrap()
            .token
    }

    async fn register_and_activate(service: &AccountService<'_>, pool: &SqlitePool) -> User {
        let user = service.register(registration("a@x.com")).await.unwrap();
        let token = activation_token_for(pool, &user.id).await;
        service
            .activate(ActivationRequest {
                email: user.email.clone(),
                token,
            })
            .await
            .unwrap();
        user
    }

    #[tokio::test]
    async fn register_creates_inactive_user_with_one_activation_token() {
        let pool = setup_pool().await;
        let config = Config::for_tests();
        let service = AccountService::new(&pool, &config);

        let user = service.register(registration("a@x.com")).await.unwrap();
        assert!(!user.is_active);

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM activation_tokens WHERE user_id = ?",
        )
        .bind(&user.id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn duplicate_registration_yields_conflict() {
        let pool = setup_pool().await;
        let config = Config::for_tests();
        let service = AccountService::new(&pool, &config);

        service.register(registration("a@x.com")).await.unwrap();
        let result = service.register(registration("a@x.com")).await;

        assert!(matches!(result, Err(ServiceError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn activation_marks_user_active_and_consumes_token() {
        let pool = setup_pool().await;
        let config = Config::for_tests();
        let service = AccountService::new(&pool, &config);

        let user = register_and_activate(&service, &pool).await;

        let reloaded = UserRepository::new(&pool)
            .get_user_by_id(&user.id)
            .await
            .unwrap()
            .unwrap();
        assert!(reloaded.is_active);

        let remaining = ActivationTokenRepository::new(&pool)
            .get_by_user_id(&user.id)
            .await
            .unwrap();
        assert!(remaining.is_none());
    }

    #[tokio::test]
    async fn expired_activation_fails_and_removes_the_record() {
        let pool = setup_pool().await;
        let config = Config::for_tests();
        let service = AccountService::new(&pool, &config);

        let user = service.register(registration("a@x.com")).await.unwrap();
        let token = activation_token_for(&pool, &user.id).await;

        sqlx::query("UPDATE activation_tokens SET expires_at = ? WHERE user_id = ?")
            .bind(Utc::now() - Duration::days(2))
            .bind(&user.id)
            .execute(&pool)
            .await
            .unwrap();

        let request = ActivationRequest {
            email: user.email.clone(),
            token: token.clone(),
        };
        let first = service
            .activate(ActivationRequest {
                email: request.email.clone(),
                token: request.token.clone(),
            })
            .await;
        assert!(matches!(first, Err(ServiceError::InvalidOrExpired { .. })));

        let remaining = ActivationTokenRepository::new(&pool)
            .get_by_user_id(&user.id)
            .await
            .unwrap();
        assert!(remaining.is_none());

        // Retrying yields the same error, not a different one.
        let second = service.activate(request).await;
        assert!(matches!(second, Err(ServiceError::InvalidOrExpired { .. })));
    }

    #[tokio::test]
    async fn activating_an_already_active_account_fails() {
        let pool = setup_pool().await;
        let config = Config::for_tests();
        let service = AccountService::new(&pool, &config);

        let user = register_and_activate(&service, &pool).await;

        sqlx::query(
            "INSERT INTO activation_tokens (id, user_id, token, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(Uuid::now_v7().to_string())
        .bind(&user.id)
        .bind("fresh-token-for-active-user")
        .bind(Utc::now() + Duration::hours(24))
        .execute(&pool)
        .await
        .unwrap();

        let result = service
            .activate(ActivationRequest {
                email: user.email.clone(),
                token: "fresh-token-for-active-user".to_string(),
            })
            .await;

        assert!(matches!(result, Err(ServiceError::InvalidOperation { .. })));
    }

    #[tokio::test]
    async fn reset_request_succeeds_for_unknown_and_active_emails_alike() {
        let pool = setup_pool().await;
        let config = Config::for_tests();
        let service = AccountService::new(&pool, &config);

        let user = register_and_activate(&service, &pool).await;

        let known = service
            .request_password_reset(PasswordResetRequest {
                email: user.email.clone(),
            })
            .await;
        let unknown = service
            .request_password_reset(PasswordResetRequest {
                email: "nobody@x.com".to_string(),
            })
            .await;

        assert!(known.is_ok());
        assert!(unknown.is_ok());

        let record = PasswordResetTokenRepository::new(&pool)
            .get_by_user_id(&user.id)
            .await
            .unwrap();
        assert!(record.is_some());
    }

    #[tokio::test]
    async fn reissuing_a_reset_token_replaces_the_previous_one() {
        let pool = setup_pool().await;
        let config = Config::for_tests();
        let service = AccountService::new(&pool, &config);

        let user = register_and_activate(&service, &pool).await;
        let request = || PasswordResetRequest {
            email: user.email.clone(),
        };

        service.request_password_reset(request()).await.unwrap();
        let first = PasswordResetTokenRepository::new(&pool)
            .get_by_user_id(&user.id)
            .await
            .unwrap()
            .unwrap();

        service.request_password_reset(request()).await.unwrap();
        let second = PasswordResetTokenRepository::new(&pool)
            .get_by_user_id(&user.id)
            .await
            .unwrap()
            .unwrap();

        assert_ne!(first.token, second.token);

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM password_reset_tokens WHERE user_id = ?",
        )
        .bind(&user.id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn reset_complete_mismatch_and_expiry_fail_identically() {
        let pool = setup_pool().await;
        let config = Config::for_tests();
        let service = AccountService::new(&pool, &config);

        let user = register_and_activate(&service, &pool).await;

        service
            .request_password_reset(PasswordResetRequest {
                email: user.email.clone(),
            })
            .await
            .unwrap();

        let mismatch = service
            .complete_password_reset(PasswordResetCompleteRequest {
                email: user.email.clone(),
                token: "not-the-right-token".to_string(),
                password: "newpassword1".to_string(),
            })
            .await
            .unwrap_err();

        // The mismatched attempt consumed the record.
        assert!(
            PasswordResetTokenRepository::new(&pool)
                .get_by_user_id(&user.id)
                .await
                .unwrap()
                .is_none()
        );

        service
            .request_password_reset(PasswordResetRequest {
                email: user.email.clone(),
            })
            .await
            .unwrap();
        let record = PasswordResetTokenRepository::new(&pool)
            .get_by_user_id(&user.id)
            .await
            .unwrap()
            .unwrap();
        sqlx::query("UPDATE password_reset_tokens SET expires_at = ? WHERE id = ?")
            .bind(Utc::now() - Duration::hours(2))
            .bind(&record.id)
            .execute(&pool)
            .await
            .unwrap();

        let expired = service
            .complete_password_reset(PasswordResetCompleteRequest {
                email: user.email.clone(),
                token: record.token,
                password: "newpassword1".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(mismatch.to_string(), expired.to_string());
    }

    #[tokio::test]
    async fn reset_complete_changes_the_password() {
        let pool = setup_pool().await;
        let config = Config::for_tests();
        let service = AccountService::new(&pool, &config);

        let user = register_and_activate(&service, &pool).await;

        service
            .request_password_reset(PasswordResetRequest {
                email: user.email.clone(),
            })
            .await
            .unwrap();
        let record = PasswordResetTokenRepository::new(&pool)
            .get_by_user_id(&user.id)
            .await
            .unwrap()
            .unwrap();

        service
            .complete_password_reset(PasswordResetCompleteRequest {
                email: user.email.clone(),
                token: record.token,
                password: "brand-new-password".to_string(),
            })
            .await
            .unwrap();

        let old_login = service
            .login(LoginRequest {
                email: user.email.clone(),
                password: "password123".to_string(),
            })
            .await;
        assert!(matches!(old_login, Err(ServiceError::InvalidCredentials)));

        let new_login = service
            .login(LoginRequest {
                email: user.email.clone(),
                password: "brand-new-password".to_string(),
            })
            .await;
        assert!(new_login.is_ok());
    }

    #[tokio::test]
    async fn login_unknown_email_and_wrong_password_fail_the_same_way() {
        let pool = setup_pool().await;
        let config = Config::for_tests();
        let service = AccountService::new(&pool, &config);

        let user = register_and_activate(&service, &pool).await;

        let wrong_password = service
            .login(LoginRequest {
                email: user.email.clone(),
                password: "wrong-password".to_string(),
            })
            .await
            .unwrap_err();
        let unknown_email = service
            .login(LoginRequest {
                email: "nobody@x.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, ServiceError::InvalidCredentials));
        assert!(matches!(unknown_email, ServiceError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn login_fails_for_inactive_accounts() {
        let pool = setup_pool().await;
        let config = Config::for_tests();
        let service = AccountService::new(&pool, &config);

        let user = service.register(registration("a@x.com")).await.unwrap();

        let result = service
            .login(LoginRequest {
                email: user.email.clone(),
                password: "password123".to_string(),
            })
            .await;

        assert!(matches!(result, Err(ServiceError::AccountNotActive)));
    }

    #[tokio::test]
    async fn refresh_flow_end_to_end() {
        let pool = setup_pool().await;
        let config = Config::for_tests();
        let service = AccountService::new(&pool, &config);

        let user = register_and_activate(&service, &pool).await;

        let login = service
            .login(LoginRequest {
                email: user.email.clone(),
                password: "password123".to_string(),
            })
            .await
            .unwrap();

        let codec = JwtCodec::new(&config);
        let claims = codec.decode_access_token(&login.access_token).unwrap();
        assert_eq!(claims.user_id(), user.id);

        let refreshed = service
            .refresh_access_token(TokenRefreshRequest {
                refresh_token: login.refresh_token.clone(),
            })
            .await
            .unwrap();
        let refreshed_claims = codec.decode_access_token(&refreshed.access_token).unwrap();
        assert_eq!(refreshed_claims.user_id(), user.id);

        // Deleting the record revokes the structurally valid signed token.
        RefreshTokenRepository::new(&pool)
            .delete_by_token(&login.refresh_token)
            .await
            .unwrap();

        let revoked = service
            .refresh_access_token(TokenRefreshRequest {
                refresh_token: login.refresh_token,
            })
            .await;
        assert!(matches!(
            revoked,
            Err(ServiceError::Unauthenticated { .. })
        ));
    }

    #[tokio::test]
    async fn malformed_refresh_token_is_rejected_by_the_codec() {
        let pool = setup_pool().await;
        let config = Config::for_tests();
        let service = AccountService::new(&pool, &config);

        let result = service
            .refresh_access_token(TokenRefreshRequest {
                refresh_token: "not-a-jwt".to_string(),
            })
            .await;

        assert!(matches!(result, Err(ServiceError::InvalidToken)));
    }

    #[tokio::test]
    async fn logout_revokes_the_refresh_token() {
        let pool = setup_pool().await;
        let config = Config::for_tests();
        let service = AccountService::new(&pool, &config);

        let user = register_and_activate(&service, &pool).await;
        let login = service
            .login(LoginRequest {
                email: user.email.clone(),
                password: "password123".to_string(),
            })
            .await
            .unwrap();

        service
            .logout(LogoutRequest {
                refresh_token: login.refresh_token.clone(),
            })
            .await
            .unwrap();

        let again = service
            .logout(LogoutRequest {
                refresh_token: login.refresh_token,
            })
            .await;
        assert!(matches!(again, Err(ServiceError::Unauthenticated { .. })));
    }
}
