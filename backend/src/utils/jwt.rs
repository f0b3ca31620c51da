//! JWT token utilities for authentication and authorization.
//!
//! Provides creation and validation of the two bearer-token kinds: short-lived
//! access tokens and longer-lived refresh tokens. Each kind is signed with its
//! own secret so the lifetimes and blast radius stay independent.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::{ServiceError, ServiceResult};

/// Which kind of bearer token a set of claims belongs to.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims carried by both token kinds.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject user ID
    pub sub: String,
    /// Token expiration timestamp
    pub exp: usize,
    /// Token issued at timestamp
    pub iat: usize,
    /// Token kind, checked on decode so one kind cannot stand in for the other
    pub token_type: TokenType,
}

impl Claims {
    pub fn user_id(&self) -> &str {
        &self.sub
    }
}

/// Codec for creating and validating signed bearer tokens.
///
/// Pure: keys and lifetimes derive only from the injected [`Config`]; no
/// ambient state is consulted after construction.
pub struct JwtCodec {
    access_encoding_key: EncodingKey,
    access_decoding_key: DecodingKey,
    refresh_encoding_key: EncodingKey,
    refresh_decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtCodec {
    pub fn new(config: &Config) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        JwtCodec {
            access_encoding_key: EncodingKey::from_secret(config.jwt_access_secret.as_bytes()),
            access_decoding_key: DecodingKey::from_secret(config.jwt_access_secret.as_bytes()),
            refresh_encoding_key: EncodingKey::from_secret(config.jwt_refresh_secret.as_bytes()),
            refresh_decoding_key: DecodingKey::from_secret(config.jwt_refresh_secret.as_bytes()),
            validation,
            access_ttl: Duration::minutes(config.access_token_expires_minutes),
            refresh_ttl: Duration::days(config.refresh_token_expires_days),
        }
    }

    /// Generates a short-lived access token for the given user.
    pub fn create_access_token(&self, user_id: &str) -> ServiceResult<String> {
        self.create_token(user_id, TokenType::Access, self.access_ttl)
    }

    /// Generates a long-lived refresh token for the given user.
    pub fn create_refresh_token(&self, user_id: &str) -> ServiceResult<String> {
        self.create_token(user_id, TokenType::Refresh, self.refresh_ttl)
    }

    /// Validates and decodes an access token.
    pub fn decode_access_token(&self, token: &str) -> ServiceResult<Claims> {
        self.decode_token(token, &self.access_decoding_key, TokenType::Access)
    }

    /// Validates and decodes a refresh token.
    pub fn decode_refresh_token(&self, token: &str) -> ServiceResult<Claims> {
        self.decode_token(token, &self.refresh_decoding_key, TokenType::Refresh)
    }

    fn create_token(
        &self,
        user_id: &str,
        token_type: TokenType,
        ttl: Duration,
    ) -> ServiceResult<String> {
        let now = Utc::now();
        let exp = now + ttl;

        let claims = Claims {
            sub: user_id.to_string(),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
            token_type,
        };

        let key = match token_type {
            TokenType::Access => &self.access_encoding_key,
            TokenType::Refresh => &self.refresh_encoding_key,
        };

        encode(&Header::default(), &claims, key)
            .map_err(|e| ServiceError::internal(format!("Token generation failed: {}", e)))
    }

    fn decode_token(
        &self,
        token: &str,
        key: &DecodingKey,
        expected: TokenType,
    ) -> ServiceResult<Claims> {
        let claims = decode::<Claims>(token, key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => ServiceError::TokenExpired,
                _ => ServiceError::InvalidToken,
            })?;

        if claims.token_type != expected {
            return Err(ServiceError::InvalidToken);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> JwtCodec {
        JwtCodec::new(&Config::for_tests())
    }

    #[test]
    fn access_token_round_trips_subject() {
        let codec = codec();
        let token = codec.create_access_token("user-42").unwrap();
        let claims = codec.decode_access_token(&token).unwrap();

        assert_eq!(claims.user_id(), "user-42");
        assert_eq!(claims.token_type, TokenType::Access);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn refresh_token_round_trips_subject() {
        let codec = codec();
        let token = codec.create_refresh_token("user-42").unwrap();
        let claims = codec.decode_refresh_token(&token).unwrap();

        assert_eq!(claims.user_id(), "user-42");
        assert_eq!(claims.token_type, TokenType::Refresh);
    }

    #[test]
    fn access_token_is_rejected_by_refresh_decoder() {
        let codec = codec();
        let token = codec.create_access_token("user-42").unwrap();

        assert!(matches!(
            codec.decode_refresh_token(&token),
            Err(ServiceError::InvalidToken)
        ));
    }

    #[test]
    fn expired_token_fails_with_token_expired() {
        let codec = codec();

        let now = Utc::now();
        let claims = Claims {
            sub: "user-42".to_string(),
            exp: (now - Duration::hours(1)).timestamp() as usize,
            iat: (now - Duration::hours(2)).timestamp() as usize,
            token_type: TokenType::Access,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("test-access-secret".as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            codec.decode_access_token(&token),
            Err(ServiceError::TokenExpired)
        ));
    }

    #[test]
    fn tampered_token_fails_with_invalid_token() {
        let codec = codec();
        let token = codec.create_access_token("user-42").unwrap();
        let tampered = format!("{}x", token);

        assert!(matches!(
            codec.decode_access_token(&tampered),
            Err(ServiceError::InvalidToken)
        ));
    }
}
