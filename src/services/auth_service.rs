//! Authentication service - Login and token handling.
//!
//! Credential checks are delegated to the credential service; this service
//! only issues and verifies JWTs.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::CredentialService;
use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::UserCredentials;
use crate::errors::AppResult;

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub username: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Login and return JWT token
    async fn login(&self, username: &str, password: &str) -> AppResult<TokenResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Generate JWT token for a user
fn generate_token(user: &UserCredentials, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id.clone(),
        username: user.username.clone(),
        role: user.role.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    credentials: Arc<dyn CredentialService>,
    config: Config,
}

impl Authenticator {
    pub fn new(credentials: Arc<dyn CredentialService>, config: Config) -> Self {
        Self {
            credentials,
            config,
        }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn login(&self, username: &str, password: &str) -> AppResult<TokenResponse> {
        let user = self.credentials.authenticate(username, password).await?;
        tracing::info!(user_id = %user.id, "User logged in");
        generate_token(&user, &self.config)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Password, UserRole};
    use crate::errors::AppError;

    struct FixedCredentials;

    #[async_trait]
    impl CredentialService for FixedCredentials {
        async fn change_own_password(
            &self,
            _: &str,
            _: &str,
            _: &str,
            _: Option<&str>,
        ) -> AppResult<()> {
            unimplemented!()
        }

        async fn change_other_user_password(
            &self,
            _: &str,
            _: &str,
            _: &str,
            _: &str,
        ) -> AppResult<()> {
            unimplemented!()
        }

        async fn authenticate(&self, username: &str, password: &str) -> AppResult<UserCredentials> {
            if username == "alice" && password == "p1" {
                Ok(UserCredentials {
                    id: "u1".into(),
                    username: "alice".into(),
                    role: UserRole::Teacher,
                    password: Password::from_hash("hash".into()),
                })
            } else {
                Err(AppError::InvalidCredentials)
            }
        }
    }

    fn authenticator() -> Authenticator {
        Authenticator::new(Arc::new(FixedCredentials), Config::default())
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_token() {
        let auth = authenticator();

        let token = auth.login("alice", "p1").await.unwrap();
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 24 * 3600);

        let claims = auth.verify_token(&token.access_token).unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, "TEACHER");
    }

    #[tokio::test]
    async fn test_login_failure_propagates() {
        let err = authenticator().login("alice", "nope").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let err = authenticator().verify_token("not-a-jwt").unwrap_err();
        assert!(matches!(err, AppError::Jwt(_)));
    }
}
