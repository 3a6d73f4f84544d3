//! Authentication service for registration, login and token issuance.

use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;

use persistence::entities::UserEntity;
use persistence::repositories::{PersonalListRepository, UserRepository};
use shared::jwt::{JwtError, JwtKeys};
use shared::password::{hash_password, verify_password, PasswordError};
use shared::validation::normalize_email;

use crate::config::JwtAuthConfig;
use crate::error::ApiError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailAlreadyExists => {
                ApiError::Conflict("Email already registered".into())
            }
            AuthError::InvalidCredentials => ApiError::Unauthorized("Invalid credentials".into()),
            AuthError::UserNotFound => ApiError::NotFound("User not found".into()),
            AuthError::DatabaseError(e) => e.into(),
            AuthError::TokenError(e) => ApiError::Internal(format!("Token error: {}", e)),
            AuthError::PasswordError(e) => ApiError::Internal(format!("Password error: {}", e)),
            AuthError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

/// Result of a successful registration or login.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub user: UserEntity,
    pub token: String,
}

/// Authentication service.
#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
    jwt: Arc<JwtKeys>,
}

impl AuthService {
    /// Creates a new AuthService.
    pub fn new(pool: PgPool, jwt: Arc<JwtKeys>) -> Self {
        Self { pool, jwt }
    }

    /// Builds JWT key material from configuration. PEM keys coming from
    /// environment variables may carry literal `\n` sequences.
    pub fn create_jwt_keys(config: &JwtAuthConfig) -> Result<JwtKeys, AuthError> {
        let private_key = normalize_pem_key(&config.private_key);
        let public_key = normalize_pem_key(&config.public_key);

        JwtKeys::with_leeway(
            &private_key,
            &public_key,
            config.token_expiry_secs,
            config.leeway_secs,
        )
        .map_err(|e| AuthError::Internal(format!("Failed to initialize JWT keys: {}", e)))
    }

    /// Registers a new user. The email is lowercased before the uniqueness
    /// check and an empty personal list is created alongside the account.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResult, AuthError> {
        let email = normalize_email(email);

        let user_repo = UserRepository::new(self.pool.clone());
        if user_repo.email_exists(&email).await? {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = hash_password(password)?;
        let user = user_repo
            .create(username.trim(), &email, &password_hash)
            .await?;

        let list_repo = PersonalListRepository::new(self.pool.clone());
        list_repo.create_empty(user.id).await?;

        let token = self.jwt.generate_token(user.id, &user.email)?;
        Ok(AuthResult { user, token })
    }

    /// Authenticates a user. Unknown email and wrong password produce the
    /// same error so the response does not leak which one failed.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResult, AuthError> {
        let email = normalize_email(email);

        let user_repo = UserRepository::new(self.pool.clone());
        let user = user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let valid = verify_password(password, &user.password_hash)?;
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.jwt.generate_token(user.id, &user.email)?;
        Ok(AuthResult { user, token })
    }

    /// Resolves the current user by id, for session lookups.
    pub async fn current_user(&self, user_id: uuid::Uuid) -> Result<UserEntity, AuthError> {
        let user_repo = UserRepository::new(self.pool.clone());
        user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

/// Normalize a PEM key by converting literal `\n` sequences to newlines
/// and stripping surrounding quotes some env parsers leave behind.
fn normalize_pem_key(key: &str) -> String {
    let key = key.trim_matches('"').trim_matches('\'');
    key.replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_pem_key_literal_newlines() {
        let raw = "-----BEGIN KEY-----\\nabc\\n-----END KEY-----";
        let normalized = normalize_pem_key(raw);
        assert_eq!(normalized.matches('\n').count(), 2);
        assert!(!normalized.contains("\\n"));
    }

    #[test]
    fn test_normalize_pem_key_strips_quotes() {
        let raw = "\"-----BEGIN KEY-----\"";
        assert_eq!(normalize_pem_key(raw), "-----BEGIN KEY-----");
    }

    #[test]
    fn test_normalize_pem_key_passthrough() {
        let raw = "-----BEGIN KEY-----\nabc\n-----END KEY-----";
        assert_eq!(normalize_pem_key(raw), raw);
    }

    #[test]
    fn test_auth_error_to_api_error_mapping() {
        let err: ApiError = AuthError::InvalidCredentials.into();
        assert!(matches!(err, ApiError::Unauthorized(_)));

        let err: ApiError = AuthError::EmailAlreadyExists.into();
        assert!(matches!(err, ApiError::Conflict(_)));

        let err: ApiError = AuthError::UserNotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
