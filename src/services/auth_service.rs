//! Domain service for registration, login and token resolution.

use serde::Serialize;
use thiserror::Error;

use crate::domain::UserId;
use crate::services::token::TokenError;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Returned by registration: the new account plus a token for it.
#[derive(Debug, Clone, Serialize)]
pub struct RegisteredUser {
    pub id: UserId,
    pub username: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub token: String,
}

/// User info DTO for responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: UserId,
    pub username: String,
    pub created_at: String,
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates an account and issues its first token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] for a bad username or password and
    /// [`AuthError::UsernameTaken`] if the name is in use.
    async fn register(&self, username: &str, password: &str)
    -> Result<RegisteredUser, AuthError>;

    /// Verifies credentials and issues a fresh token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown user or a wrong
    /// password; the two cases are indistinguishable to the caller.
    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError>;

    /// Validates a token and loads the user it was issued to.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Token`] when the token does not validate and
    /// [`AuthError::UserNotFound`] when the user no longer exists.
    async fn authenticate(&self, token: &str) -> Result<UserInfo, AuthError>;

    /// Gets information for a specific user.
    async fn resolve(&self, id: UserId) -> Result<UserInfo, AuthError>;
}

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 50;
pub const PASSWORD_MIN_LEN: usize = 6;

/// Checks username and password shape before any hashing happens.
pub fn validate_credentials(username: &str, password: &str) -> Result<(), AuthError> {
    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(AuthError::Validation(format!(
            "Username must be between {USERNAME_MIN_LEN} and {USERNAME_MAX_LEN} characters"
        )));
    }
    if username.trim() != username {
        return Err(AuthError::Validation(
            "Username must not start or end with whitespace".to_string(),
        ));
    }
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(AuthError::Validation(format!(
            "Password must be at least {PASSWORD_MIN_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_reasonable_credentials() {
        assert!(validate_credentials("alice", "secret1").is_ok());
    }

    #[test]
    fn rejects_short_or_long_usernames() {
        assert!(matches!(
            validate_credentials("al", "secret1"),
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            validate_credentials(&"a".repeat(51), "secret1"),
            Err(AuthError::Validation(_))
        ));
    }

    #[test]
    fn rejects_padded_username() {
        assert!(validate_credentials(" alice", "secret1").is_err());
    }

    #[test]
    fn rejects_short_password() {
        assert!(matches!(
            validate_credentials("alice", "12345"),
            Err(AuthError::Validation(_))
        ));
    }
}
