//! `SeaORM` implementation of the `AuthService` trait.

use crate::config::SecurityConfig;
use crate::db::{Store, User};
use crate::domain::UserId;
use crate::services::auth_service::{
    AuthError, AuthService, LoginResult, RegisteredUser, UserInfo, validate_credentials,
};
use crate::services::token::TokenService;
use async_trait::async_trait;
use tracing::info;

pub struct SeaOrmAuthService {
    store: Store,
    tokens: TokenService,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, tokens: TokenService, security: SecurityConfig) -> Self {
        Self {
            store,
            tokens,
            security,
        }
    }
}

fn user_info(user: User) -> UserInfo {
    UserInfo {
        id: user.id,
        username: user.username,
        created_at: user.created_at,
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<RegisteredUser, AuthError> {
        validate_credentials(username, password)?;

        let user = self
            .store
            .create_user(username, password, &self.security)
            .await?;
        let token = self.tokens.issue(user.id)?;

        info!(user_id = %user.id, "Registered user {}", user.username);

        Ok(RegisteredUser {
            id: user.id,
            username: user.username,
            token,
        })
    }

    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError> {
        let user = self
            .store
            .verify_user_password(username, password, &self.security)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let token = self.tokens.issue(user.id)?;
        Ok(LoginResult { token })
    }

    async fn authenticate(&self, token: &str) -> Result<UserInfo, AuthError> {
        let user_id = self.tokens.validate(token)?;
        self.resolve(user_id).await
    }

    async fn resolve(&self, id: UserId) -> Result<UserInfo, AuthError> {
        let user = self
            .store
            .get_user(id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(user_info(user))
    }
}
