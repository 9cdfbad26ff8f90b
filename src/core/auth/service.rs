//! Authentication service
//!
//! Provides business logic for account registration and login.
//! Coordinates between the user repository and the JWT service.

use crate::core::auth::jwt::{Identity, JwtService, TokenError, TokenPair};
use crate::core::db::repositories::{UserRepository, UserRepositoryError};
use crate::core::validation::ValidationError;

/// Authentication service error types
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown username and wrong password are deliberately the same error
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Username already taken")]
    UsernameAlreadyExists,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<UserRepositoryError> for AuthError {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::UsernameAlreadyExists => AuthError::UsernameAlreadyExists,
            _ => AuthError::InternalError(err.to_string()),
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        AuthError::InternalError(err.to_string())
    }
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_service: JwtService,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(user_repo: UserRepository, jwt_service: JwtService) -> Self {
        Self {
            user_repo,
            jwt_service,
        }
    }

    /// Register a new account. Input must already be validated.
    pub async fn register(&self, username: &str, password: &str) -> Result<(), AuthError> {
        if self.user_repo.count_by_username(username).await? > 0 {
            return Err(AuthError::UsernameAlreadyExists);
        }

        self.user_repo.create(username, password).await?;

        Ok(())
    }

    /// Check a username/password pair against the credential store
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Identity, AuthError> {
        let user = self
            .user_repo
            .authenticate(username, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        Ok(Identity {
            username: user.username,
        })
    }

    /// Authenticate and issue a fresh token pair
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AuthError> {
        let identity = self.authenticate(username, password).await?;

        Ok(self.jwt_service.generate_token_pair(&identity.username)?)
    }
}
