//! User repository for database operations
//!
//! Credential store for accounts, with password hashing using bcrypt.

use sqlx::SqlitePool;

use crate::core::db::models::User;

/// Cost factor for bcrypt hashing (12 is recommended for production)
pub const BCRYPT_COST: u32 = 12;

/// User repository error types
#[derive(Debug, thiserror::Error)]
pub enum UserRepositoryError {
    #[error("Username already exists")]
    UsernameAlreadyExists,

    #[error("Password hashing failed: {0}")]
    HashingError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// User repository for database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
    hash_cost: u32,
}

impl UserRepository {
    /// Create a new user repository hashing at [`BCRYPT_COST`]
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_hash_cost(pool, BCRYPT_COST)
    }

    /// Create a new user repository with a custom bcrypt cost
    pub fn with_hash_cost(pool: SqlitePool, hash_cost: u32) -> Self {
        Self { pool, hash_cost }
    }

    /// Hash a password using bcrypt with automatic salt generation.
    /// Input that bcrypt would truncate is an error.
    pub fn hash_password(password: &str, cost: u32) -> Result<String, UserRepositoryError> {
        bcrypt::non_truncating_hash(password, cost)
            .map_err(|e| UserRepositoryError::HashingError(e.to_string()))
    }

    /// Verify a password against a bcrypt hash.
    /// Input that bcrypt would truncate is an error.
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, UserRepositoryError> {
        bcrypt::non_truncating_verify(password, hash)
            .map_err(|e| UserRepositoryError::HashingError(e.to_string()))
    }

    /// Create a new user with a plain text password (will be hashed).
    ///
    /// Duplicate usernames are rejected by the UNIQUE constraint, so two
    /// concurrent registrations cannot both succeed.
    pub async fn create(&self, username: &str, password: &str) -> Result<User, UserRepositoryError> {
        let password_hash = Self::hash_password(password, self.hash_cost)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES (?, ?)
            RETURNING id, username, password_hash
            "#,
        )
        .bind(username)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                UserRepositoryError::UsernameAlreadyExists
            }
            other => UserRepositoryError::DatabaseError(other),
        })?;

        Ok(user)
    }

    /// Find a user by username
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, UserRepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Authenticate a user by username and password
    /// Returns the user if credentials are valid, None otherwise
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, UserRepositoryError> {
        let user = match self.find_by_username(username).await? {
            Some(u) => u,
            None => return Ok(None),
        };

        let is_valid = Self::verify_password(password, &user.password_hash)?;

        if is_valid { Ok(Some(user)) } else { Ok(None) }
    }

    /// Count accounts with the given username (0 or 1)
    pub async fn count_by_username(&self, username: &str) -> Result<i64, UserRepositoryError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Count total users
    pub async fn count(&self) -> Result<i64, UserRepositoryError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
