//! Input validation for account credentials
//!
//! Username and password shape checks run before any authentication logic.
//! Checks are plain functions composed into ordered pipelines; the first
//! failing check wins, which decides the 400 message a request receives when
//! both fields are malformed.

use serde::Deserialize;

/// Minimum username length (in characters)
pub const MIN_USERNAME_LENGTH: usize = 4;

/// Maximum username length (in characters)
pub const MAX_USERNAME_LENGTH: usize = 10;

/// Minimum password length (in characters)
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Symbols accepted in passwords; at least one is required
pub const PASSWORD_SYMBOLS: &str = "@$!%*#?&";

/// bcrypt reads 72 bytes including a trailing NUL
pub const MAX_PASSWORD_BYTES: usize = 71;

/// Credential validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid username")]
    InvalidUsername,

    #[error("Username length should be between 4 and 10 characters")]
    UsernameLength,

    #[error("Password is required")]
    PasswordRequired,

    #[error("Password must be at most 71 bytes long")]
    PasswordTooLong,

    #[error(
        "Password should be at least 6 characters long and contain at least one letter, one number, and one special character"
    )]
    PasswordFormat,
}

impl ValidationError {
    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidUsername => "INVALID_USERNAME",
            ValidationError::UsernameLength => "INVALID_USERNAME_LENGTH",
            ValidationError::PasswordRequired => "PASSWORD_REQUIRED",
            ValidationError::PasswordTooLong => "PASSWORD_TOO_LONG",
            ValidationError::PasswordFormat => "INVALID_PASSWORD",
        }
    }
}

/// Check that a username is identifier-shaped and 4-10 characters long
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() || !is_identifier(username) {
        return Err(ValidationError::InvalidUsername);
    }

    let length = username.chars().count();
    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&length) {
        return Err(ValidationError::UsernameLength);
    }

    Ok(())
}

/// Check that a password has a letter, a digit and an allowed symbol,
/// is 6 characters to 71 bytes long, and uses nothing outside those classes
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::PasswordRequired);
    }

    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::PasswordTooLong);
    }

    let is_symbol = |c: char| PASSWORD_SYMBOLS.contains(c);

    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(is_symbol);
    let only_allowed = password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || is_symbol(c));
    let long_enough = password.chars().count() >= MIN_PASSWORD_LENGTH;

    if !(has_letter && has_digit && has_symbol && only_allowed && long_enough) {
        return Err(ValidationError::PasswordFormat);
    }

    Ok(())
}

/// Letters or underscore first, then letters, digits or underscores
fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();

    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }

    chars.all(|c| c.is_alphanumeric() || c == '_')
}

// ============================================================================
// Credential pipelines
// ============================================================================

/// Raw credentials as posted by clients. Missing fields are treated as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Credentials that passed a check pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// A single all-or-nothing pre-check on a credentials request
pub type CredentialCheck = fn(&CredentialsRequest) -> Result<(), ValidationError>;

/// Username first, then password
pub const REGISTER_CHECKS: &[CredentialCheck] = &[check_username, check_password];

/// Password first, then username
pub const LOGIN_CHECKS: &[CredentialCheck] = &[check_password, check_username];

fn check_username(request: &CredentialsRequest) -> Result<(), ValidationError> {
    validate_username(request.username())
}

fn check_password(request: &CredentialsRequest) -> Result<(), ValidationError> {
    validate_password(request.password())
}

impl CredentialsRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or_default()
    }

    pub fn password(&self) -> &str {
        self.password.as_deref().unwrap_or_default()
    }

    /// Run `checks` in order, stopping at the first failure
    pub fn validate(self, checks: &[CredentialCheck]) -> Result<Credentials, ValidationError> {
        checks.iter().try_for_each(|check| check(&self))?;

        Ok(Credentials {
            username: self.username.unwrap_or_default(),
            password: self.password.unwrap_or_default(),
        })
    }
}
