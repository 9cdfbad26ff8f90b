//! JWT utilities for token generation and validation
//!
//! Provides JWT token creation and validation using HS256 algorithm.
//! Access tokens are short-lived (1 hour), refresh tokens are long-lived (30 days).
//! Tokens are stateless: nothing is persisted server-side and there is no
//! revocation list, so a leaked refresh token stays usable until it expires.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default access token expiration time (1 hour)
const ACCESS_TOKEN_EXPIRATION_MINUTES: i64 = 60;

/// Default refresh token expiration time (30 days)
const REFRESH_TOKEN_EXPIRATION_DAYS: i64 = 30;

const DEFAULT_ISSUER: &str = "passwordin";

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Access token expiration in minutes
    pub access_token_expiration_minutes: i64,
    /// Refresh token expiration in days
    pub refresh_token_expiration_days: i64,
    /// Token issuer
    pub issuer: String,
}

impl JwtConfig {
    /// Create a new JWT configuration
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_token_expiration_minutes: ACCESS_TOKEN_EXPIRATION_MINUTES,
            refresh_token_expiration_days: REFRESH_TOKEN_EXPIRATION_DAYS,
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }

    /// Create config from environment variables
    pub fn from_env() -> Result<Self, TokenError> {
        let secret = std::env::var("JWT_SECRET_KEY")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(TokenError::MissingSecret)?;

        let access_exp = std::env::var("JWT_ACCESS_EXPIRATION_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(ACCESS_TOKEN_EXPIRATION_MINUTES);

        let refresh_exp = std::env::var("JWT_REFRESH_EXPIRATION_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(REFRESH_TOKEN_EXPIRATION_DAYS);

        let issuer = std::env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.to_string());

        Ok(Self {
            secret,
            access_token_expiration_minutes: access_exp,
            refresh_token_expiration_days: refresh_exp,
            issuer,
        })
    }

    /// Set access token expiration
    pub fn access_token_expiration(mut self, minutes: i64) -> Self {
        self.access_token_expiration_minutes = minutes;
        self
    }

    /// Set refresh token expiration
    pub fn refresh_token_expiration(mut self, days: i64) -> Self {
        self.refresh_token_expiration_days = days;
        self
    }

    /// Set issuer
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }
}

/// Token errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("JWT_SECRET_KEY environment variable not set")]
    MissingSecret,

    #[error("Token encoding failed: {0}")]
    EncodingError(String),

    /// Structurally broken token (segment count, base64, JSON)
    #[error("{0}")]
    Malformed(String),

    #[error("Signature verification failed")]
    BadSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Only {expected} tokens are allowed")]
    WrongKind { expected: TokenType },
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::BadSignature,
            ErrorKind::InvalidToken => TokenError::Malformed("Invalid token structure".to_string()),
            ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
                TokenError::Malformed(format!("Invalid token encoding: {}", err))
            }
            _ => TokenError::InvalidToken,
        }
    }
}

/// Token type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenType::Access => write!(f, "access"),
            TokenType::Refresh => write!(f, "refresh"),
        }
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Token type (access or refresh)
    pub token_type: TokenType,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issuer
    pub iss: String,
    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

/// The identity carried by a verified token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub username: String,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.sub,
        }
    }
}

/// Token pair (access + refresh)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Access token (short-lived)
    pub access_token: String,
    /// Refresh token (long-lived)
    pub refresh_token: String,
    /// Access token expiration (Unix timestamp)
    pub access_expires_at: i64,
    /// Refresh token expiration (Unix timestamp)
    pub refresh_expires_at: i64,
    /// Token type (always "Bearer")
    pub token_type: String,
}

/// JWT service for token operations
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// Create a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Create JWT service from environment variables
    pub fn from_env() -> Result<Self, TokenError> {
        let config = JwtConfig::from_env()?;
        Ok(Self::new(config))
    }

    /// Generate an access token expiring one access lifetime from now
    pub fn generate_access_token(&self, username: &str) -> Result<(String, i64), TokenError> {
        self.generate_access_token_at(username, Utc::now())
    }

    /// Generate an access token as if issued at `issued_at`
    pub fn generate_access_token_at(
        &self,
        username: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<(String, i64), TokenError> {
        let exp = issued_at + Duration::minutes(self.config.access_token_expiration_minutes);
        self.encode_token(username, TokenType::Access, issued_at, exp)
    }

    /// Generate a refresh token expiring one refresh lifetime from now
    pub fn generate_refresh_token(&self, username: &str) -> Result<(String, i64), TokenError> {
        self.generate_refresh_token_at(username, Utc::now())
    }

    /// Generate a refresh token as if issued at `issued_at`
    pub fn generate_refresh_token_at(
        &self,
        username: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<(String, i64), TokenError> {
        let exp = issued_at + Duration::days(self.config.refresh_token_expiration_days);
        self.encode_token(username, TokenType::Refresh, issued_at, exp)
    }

    fn encode_token(
        &self,
        username: &str,
        token_type: TokenType,
        issued_at: DateTime<Utc>,
        exp: DateTime<Utc>,
    ) -> Result<(String, i64), TokenError> {
        let claims = Claims {
            sub: username.to_string(),
            token_type,
            iat: issued_at.timestamp(),
            exp: exp.timestamp(),
            iss: self.config.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingError(e.to_string()))?;

        Ok((token, exp.timestamp()))
    }

    /// Generate both access and refresh tokens
    pub fn generate_token_pair(&self, username: &str) -> Result<TokenPair, TokenError> {
        let (access_token, access_expires_at) = self.generate_access_token(username)?;
        let (refresh_token, refresh_expires_at) = self.generate_refresh_token(username)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at,
            refresh_expires_at,
            token_type: "Bearer".to_string(),
        })
    }

    /// Validate and decode a token of any type
    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        match token.split('.').count() {
            n if n < 3 => return Err(TokenError::Malformed("Not enough segments".to_string())),
            n if n > 3 => return Err(TokenError::Malformed("Too many segments".to_string())),
            _ => {}
        }

        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);
        // Set leeway to 0 for strict expiration checking
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)?;

        Ok(token_data.claims)
    }

    /// Verify a token and require it to be of the given type
    pub fn verify(&self, token: &str, required: TokenType) -> Result<Identity, TokenError> {
        let claims = self.validate_token(token)?;

        if claims.token_type != required {
            return Err(TokenError::WrongKind { expected: required });
        }

        Ok(claims.into())
    }

    /// Exchange a refresh token for a brand new token pair.
    ///
    /// The presented refresh token is not invalidated.
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair, TokenError> {
        let identity = self.verify(refresh_token, TokenType::Refresh)?;
        self.generate_token_pair(&identity.username)
    }
}
