//! Request gate for protected endpoints
//!
//! `RequireAccess` and `RequireRefresh` are axum extractors. They run before
//! the handler body, so a rejected request never reaches any repository.
//! Structurally broken tokens are answered with 422, every other token
//! failure with 401.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};

use crate::core::api::ApiError;
use crate::core::auth::jwt::{Identity, JwtService, TokenError, TokenType};

/// Why a request was turned away by the gate
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateRejection {
    #[error("Missing Authorization Header")]
    MissingHeader,

    #[error("Bad Authorization header. Expected 'Authorization: Bearer <JWT>'")]
    BadHeader,

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl GateRejection {
    pub fn status(&self) -> StatusCode {
        match self {
            GateRejection::MissingHeader => StatusCode::UNAUTHORIZED,
            GateRejection::BadHeader => StatusCode::UNPROCESSABLE_ENTITY,
            GateRejection::Token(err) => match err {
                TokenError::Malformed(_) => StatusCode::UNPROCESSABLE_ENTITY,
                TokenError::BadSignature
                | TokenError::Expired
                | TokenError::InvalidToken
                | TokenError::WrongKind { .. } => StatusCode::UNAUTHORIZED,
                TokenError::MissingSecret | TokenError::EncodingError(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            GateRejection::MissingHeader => "MISSING_TOKEN",
            GateRejection::BadHeader => "TOKEN_MALFORMED",
            GateRejection::Token(err) => match err {
                TokenError::Malformed(_) => "TOKEN_MALFORMED",
                TokenError::BadSignature | TokenError::InvalidToken => "TOKEN_INVALID",
                TokenError::Expired => "TOKEN_EXPIRED",
                TokenError::WrongKind { .. } => "TOKEN_WRONG_KIND",
                TokenError::MissingSecret | TokenError::EncodingError(_) => "INTERNAL_ERROR",
            },
        }
    }
}

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        let status = self.status();
        ApiError::new(self.to_string(), self.code()).with_status(status)
    }
}

/// Extract Bearer token from Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, GateRejection> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(GateRejection::MissingHeader)?
        .to_str()
        .map_err(|_| GateRejection::BadHeader)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(GateRejection::BadHeader)?;

    if token.is_empty() {
        return Err(GateRejection::BadHeader);
    }

    Ok(token)
}

fn require(
    jwt_service: &JwtService,
    headers: &HeaderMap,
    required: TokenType,
) -> Result<Identity, GateRejection> {
    let token = extract_bearer_token(headers)?;

    jwt_service.verify(token, required).map_err(|e| {
        tracing::debug!("{} token rejected: {}", required, e);
        GateRejection::Token(e)
    })
}

/// Require a valid access token
pub fn require_access(
    jwt_service: &JwtService,
    headers: &HeaderMap,
) -> Result<Identity, GateRejection> {
    require(jwt_service, headers, TokenType::Access)
}

/// Require a valid refresh token
pub fn require_refresh(
    jwt_service: &JwtService,
    headers: &HeaderMap,
) -> Result<Identity, GateRejection> {
    require(jwt_service, headers, TokenType::Refresh)
}

/// Extractor for handlers that need an access token
#[derive(Debug, Clone)]
pub struct RequireAccess(pub Identity);

impl<S> FromRequestParts<S> for RequireAccess
where
    JwtService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = GateRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jwt_service = JwtService::from_ref(state);
        require_access(&jwt_service, &parts.headers).map(Self)
    }
}

/// Extractor for the refresh endpoint. Keeps the presented token so the
/// handler can exchange it.
#[derive(Debug, Clone)]
pub struct RequireRefresh {
    pub identity: Identity,
    pub token: String,
}

impl<S> FromRequestParts<S> for RequireRefresh
where
    JwtService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = GateRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jwt_service = JwtService::from_ref(state);
        let identity = require_refresh(&jwt_service, &parts.headers)?;
        let token = extract_bearer_token(&parts.headers)?.to_string();

        Ok(Self { identity, token })
    }
}
