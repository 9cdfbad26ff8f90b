//! Auth API endpoints
//!
//! - GET / - Liveness text
//! - POST /create-user - Register a new account
//! - POST /login - Login and get tokens
//! - GET /check - Greet the holder of an access token
//! - POST /refresh - Exchange a refresh token for a new token pair

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::app::AppState;
use crate::core::api::{ApiError, JsonBody, MessageResponse};
use crate::core::auth::gate::{GateRejection, RequireAccess, RequireRefresh};
use crate::core::auth::jwt::TokenPair;
use crate::core::auth::service::AuthError;
use crate::core::validation::{CredentialsRequest, LOGIN_CHECKS, REGISTER_CHECKS};

/// Convert AuthError to API response
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            AuthError::UsernameAlreadyExists => (StatusCode::CONFLICT, "USERNAME_TAKEN"),
            AuthError::Validation(err) => (StatusCode::BAD_REQUEST, err.code()),
            AuthError::InternalError(msg) => {
                tracing::error!("Auth internal error: {}", msg);
                return ApiError::new("Internal server error", "INTERNAL_ERROR")
                    .with_status(StatusCode::INTERNAL_SERVER_ERROR);
            }
        };

        ApiError::new(self.to_string(), code).with_status(status)
    }
}

/// Create the auth API router
pub fn auth_api_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/create-user", post(create_user_handler))
        .route("/login", post(login_handler))
        .route("/check", get(check_handler))
        .route("/refresh", post(refresh_handler))
        .with_state(state)
}

/// GET /
async fn index_handler() -> &'static str {
    "Ohkay ✅"
}

/// POST /create-user
/// Register a new account
async fn create_user_handler(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CredentialsRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AuthError> {
    let credentials = request.validate(REGISTER_CHECKS)?;

    tracing::info!("Registration attempt for username: {}", credentials.username);

    state
        .auth_service
        .register(&credentials.username, &credentials.password)
        .await?;

    tracing::info!("User registered successfully: {}", credentials.username);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Successfully created user")),
    ))
}

/// POST /login
/// Login and get access/refresh tokens
async fn login_handler(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CredentialsRequest>,
) -> Result<Json<TokenPair>, AuthError> {
    let credentials = request.validate(LOGIN_CHECKS)?;

    tracing::info!("Login attempt for username: {}", credentials.username);

    let tokens = state
        .auth_service
        .login(&credentials.username, &credentials.password)
        .await?;

    tracing::info!("User logged in successfully: {}", credentials.username);

    Ok(Json(tokens))
}

/// GET /check
async fn check_handler(RequireAccess(identity): RequireAccess) -> Json<MessageResponse> {
    Json(MessageResponse::new(format!(
        "Hello, {}! This endpoint is protected by JWT.",
        identity.username
    )))
}

/// POST /refresh
/// Exchange a refresh token for a new token pair
async fn refresh_handler(
    State(state): State<AppState>,
    refresh: RequireRefresh,
) -> Result<Json<TokenPair>, GateRejection> {
    tracing::debug!("Token refresh for username: {}", refresh.identity.username);

    let tokens = state.jwt_service.refresh(&refresh.token)?;

    Ok(Json(tokens))
}
