//! Application state and the assembled HTTP router

use axum::{Router, extract::FromRef};
use tower_http::trace::TraceLayer;

use crate::core::auth::{AuthService, JwtService, auth_api_router};
use crate::core::db::{CategoryRepository, PasswordRepository, SqlitePool, UserRepository};
use crate::core::records::records_api_router;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub jwt_service: JwtService,
    pub categories: CategoryRepository,
    pub passwords: PasswordRepository,
}

impl AppState {
    pub fn new(pool: SqlitePool, jwt_service: JwtService, password_hash_cost: u32) -> Self {
        let user_repo = UserRepository::with_hash_cost(pool.clone(), password_hash_cost);

        Self {
            auth_service: AuthService::new(user_repo, jwt_service.clone()),
            jwt_service,
            categories: CategoryRepository::new(pool.clone()),
            passwords: PasswordRepository::new(pool),
        }
    }
}

impl FromRef<AppState> for JwtService {
    fn from_ref(state: &AppState) -> Self {
        state.jwt_service.clone()
    }
}

/// Build the full application router
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .merge(auth_api_router(state.clone()))
        .merge(records_api_router(state))
        .layer(TraceLayer::new_for_http())
}
