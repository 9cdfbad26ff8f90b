//! Authentication module for passwordin
//!
//! This module provides authentication functionality including:
//! - JWT access/refresh token generation and validation
//! - Account registration and login
//! - The request gate guarding protected endpoints
//! - REST API endpoints for auth operations

pub mod api;
pub mod gate;
pub mod jwt;
pub mod service;

pub use api::auth_api_router;
pub use gate::{GateRejection, RequireAccess, RequireRefresh, require_access, require_refresh};
pub use jwt::{Claims, Identity, JwtConfig, JwtService, TokenError, TokenPair, TokenType};
pub use service::{AuthError, AuthService};
