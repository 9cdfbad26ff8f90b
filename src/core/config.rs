//! Application configuration from environment variables.
//!
//! Load configuration using `Config::from_env()` after calling `dotenvy::dotenv()`.
//! Database and token settings live next to their services in
//! [`DbConfig`](crate::core::db::DbConfig) and [`JwtConfig`](crate::core::auth::JwtConfig).

use crate::core::db::repositories::user::BCRYPT_COST;

/// Default address the HTTP server binds to
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";

/// Work factor range bcrypt accepts
pub const MIN_HASH_COST: u32 = 4;
pub const MAX_HASH_COST: u32 = 31;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Socket address for the HTTP listener
    /// Example: 0.0.0.0:8080
    pub listen_addr: String,

    /// bcrypt work factor for new password hashes
    pub password_hash_cost: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            password_hash_cost: BCRYPT_COST,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset, unparseable or out-of-range values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            password_hash_cost: parse_hash_cost(std::env::var("PASSWORD_HASH_COST").ok().as_deref()),
        }
    }
}

fn parse_hash_cost(value: Option<&str>) -> u32 {
    let Some(value) = value else {
        return BCRYPT_COST;
    };

    match value.trim().parse::<u32>() {
        Ok(cost) if (MIN_HASH_COST..=MAX_HASH_COST).contains(&cost) => cost,
        _ => {
            tracing::warn!(
                "PASSWORD_HASH_COST must be between {} and {}, got {:?}; using {}",
                MIN_HASH_COST,
                MAX_HASH_COST,
                value,
                BCRYPT_COST
            );
            BCRYPT_COST
        }
    }
}
