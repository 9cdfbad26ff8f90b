//! Database models for passwordin
//!
//! This module defines the database entity structs that map to SQLite tables.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ============================================================================
// User Model
// ============================================================================

/// User entity representing a registered account
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

// ============================================================================
// Category Model
// ============================================================================

/// Name of the category that receives passwords of deleted categories
pub const UNCATEGORIZED: &str = "uncategorized";

/// Category grouping password records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

// ============================================================================
// Password Model
// ============================================================================

/// Secret record. Stored as plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PasswordRecord {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub notes: Option<String>,
    pub category_id: i64,
}

/// Password record data for creation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePasswordRecord {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub notes: Option<String>,
    pub category_id: i64,
}

/// Password record data for updates; `None` keeps the current value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePasswordRecord {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub notes: Option<String>,
    pub category_id: Option<i64>,
}
