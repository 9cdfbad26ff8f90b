//! passwordin - Credential vault backend
//!
//! Account registration and login with bcrypt-hashed passwords, JWT
//! access/refresh tokens, and a token-gated store of password records
//! grouped into categories.

pub mod app;
pub mod core;
