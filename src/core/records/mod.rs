//! Stored credential records
//!
//! Categories and the password records filed under them, served over
//! REST endpoints that all require an access token.

pub mod api;

pub use api::{RecordApiError, records_api_router};
