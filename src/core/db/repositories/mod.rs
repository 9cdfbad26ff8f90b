//! Database repositories for passwordin
//!
//! Repositories encapsulate data access logic and provide a clean API for
//! business logic to interact with the database.

pub mod category;
pub mod password;
pub mod user;

pub use category::{CategoryRepository, CategoryRepositoryError};
pub use password::{PasswordRepository, PasswordRepositoryError};
pub use user::{UserRepository, UserRepositoryError};
