//! Record API endpoints
//!
//! - GET /categories - List categories
//! - POST /categories - Create a category
//! - PUT /categories/{id} - Rename a category
//! - DELETE /categories/{id} - Delete a category, keeping its passwords
//! - GET /categories/{id}/passwords - List the passwords of a category
//! - POST /passwords - Create a password record
//! - PUT /passwords/{id} - Partially update a password record
//! - DELETE /passwords/{id} - Delete a password record

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::core::api::{ApiError, JsonBody, MessageResponse, PathParam};
use crate::core::auth::gate::RequireAccess;
use crate::core::db::models::{
    Category, CreatePasswordRecord, PasswordRecord, UpdatePasswordRecord,
};
use crate::core::db::repositories::{CategoryRepositoryError, PasswordRepositoryError};

/// Record API error types
#[derive(Debug, thiserror::Error)]
pub enum RecordApiError {
    #[error("Category not found.")]
    CategoryNotFound,

    #[error("Password not found.")]
    PasswordNotFound,

    #[error("Category name already exists")]
    NameAlreadyExists,

    #[error("The uncategorized category cannot be deleted")]
    ProtectedCategory,

    #[error("Invalid category ID")]
    InvalidCategory,

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<CategoryRepositoryError> for RecordApiError {
    fn from(err: CategoryRepositoryError) -> Self {
        match err {
            CategoryRepositoryError::NotFound => RecordApiError::CategoryNotFound,
            CategoryRepositoryError::NameAlreadyExists => RecordApiError::NameAlreadyExists,
            CategoryRepositoryError::ProtectedCategory => RecordApiError::ProtectedCategory,
            CategoryRepositoryError::DatabaseError(e) => RecordApiError::InternalError(e.to_string()),
        }
    }
}

impl From<PasswordRepositoryError> for RecordApiError {
    fn from(err: PasswordRepositoryError) -> Self {
        match err {
            PasswordRepositoryError::NotFound => RecordApiError::PasswordNotFound,
            PasswordRepositoryError::CategoryNotFound => RecordApiError::InvalidCategory,
            PasswordRepositoryError::DatabaseError(e) => RecordApiError::InternalError(e.to_string()),
        }
    }
}

impl IntoResponse for RecordApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            RecordApiError::CategoryNotFound => (StatusCode::NOT_FOUND, "CATEGORY_NOT_FOUND"),
            RecordApiError::PasswordNotFound => (StatusCode::NOT_FOUND, "PASSWORD_NOT_FOUND"),
            RecordApiError::NameAlreadyExists => (StatusCode::CONFLICT, "NAME_ALREADY_EXISTS"),
            RecordApiError::ProtectedCategory => (StatusCode::CONFLICT, "CATEGORY_PROTECTED"),
            RecordApiError::InvalidCategory => (StatusCode::BAD_REQUEST, "INVALID_CATEGORY"),
            RecordApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            RecordApiError::InternalError(msg) => {
                tracing::error!("Record store error: {}", msg);
                return ApiError::new("Internal server error", "INTERNAL_ERROR")
                    .with_status(StatusCode::INTERNAL_SERVER_ERROR);
            }
        };

        ApiError::new(self.to_string(), code).with_status(status)
    }
}

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// Request for creating or renaming a category
#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// Request for creating a password record
#[derive(Debug, Deserialize)]
pub struct CreatePasswordRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub notes: Option<String>,
    pub category_id: Option<i64>,
}

/// Response for category list
#[derive(Debug, Serialize)]
pub struct CategoryListResponse {
    pub categories: Vec<Category>,
    pub count: usize,
}

/// Response for password list
#[derive(Debug, Serialize)]
pub struct PasswordListResponse {
    pub passwords: Vec<PasswordRecord>,
    pub count: usize,
}

fn category_name(name: Option<String>) -> Result<String, RecordApiError> {
    let name = name.unwrap_or_default();
    let name = name.trim();
    if name.is_empty() {
        return Err(RecordApiError::BadRequest(
            "Category name cannot be empty".to_string(),
        ));
    }
    Ok(name.to_string())
}

// ============================================================================
// Router
// ============================================================================

/// Create the record API router
pub fn records_api_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/categories",
            get(list_categories_handler).post(create_category_handler),
        )
        .route(
            "/categories/{id}",
            put(update_category_handler).delete(delete_category_handler),
        )
        .route(
            "/categories/{id}/passwords",
            get(list_category_passwords_handler),
        )
        .route("/passwords", post(create_password_handler))
        .route(
            "/passwords/{id}",
            put(update_password_handler).delete(delete_password_handler),
        )
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /categories
async fn list_categories_handler(
    RequireAccess(identity): RequireAccess,
    State(state): State<AppState>,
) -> Result<Json<CategoryListResponse>, RecordApiError> {
    tracing::debug!("Listing categories for {}", identity.username);

    let categories = state.categories.list().await?;
    let count = categories.len();

    Ok(Json(CategoryListResponse { categories, count }))
}

/// POST /categories
async fn create_category_handler(
    RequireAccess(identity): RequireAccess,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CategoryRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), RecordApiError> {
    let name = category_name(request.name)?;

    let category = state.categories.create(&name).await?;

    tracing::info!("Category {} created by {}", category.id, identity.username);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Category created successfully.")),
    ))
}

/// PUT /categories/{id}
/// A missing name leaves the category unchanged
async fn update_category_handler(
    RequireAccess(identity): RequireAccess,
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
    JsonBody(request): JsonBody<CategoryRequest>,
) -> Result<Json<MessageResponse>, RecordApiError> {
    match request.name {
        Some(name) => {
            let name = category_name(Some(name))?;
            state.categories.rename(id, &name).await?;
        }
        None => {
            state
                .categories
                .find_by_id(id)
                .await?
                .ok_or(RecordApiError::CategoryNotFound)?;
        }
    }

    tracing::info!("Category {} updated by {}", id, identity.username);

    Ok(Json(MessageResponse::new("Category updated successfully.")))
}

/// DELETE /categories/{id}
async fn delete_category_handler(
    RequireAccess(identity): RequireAccess,
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<MessageResponse>, RecordApiError> {
    let moved = state.categories.delete(id).await?;

    tracing::info!(
        "Category {} deleted by {}, {} passwords moved",
        id,
        identity.username,
        moved
    );

    Ok(Json(MessageResponse::new("Category deleted successfully.")))
}

/// GET /categories/{id}/passwords
async fn list_category_passwords_handler(
    RequireAccess(identity): RequireAccess,
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<PasswordListResponse>, RecordApiError> {
    tracing::debug!("Listing passwords of category {} for {}", id, identity.username);

    state
        .categories
        .find_by_id(id)
        .await?
        .ok_or(RecordApiError::CategoryNotFound)?;

    let passwords = state.passwords.list_by_category(id).await?;
    let count = passwords.len();

    Ok(Json(PasswordListResponse { passwords, count }))
}

/// POST /passwords
async fn create_password_handler(
    RequireAccess(identity): RequireAccess,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreatePasswordRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), RecordApiError> {
    let category_id = request.category_id.ok_or(RecordApiError::InvalidCategory)?;

    let record = state
        .passwords
        .create(&CreatePasswordRecord {
            name: request.name,
            email: request.email,
            password: request.password,
            notes: request.notes,
            category_id,
        })
        .await?;

    tracing::info!("Password {} created by {}", record.id, identity.username);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Password created successfully.")),
    ))
}

/// PUT /passwords/{id}
async fn update_password_handler(
    RequireAccess(identity): RequireAccess,
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
    JsonBody(updates): JsonBody<UpdatePasswordRecord>,
) -> Result<Json<MessageResponse>, RecordApiError> {
    state.passwords.update(id, &updates).await?;

    tracing::info!("Password {} updated by {}", id, identity.username);

    Ok(Json(MessageResponse::new("Password updated successfully.")))
}

/// DELETE /passwords/{id}
async fn delete_password_handler(
    RequireAccess(identity): RequireAccess,
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<MessageResponse>, RecordApiError> {
    if !state.passwords.delete(id).await? {
        return Err(RecordApiError::PasswordNotFound);
    }

    tracing::info!("Password {} deleted by {}", id, identity.username);

    Ok(Json(MessageResponse::new("Password deleted successfully.")))
}
