//! Password record repository for database operations
//!
//! Records reference their category through `category_id`; listing by
//! category uses the `idx_passwords_category_id` index.

use sqlx::SqlitePool;

use crate::core::db::models::{CreatePasswordRecord, PasswordRecord, UpdatePasswordRecord};

/// Password repository error types
#[derive(Debug, thiserror::Error)]
pub enum PasswordRepositoryError {
    #[error("Password not found")]
    NotFound,

    #[error("Invalid category ID")]
    CategoryNotFound,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Password repository for database operations
#[derive(Clone)]
pub struct PasswordRepository {
    pool: SqlitePool,
}

impl PasswordRepository {
    /// Create a new password repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn category_exists(&self, category_id: i64) -> Result<bool, PasswordRepositoryError> {
        let found: Option<(i64,)> = sqlx::query_as("SELECT id FROM categories WHERE id = ?")
            .bind(category_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }

    /// Create a password record in an existing category
    pub async fn create(
        &self,
        dto: &CreatePasswordRecord,
    ) -> Result<PasswordRecord, PasswordRepositoryError> {
        if !self.category_exists(dto.category_id).await? {
            return Err(PasswordRepositoryError::CategoryNotFound);
        }

        let record = sqlx::query_as::<_, PasswordRecord>(
            r#"
            INSERT INTO passwords (name, email, password, notes, category_id)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, name, email, password, notes, category_id
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.email)
        .bind(&dto.password)
        .bind(&dto.notes)
        .bind(dto.category_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Find a password record by ID
    pub async fn find_by_id(
        &self,
        id: i64,
    ) -> Result<Option<PasswordRecord>, PasswordRepositoryError> {
        let record = sqlx::query_as::<_, PasswordRecord>(
            r#"
            SELECT id, name, email, password, notes, category_id
            FROM passwords
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// List the password records of a category
    pub async fn list_by_category(
        &self,
        category_id: i64,
    ) -> Result<Vec<PasswordRecord>, PasswordRepositoryError> {
        let records = sqlx::query_as::<_, PasswordRecord>(
            r#"
            SELECT id, name, email, password, notes, category_id
            FROM passwords
            WHERE category_id = ?
            ORDER BY id
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Update a password record; absent fields keep their value
    pub async fn update(
        &self,
        id: i64,
        updates: &UpdatePasswordRecord,
    ) -> Result<PasswordRecord, PasswordRepositoryError> {
        if let Some(category_id) = updates.category_id
            && !self.category_exists(category_id).await?
        {
            return Err(PasswordRepositoryError::CategoryNotFound);
        }

        sqlx::query_as::<_, PasswordRecord>(
            r#"
            UPDATE passwords
            SET
                name = COALESCE(?, name),
                email = COALESCE(?, email),
                password = COALESCE(?, password),
                notes = COALESCE(?, notes),
                category_id = COALESCE(?, category_id)
            WHERE id = ?
            RETURNING id, name, email, password, notes, category_id
            "#,
        )
        .bind(&updates.name)
        .bind(&updates.email)
        .bind(&updates.password)
        .bind(&updates.notes)
        .bind(updates.category_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(PasswordRepositoryError::NotFound)
    }

    /// Delete a password record by ID
    pub async fn delete(&self, id: i64) -> Result<bool, PasswordRepositoryError> {
        let result = sqlx::query("DELETE FROM passwords WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count all password records
    pub async fn count(&self) -> Result<i64, PasswordRepositoryError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM passwords")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
