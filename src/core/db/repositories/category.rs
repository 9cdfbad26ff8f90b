//! Category repository for database operations

use sqlx::SqlitePool;

use crate::core::db::models::{Category, UNCATEGORIZED};

/// Category repository error types
#[derive(Debug, thiserror::Error)]
pub enum CategoryRepositoryError {
    #[error("Category not found")]
    NotFound,

    #[error("Category name already exists")]
    NameAlreadyExists,

    #[error("The uncategorized category cannot be deleted")]
    ProtectedCategory,

    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),
}

impl From<sqlx::Error> for CategoryRepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                CategoryRepositoryError::NameAlreadyExists
            }
            other => CategoryRepositoryError::DatabaseError(other),
        }
    }
}

/// Category repository for database operations
#[derive(Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Create a new category repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new category
    pub async fn create(&self, name: &str) -> Result<Category, CategoryRepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name)
            VALUES (?)
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    /// Find a category by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Category>, CategoryRepositoryError> {
        let category = sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    /// List all categories ordered by ID
    pub async fn list(&self) -> Result<Vec<Category>, CategoryRepositoryError> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(categories)
    }

    /// Rename a category
    pub async fn rename(&self, id: i64, name: &str) -> Result<Category, CategoryRepositoryError> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = ?
            WHERE id = ?
            RETURNING id, name
            "#,
        )
        .bind(name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(CategoryRepositoryError::NotFound)
    }

    /// Delete a category, moving its passwords to the uncategorized category.
    ///
    /// Runs in a single transaction; the uncategorized category is created
    /// on first use. Returns the number of passwords moved.
    pub async fn delete(&self, id: i64) -> Result<u64, CategoryRepositoryError> {
        let mut tx = self.pool.begin().await?;

        let category =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(CategoryRepositoryError::NotFound)?;

        if category.name == UNCATEGORIZED {
            return Err(CategoryRepositoryError::ProtectedCategory);
        }

        let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM categories WHERE name = ?")
            .bind(UNCATEGORIZED)
            .fetch_optional(&mut *tx)
            .await?;

        let uncategorized_id = match existing {
            Some((existing_id,)) => existing_id,
            None => {
                let (created_id,): (i64,) =
                    sqlx::query_as("INSERT INTO categories (name) VALUES (?) RETURNING id")
                        .bind(UNCATEGORIZED)
                        .fetch_one(&mut *tx)
                        .await?;
                created_id
            }
        };

        let moved = sqlx::query("UPDATE passwords SET category_id = ? WHERE category_id = ?")
            .bind(uncategorized_id)
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(moved)
    }
}
