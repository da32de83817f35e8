use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::CategoryForm;
use crate::features::categories::models::{Category, CategoryWithCount};
use crate::shared::validation::contains_pattern;

const CATEGORY_COLUMNS: &str = "id, name, description, is_active, created_at, updated_at";

/// Service for category operations
pub struct CategoryService {
    pool: SqlitePool,
}

impl CategoryService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List active categories ordered by name (filter controls, form selects)
    pub async fn list_active(&self) -> Result<Vec<Category>> {
        let query = format!(
            "SELECT {} FROM categories WHERE is_active = TRUE ORDER BY name, id",
            CATEGORY_COLUMNS
        );

        sqlx::query_as::<_, Category>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list categories: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Get an active category by ID
    pub async fn get_active(&self, id: i64) -> Result<Option<Category>> {
        let query = format!(
            "SELECT {} FROM categories WHERE id = ? AND is_active = TRUE",
            CATEGORY_COLUMNS
        );

        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get category {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    /// Categories with their active software counts.
    ///
    /// `active_only` restricts to active categories (public API); `search` matches
    /// name or description case-insensitively (admin page).
    pub async fn list_with_counts(
        &self,
        active_only: bool,
        search: Option<&str>,
    ) -> Result<Vec<CategoryWithCount>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            r#"
            SELECT c.id, c.name, c.description, c.is_active, c.created_at,
                   COUNT(s.id) AS software_count
            FROM categories c
            LEFT JOIN software s ON s.category_id = c.id AND s.is_active = TRUE
            WHERE 1 = 1
            "#,
        );

        if active_only {
            qb.push(" AND c.is_active = TRUE");
        }

        if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
            let pattern = contains_pattern(term);
            qb.push(" AND (c.name REGEXP ")
                .push_bind(pattern.clone())
                .push(" OR c.description REGEXP ")
                .push_bind(pattern)
                .push(")");
        }

        qb.push(" GROUP BY c.id ORDER BY c.name, c.id");

        qb.build_query_as::<CategoryWithCount>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list categories with counts: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Create a category from a validated form
    pub async fn create(&self, form: &CategoryForm) -> Result<Category> {
        let now = Utc::now();
        let query = format!(
            r#"
            INSERT INTO categories (name, description, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        );

        let category = sqlx::query_as::<_, Category>(&query)
            .bind(form.name.trim())
            .bind(form.description.trim())
            .bind(form.is_active())
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create category: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!("Category created: id={}, name={}", category.id, category.name);

        Ok(category)
    }

    /// Flip the active flag in a single statement; returns the updated row
    pub async fn toggle_active(&self, id: i64) -> Result<Category> {
        let query = format!(
            r#"
            UPDATE categories
            SET is_active = NOT is_active, updated_at = ?
            WHERE id = ?
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        );

        let category = sqlx::query_as::<_, Category>(&query)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to toggle category {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))?;

        tracing::info!(
            "Category {} is now {}",
            category.id,
            if category.is_active { "active" } else { "inactive" }
        );

        Ok(category)
    }
}
