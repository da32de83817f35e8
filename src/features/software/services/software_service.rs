use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::filter::SoftwareFilter;
use crate::core::error::{AppError, Result};
use crate::features::software::models::{NewSoftware, Software, SoftwareChanges};
use crate::shared::types::Page;

/// Software joined with category and uploader names; filters refer to `s` and `a`
const SELECT_SOFTWARE: &str = r#"
    SELECT s.id, s.title, s.description, s.version,
           s.category_id, c.name AS category_name,
           s.uploader_id, a.username AS uploader_username,
           s.file_path, s.thumbnail_path, s.download_count, s.is_active,
           s.upload_date, s.update_date, s.created_at, s.updated_at
    FROM software s
    LEFT JOIN categories c ON c.id = s.category_id
    LEFT JOIN accounts a ON a.id = s.uploader_id
"#;

const COUNT_SOFTWARE: &str = r#"
    SELECT COUNT(*)
    FROM software s
    LEFT JOIN accounts a ON a.id = s.uploader_id
"#;

/// Service for catalog entries
pub struct SoftwareService {
    pool: SqlitePool,
}

impl SoftwareService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// Number of entries matching `filter`
    pub async fn count(&self, filter: &SoftwareFilter) -> Result<i64> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(COUNT_SOFTWARE);
        filter.push_where(&mut qb);

        qb.build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count software: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Entries matching `filter` in surface order, optionally capped at `limit`
    pub async fn list(&self, filter: &SoftwareFilter, limit: Option<i64>) -> Result<Vec<Software>> {
        self.fetch(filter, limit, 0).await
    }

    /// One page (1-based) of entries matching `filter`; pages outside the range are NotFound
    pub async fn list_page(
        &self,
        filter: &SoftwareFilter,
        page: i64,
        page_size: i64,
    ) -> Result<Page<Software>> {
        let total = self.count(filter).await?;
        let num_pages = Page::<Software>::page_count(total, page_size);

        if page < 1 || page > num_pages {
            return Err(AppError::NotFound(format!("Invalid page ({})", page)));
        }

        let items = self
            .fetch(filter, Some(page_size), (page - 1) * page_size)
            .await?;

        Ok(Page::new(items, page, page_size, total))
    }

    async fn fetch(
        &self,
        filter: &SoftwareFilter,
        limit: Option<i64>,
        offset: i64,
    ) -> Result<Vec<Software>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_SOFTWARE);
        filter.push_where(&mut qb);
        qb.push(filter.order_clause());

        if let Some(limit) = limit {
            qb.push(" LIMIT ")
                .push_bind(limit)
                .push(" OFFSET ")
                .push_bind(offset);
        }

        qb.build_query_as::<Software>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list software: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Get an entry by ID regardless of its active flag
    pub async fn get(&self, id: i64) -> Result<Option<Software>> {
        let query = format!("{} WHERE s.id = ?", SELECT_SOFTWARE);

        sqlx::query_as::<_, Software>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get software {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    /// Get an entry by ID only if it is publicly visible
    pub async fn get_active(&self, id: i64) -> Result<Option<Software>> {
        let query = format!("{} WHERE s.id = ? AND s.is_active = TRUE", SELECT_SOFTWARE);

        sqlx::query_as::<_, Software>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get active software {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    /// Most recent entries uploaded by an account, any status
    pub async fn recent_by_uploader(&self, uploader_id: i64, limit: i64) -> Result<Vec<Software>> {
        let query = format!(
            "{} WHERE s.uploader_id = ? ORDER BY s.created_at DESC, s.id DESC LIMIT ?",
            SELECT_SOFTWARE
        );

        sqlx::query_as::<_, Software>(&query)
            .bind(uploader_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list uploads of account {}: {:?}", uploader_id, e);
                AppError::Database(e)
            })
    }

    // =========================================================================
    // DOWNLOAD COUNTER
    // =========================================================================

    /// Add one download to an active entry in a single-row update.
    ///
    /// Returns false when the entry vanished or was deactivated meanwhile. The update
    /// timestamps are left alone.
    pub async fn record_download(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE software SET download_count = download_count + 1 WHERE id = ? AND is_active = TRUE",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to record download of {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        Ok(result.rows_affected() == 1)
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    pub async fn create(&self, new: NewSoftware) -> Result<Software> {
        let now = Utc::now();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO software (
                title, description, version, category_id, uploader_id,
                file_path, thumbnail_path, download_count, is_active,
                upload_date, update_date, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.version)
        .bind(new.category_id)
        .bind(new.uploader_id)
        .bind(&new.file_path)
        .bind(&new.thumbnail_path)
        .bind(new.is_active)
        .bind(now)
        .bind(now)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create software: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Software created: id={}, title={}", id, new.title);

        self.get(id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Software {} missing after insert", id)))
    }

    /// Save edited fields; refreshes the update timestamps, keeps uploader and upload date
    pub async fn update(&self, id: i64, changes: SoftwareChanges) -> Result<Software> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE software
            SET title = ?, description = ?, version = ?, category_id = ?,
                file_path = ?, thumbnail_path = ?, is_active = ?,
                update_date = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(&changes.version)
        .bind(changes.category_id)
        .bind(&changes.file_path)
        .bind(&changes.thumbnail_path)
        .bind(changes.is_active)
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update software {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Software {} not found", id)));
        }

        tracing::info!("Software updated: id={}, title={}", id, changes.title);

        self.get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Software {} not found", id)))
    }

    /// Remove an entry, returning it as it was just before removal
    pub async fn delete(&self, id: i64) -> Result<Software> {
        let software = self
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Software {} not found", id)))?;

        sqlx::query("DELETE FROM software WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete software {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        tracing::info!("Software deleted: id={}, title={}", id, software.title);

        Ok(software)
    }

    /// Flip the active flag once and return the saved entry
    pub async fn toggle_active(&self, id: i64) -> Result<Software> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE software
            SET is_active = NOT is_active, update_date = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to toggle software {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Software {} not found", id)));
        }

        let software = self
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Software {} not found", id)))?;

        tracing::info!(
            "Software {} is now {}",
            software.id,
            if software.is_active { "active" } else { "inactive" }
        );

        Ok(software)
    }
}
