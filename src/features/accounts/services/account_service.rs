use sqlx::SqlitePool;

use crate::core::error::{AppError, Result};
use crate::features::accounts::models::Account;

/// Service for account lookups
pub struct AccountService {
    pool: SqlitePool,
}

impl AccountService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get account by ID (active or not)
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Account>> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, username, email, is_staff, is_superuser, is_active, date_joined
            FROM accounts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get account {}: {:?}", id, e);
            AppError::Database(e)
        })
    }
}
