use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Database model for an account
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
}

impl Account {
    /// Staff or superuser privilege on an active account
    pub fn is_catalog_admin(&self) -> bool {
        self.is_active && (self.is_staff || self.is_superuser)
    }
}
