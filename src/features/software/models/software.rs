use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A catalog entry joined with its category and uploader display names
#[derive(Debug, Clone, FromRow)]
pub struct Software {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub version: String,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub uploader_id: Option<i64>,
    pub uploader_username: Option<String>,
    /// Storage key of the package; empty when no file is attached
    pub file_path: String,
    pub thumbnail_path: Option<String>,
    pub download_count: i64,
    pub is_active: bool,
    pub upload_date: DateTime<Utc>,
    pub update_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Software {
    pub fn has_file(&self) -> bool {
        !self.file_path.is_empty()
    }

    /// Base name of the stored package, as offered to downloaders
    pub fn file_name(&self) -> &str {
        self.file_path.rsplit('/').next().unwrap_or_default()
    }
}

/// Fields for a new catalog entry
#[derive(Debug, Clone)]
pub struct NewSoftware {
    pub title: String,
    pub description: String,
    pub version: String,
    pub category_id: Option<i64>,
    pub uploader_id: Option<i64>,
    pub file_path: String,
    pub thumbnail_path: Option<String>,
    pub is_active: bool,
}

/// Editable fields of an existing entry; the uploader and upload date never change
#[derive(Debug, Clone)]
pub struct SoftwareChanges {
    pub title: String,
    pub description: String,
    pub version: String,
    pub category_id: Option<i64>,
    pub file_path: String,
    pub thumbnail_path: Option<String>,
    pub is_active: bool,
}
