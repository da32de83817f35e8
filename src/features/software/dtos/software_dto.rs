use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::software::models::Software;
use crate::modules::storage::Storage;

/// Query params for the public listing page
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub page: Option<String>,
}

/// Query params for `GET /api/software/`
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SoftwareApiQuery {
    /// Case-insensitive match on title, description or version
    pub search: Option<String>,
    /// Category ID
    pub category: Option<String>,
}

/// Entry in `GET /api/software/`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SoftwareApiDto {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub version: String,
    /// Category name, null when uncategorized
    pub category: Option<String>,
    pub download_count: i64,
    /// RFC 3339 upload timestamp
    pub upload_date: String,
    /// Thumbnail URL, null when there is none
    pub thumbnail: Option<String>,
}

impl SoftwareApiDto {
    pub fn new(software: Software, storage: &dyn Storage) -> Self {
        Self {
            thumbnail: software.thumbnail_path.as_deref().map(|k| storage.url(k)),
            upload_date: software.upload_date.to_rfc3339(),
            id: software.id,
            title: software.title,
            description: software.description,
            version: software.version,
            category: software.category_name,
            download_count: software.download_count,
        }
    }
}

/// Response body for `GET /api/software/`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SoftwareListResponse {
    pub software: Vec<SoftwareApiDto>,
}

/// Entry as shown on the public pages
#[derive(Debug, Clone, Serialize)]
pub struct SoftwareCardDto {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub version: String,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub uploader: Option<String>,
    pub download_count: i64,
    pub upload_date: String,
    pub update_date: String,
    pub thumbnail_url: Option<String>,
    pub file_name: String,
    pub has_file: bool,
}

impl SoftwareCardDto {
    pub fn new(software: Software, storage: &dyn Storage) -> Self {
        Self {
            thumbnail_url: software.thumbnail_path.as_deref().map(|k| storage.url(k)),
            file_name: software.file_name().to_string(),
            has_file: software.has_file(),
            upload_date: software.upload_date.format("%B %-d, %Y").to_string(),
            update_date: software.update_date.format("%B %-d, %Y").to_string(),
            id: software.id,
            title: software.title,
            description: software.description,
            version: software.version,
            category_id: software.category_id,
            category_name: software.category_name,
            uploader: software.uploader_username,
            download_count: software.download_count,
        }
    }
}
