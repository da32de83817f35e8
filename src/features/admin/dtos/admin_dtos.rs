use axum::extract::Multipart;
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;
use validator::Validate;

use crate::core::error::AppError;
use crate::features::software::models::Software;
use crate::modules::storage::Storage;

// =============================================================================
// LISTING
// =============================================================================

/// Query params for the admin software listing
#[derive(Debug, Default, Deserialize)]
pub struct AdminSoftwareQuery {
    /// `all` (default), `active` or `inactive`
    pub status: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
}

/// Row of the admin software listing
#[derive(Debug, Clone, Serialize)]
pub struct AdminSoftwareRowDto {
    pub id: i64,
    pub title: String,
    pub version: String,
    pub category_name: Option<String>,
    pub uploader: Option<String>,
    pub download_count: i64,
    pub is_active: bool,
    pub has_file: bool,
    pub thumbnail_url: Option<String>,
    pub created_at: String,
}

impl AdminSoftwareRowDto {
    pub fn new(software: Software, storage: &dyn Storage) -> Self {
        Self {
            thumbnail_url: software.thumbnail_path.as_deref().map(|k| storage.url(k)),
            has_file: software.has_file(),
            created_at: software.created_at.format("%Y-%m-%d %H:%M").to_string(),
            id: software.id,
            title: software.title,
            version: software.version,
            category_name: software.category_name,
            uploader: software.uploader_username,
            download_count: software.download_count,
            is_active: software.is_active,
        }
    }
}

// =============================================================================
// DETAILS (AJAX)
// =============================================================================

/// Category reference in the details projection: the ID, or `""` when unset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum CategoryRef {
    Id(i64),
    Unset(String),
}

/// Read-only projection used to fill the edit dialog
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SoftwareDetailsDto {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub version: String,
    pub category: CategoryRef,
    pub is_active: bool,
    /// Empty when there is no thumbnail
    pub thumbnail_url: String,
    /// Base name of the stored package
    pub file_name: String,
    pub uploader: String,
    /// `%Y-%m-%d %H:%M`
    pub created_at: String,
    pub download_count: i64,
}

impl SoftwareDetailsDto {
    pub fn new(software: Software, storage: &dyn Storage) -> Self {
        Self {
            category: software
                .category_id
                .map(CategoryRef::Id)
                .unwrap_or_else(|| CategoryRef::Unset(String::new())),
            thumbnail_url: software
                .thumbnail_path
                .as_deref()
                .map(|k| storage.url(k))
                .unwrap_or_default(),
            file_name: software.file_name().to_string(),
            created_at: software.created_at.format("%Y-%m-%d %H:%M").to_string(),
            uploader: software.uploader_username.unwrap_or_default(),
            id: software.id,
            title: software.title,
            description: software.description,
            version: software.version,
            is_active: software.is_active,
            download_count: software.download_count,
        }
    }
}

// =============================================================================
// UPLOAD / EDIT FORM
// =============================================================================

/// A file part of the submitted form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Create/edit form as submitted (`multipart/form-data`).
///
/// Also serves as the form state when the page is re-rendered; file parts are never
/// echoed back.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct SoftwareSubmission {
    #[validate(length(min = 1, max = 200, message = "Ensure this value has 1 to 200 characters."))]
    pub title: String,

    #[validate(length(min = 1, message = "This field is required."))]
    pub description: String,

    #[validate(length(min = 1, max = 50, message = "Ensure this value has 1 to 50 characters."))]
    pub version: String,

    /// Raw category select value (an ID, or empty)
    pub category: String,

    pub is_active: bool,

    #[serde(skip)]
    pub file: Option<UploadedFile>,

    #[serde(skip)]
    pub thumbnail: Option<UploadedFile>,
}

impl Default for SoftwareSubmission {
    /// Blank create form: version "1.0", active checked
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            version: "1.0".to_string(),
            category: String::new(),
            is_active: true,
            file: None,
            thumbnail: None,
        }
    }
}

impl From<&Software> for SoftwareSubmission {
    /// Edit form prefilled from the stored entry
    fn from(s: &Software) -> Self {
        Self {
            title: s.title.clone(),
            description: s.description.clone(),
            version: s.version.clone(),
            category: s.category_id.map(|id| id.to_string()).unwrap_or_default(),
            is_active: s.is_active,
            file: None,
            thumbnail: None,
        }
    }
}

impl SoftwareSubmission {
    /// Read every form field from the multipart body.
    ///
    /// An unchecked `is_active` checkbox sends nothing, so it starts out false here.
    /// File inputs left empty by the browser arrive with an empty filename and are
    /// treated as absent.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut submission = Self {
            version: String::new(),
            is_active: false,
            ..Self::default()
        };

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            debug!("Failed to read multipart field: {}", e);
            AppError::BadRequest(format!("Failed to read multipart data: {}", e))
        })? {
            let field_name = field.name().unwrap_or("").to_string();

            match field_name.as_str() {
                "file" | "thumbnail" => {
                    let file_name = field.file_name().unwrap_or("").to_string();
                    let data = field.bytes().await.map_err(|e| {
                        AppError::BadRequest(format!("Failed to read {} data: {}", field_name, e))
                    })?;

                    if file_name.is_empty() {
                        continue;
                    }

                    let upload = Some(UploadedFile {
                        file_name,
                        data: data.to_vec(),
                    });
                    if field_name == "file" {
                        submission.file = upload;
                    } else {
                        submission.thumbnail = upload;
                    }
                }
                "title" | "description" | "version" | "category" | "is_active" => {
                    let text = field.text().await.map_err(|e| {
                        AppError::BadRequest(format!("Failed to read {} field: {}", field_name, e))
                    })?;

                    match field_name.as_str() {
                        "title" => submission.title = text.trim().to_string(),
                        "description" => submission.description = text.trim().to_string(),
                        "version" => submission.version = text.trim().to_string(),
                        "category" => submission.category = text.trim().to_string(),
                        _ => submission.is_active = true,
                    }
                }
                _ => {
                    debug!("Ignoring unknown field: {}", field_name);
                }
            }
        }

        Ok(submission)
    }

    /// Category ID if the select holds a number
    pub fn category_id(&self) -> Option<i64> {
        self.category.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn software() -> Software {
        let created = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        Software {
            id: 3,
            title: "Tool".to_string(),
            description: "Does things".to_string(),
            version: "2.1".to_string(),
            category_id: None,
            category_name: None,
            uploader_id: None,
            uploader_username: None,
            file_path: "software_files/tool.zip".to_string(),
            thumbnail_path: None,
            download_count: 4,
            is_active: false,
            upload_date: created,
            update_date: created,
            created_at: created,
            updated_at: created,
        }
    }

    struct NoStorage;

    #[async_trait::async_trait]
    impl Storage for NoStorage {
        async fn save(&self, _: &str, _: &str, _: Vec<u8>) -> crate::core::error::Result<String> {
            unreachable!()
        }
        async fn read(&self, _: &str) -> crate::core::error::Result<Vec<u8>> {
            unreachable!()
        }
        async fn delete(&self, _: &str) -> crate::core::error::Result<()> {
            unreachable!()
        }
        fn url(&self, key: &str) -> String {
            format!("/media/{}", key)
        }
    }

    #[test]
    fn test_details_projection_without_relations() {
        let details = SoftwareDetailsDto::new(software(), &NoStorage);
        let json = serde_json::to_value(&details).unwrap();

        assert_eq!(json["category"], "");
        assert_eq!(json["thumbnail_url"], "");
        assert_eq!(json["uploader"], "");
        assert_eq!(json["file_name"], "tool.zip");
        assert_eq!(json["created_at"], "2024-03-09 14:05");
    }

    #[test]
    fn test_details_projection_with_relations() {
        let mut s = software();
        s.category_id = Some(7);
        s.thumbnail_path = Some("software_thumbnails/t.png".to_string());
        s.uploader_username = Some("alice".to_string());

        let json = serde_json::to_value(SoftwareDetailsDto::new(s, &NoStorage)).unwrap();
        assert_eq!(json["category"], 7);
        assert_eq!(json["thumbnail_url"], "/media/software_thumbnails/t.png");
        assert_eq!(json["uploader"], "alice");
    }

    #[test]
    fn test_submission_validation() {
        let ok = SoftwareSubmission {
            title: "Tool".to_string(),
            description: "Does things".to_string(),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let bad = SoftwareSubmission {
            title: "x".repeat(201),
            version: String::new(),
            ..Default::default()
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("description"));
        assert!(fields.contains_key("version"));
    }

    #[test]
    fn test_edit_form_prefill() {
        let form = SoftwareSubmission::from(&software());
        assert_eq!(form.category, "");
        assert!(!form.is_active);
        assert_eq!(form.category_id(), None);
    }
}
