use std::sync::Arc;

use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::admin::dtos::{SoftwareDetailsDto, SoftwareSubmission, UploadedFile};
use crate::features::categories::CategoryService;
use crate::features::software::models::{NewSoftware, Software, SoftwareChanges};
use crate::features::software::SoftwareService;
use crate::modules::storage::Storage;
use crate::shared::constants::{
    ALLOWED_THUMBNAIL_EXTENSIONS, SOFTWARE_FILES_DIR, SOFTWARE_THUMBNAILS_DIR,
};
use crate::shared::validation::{field_errors, file_extension, push_field_error, FieldErrors};

const REQUIRED: &str = "This field is required.";
const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";

/// Whether the form must carry a package file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// Catalog mutations performed by staff: validation, blob handling and persistence
pub struct AdminService {
    software: Arc<SoftwareService>,
    categories: Arc<CategoryService>,
    storage: Arc<dyn Storage>,
}

impl AdminService {
    pub fn new(
        software: Arc<SoftwareService>,
        categories: Arc<CategoryService>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        Self {
            software,
            categories,
            storage,
        }
    }

    // =========================================================================
    // VALIDATION
    // =========================================================================

    /// Field errors for a submission; empty when it can be saved
    pub async fn validate(&self, submission: &SoftwareSubmission, mode: FormMode) -> Result<FieldErrors> {
        let mut errors = match submission.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => field_errors(&e),
        };

        if submission.category.is_empty() {
            push_field_error(&mut errors, "category", REQUIRED);
        } else {
            let category = match submission.category_id() {
                Some(id) => self.categories.get_active(id).await?,
                None => None,
            };
            if category.is_none() {
                push_field_error(&mut errors, "category", INVALID_CHOICE);
            }
        }

        match &submission.file {
            None if mode == FormMode::Create => push_field_error(&mut errors, "file", REQUIRED),
            Some(file) if file.data.is_empty() => {
                push_field_error(&mut errors, "file", "The submitted file is empty.")
            }
            _ => {}
        }

        if let Some(thumbnail) = &submission.thumbnail {
            let allowed = file_extension(&thumbnail.file_name)
                .map(|ext| ALLOWED_THUMBNAIL_EXTENSIONS.contains(&ext.as_str()))
                .unwrap_or(false);

            if !allowed || thumbnail.data.is_empty() {
                push_field_error(
                    &mut errors,
                    "thumbnail",
                    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.",
                );
            }
        }

        Ok(errors)
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Store the uploaded blobs and create the entry, bound to `uploader_id`
    pub async fn create(&self, submission: SoftwareSubmission, uploader_id: i64) -> Result<Software> {
        let file = submission
            .file
            .ok_or_else(|| AppError::Validation("A file is required".to_string()))?;

        let file_path = self.store(SOFTWARE_FILES_DIR, file).await?;
        let thumbnail_path = match submission.thumbnail {
            Some(thumbnail) => Some(self.store(SOFTWARE_THUMBNAILS_DIR, thumbnail).await?),
            None => None,
        };

        let new = NewSoftware {
            title: submission.title,
            description: submission.description,
            version: submission.version,
            category_id: submission.category.parse().ok(),
            uploader_id: Some(uploader_id),
            file_path: file_path.clone(),
            thumbnail_path: thumbnail_path.clone(),
            is_active: submission.is_active,
        };

        match self.software.create(new).await {
            Ok(software) => Ok(software),
            Err(e) => {
                self.discard(Some(&file_path)).await;
                self.discard(thumbnail_path.as_deref()).await;
                Err(e)
            }
        }
    }

    /// Save edits; new blobs replace the old ones, which are removed afterwards
    pub async fn update(&self, id: i64, submission: SoftwareSubmission) -> Result<Software> {
        let current = self
            .software
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Software {} not found", id)))?;

        let new_file = match submission.file {
            Some(file) => Some(self.store(SOFTWARE_FILES_DIR, file).await?),
            None => None,
        };
        let new_thumbnail = match submission.thumbnail {
            Some(thumbnail) => Some(self.store(SOFTWARE_THUMBNAILS_DIR, thumbnail).await?),
            None => None,
        };

        let changes = SoftwareChanges {
            title: submission.title,
            description: submission.description,
            version: submission.version,
            category_id: submission.category.parse().ok(),
            file_path: new_file.clone().unwrap_or_else(|| current.file_path.clone()),
            thumbnail_path: new_thumbnail.clone().or_else(|| current.thumbnail_path.clone()),
            is_active: submission.is_active,
        };

        match self.software.update(id, changes).await {
            Ok(software) => {
                if new_file.is_some() {
                    self.discard(Some(&current.file_path)).await;
                }
                if new_thumbnail.is_some() {
                    self.discard(current.thumbnail_path.as_deref()).await;
                }
                Ok(software)
            }
            Err(e) => {
                self.discard(new_file.as_deref()).await;
                self.discard(new_thumbnail.as_deref()).await;
                Err(e)
            }
        }
    }

    /// Delete the entry, then its blobs; returns the entry as it was
    pub async fn delete(&self, id: i64) -> Result<Software> {
        let removed = self.software.delete(id).await?;

        self.discard(Some(&removed.file_path)).await;
        self.discard(removed.thumbnail_path.as_deref()).await;

        Ok(removed)
    }

    /// Edit-dialog projection of any entry
    pub async fn details(&self, id: i64) -> Result<SoftwareDetailsDto> {
        let software = self
            .software
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("No software found matching the query".to_string()))?;

        Ok(SoftwareDetailsDto::new(software, self.storage.as_ref()))
    }

    // =========================================================================
    // BLOBS
    // =========================================================================

    async fn store(&self, prefix: &str, upload: UploadedFile) -> Result<String> {
        self.storage.save(prefix, &upload.file_name, upload.data).await
    }

    /// Best-effort blob removal; failures are only logged
    async fn discard(&self, key: Option<&str>) {
        let Some(key) = key.filter(|k| !k.is_empty()) else {
            return;
        };

        if let Err(e) = self.storage.delete(key).await {
            tracing::warn!("Failed to remove stored file {}: {}", key, e);
        }
    }
}
