/// Entries per page on the public listing
pub const PUBLIC_PAGE_SIZE: i64 = 12;

/// Maximum number of entries returned by the JSON software endpoint
pub const API_RESULT_LIMIT: i64 = 20;

/// Size of the "top N" lists on the admin dashboard
pub const DASHBOARD_TOP_N: i64 = 10;

/// Number of inactive entries surfaced for review on the dashboard
pub const DASHBOARD_REVIEW_N: i64 = 5;

/// Number of the acting account's uploads shown next to the upload form
pub const RECENT_UPLOADS_N: i64 = 5;

/// Trailing months charted on the stats page
pub const STATS_MONTHS: u32 = 12;

// =============================================================================
// STORAGE PREFIXES
// =============================================================================

pub const SOFTWARE_FILES_DIR: &str = "software_files";

pub const SOFTWARE_THUMBNAILS_DIR: &str = "software_thumbnails";

/// Thumbnail extensions accepted by the upload form
pub const ALLOWED_THUMBNAIL_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

// =============================================================================
// FORM MESSAGES
// =============================================================================

pub const FORM_ERROR_NOTICE: &str = "Please correct the errors below and try again.";
