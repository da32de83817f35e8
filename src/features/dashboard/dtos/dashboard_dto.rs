use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

// =============================================================================
// ROWS
// =============================================================================

/// Entry as listed on the dashboard
#[derive(Debug, Clone, FromRow)]
pub struct DashboardSoftwareRow {
    pub id: i64,
    pub title: String,
    pub version: String,
    pub category_name: Option<String>,
    pub uploader_username: Option<String>,
    pub download_count: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSoftwareDto {
    pub id: i64,
    pub title: String,
    pub version: String,
    pub category_name: Option<String>,
    pub uploader: Option<String>,
    pub download_count: i64,
    pub is_active: bool,
    pub created_at: String,
}

impl From<DashboardSoftwareRow> for DashboardSoftwareDto {
    fn from(r: DashboardSoftwareRow) -> Self {
        Self {
            id: r.id,
            title: r.title,
            version: r.version,
            category_name: r.category_name,
            uploader: r.uploader_username,
            download_count: r.download_count,
            is_active: r.is_active,
            created_at: r.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Active category with its active software count
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CategoryStatDto {
    pub id: i64,
    pub name: String,
    pub software_count: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct RecentAccountRow {
    pub username: String,
    pub email: String,
    pub date_joined: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentAccountDto {
    pub username: String,
    pub email: String,
    pub date_joined: String,
}

impl From<RecentAccountRow> for RecentAccountDto {
    fn from(r: RecentAccountRow) -> Self {
        Self {
            username: r.username,
            email: r.email,
            date_joined: r.date_joined.format("%Y-%m-%d").to_string(),
        }
    }
}

// =============================================================================
// HOME
// =============================================================================

/// Everything shown on `/adminpage/`
#[derive(Debug, Clone, Serialize)]
pub struct DashboardHomeDto {
    pub total_software: i64,
    pub total_categories: i64,
    pub inactive_categories: i64,
    pub total_users: i64,
    pub total_downloads: i64,
    pub software_this_week: i64,
    pub software_this_month: i64,
    pub new_users_this_week: i64,
    pub pending_reviews: i64,
    pub recent_software: Vec<DashboardSoftwareDto>,
    pub popular_software: Vec<DashboardSoftwareDto>,
    pub category_stats: Vec<CategoryStatDto>,
    pub recent_users: Vec<RecentAccountDto>,
    pub inactive_software: Vec<DashboardSoftwareDto>,
}

// =============================================================================
// STATS
// =============================================================================

/// Creations in one calendar month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyStatDto {
    /// e.g. "March 2024"
    pub month: String,
    pub software_count: i64,
    pub user_count: i64,
}

/// Account ranked by number of active uploads
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UploaderStatDto {
    pub username: String,
    pub upload_count: i64,
    pub total_downloads: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DownloadStatsDto {
    pub total_downloads: i64,
    pub avg_downloads: f64,
}

/// Everything shown on `/adminpage/stats/`
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStatsDto {
    /// Oldest month first
    pub monthly_data: Vec<MonthlyStatDto>,
    pub top_uploaders: Vec<UploaderStatDto>,
    pub download_stats: DownloadStatsDto,
}
