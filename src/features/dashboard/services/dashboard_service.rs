use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::core::error::{AppError, Result};
use crate::features::dashboard::dtos::*;
use crate::shared::constants::{DASHBOARD_REVIEW_N, DASHBOARD_TOP_N, STATS_MONTHS};

const SELECT_DASHBOARD_SOFTWARE: &str = r#"
    SELECT s.id, s.title, s.version, c.name AS category_name,
           a.username AS uploader_username, s.download_count, s.is_active, s.created_at
    FROM software s
    LEFT JOIN categories c ON c.id = s.category_id
    LEFT JOIN accounts a ON a.id = s.uploader_id
"#;

/// Midnight (UTC) of the day `days` before `now`
pub fn days_ago_start(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    (now.date_naive() - Duration::days(days))
        .and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc()
}

/// The last `count` calendar months up to and including the current one, oldest first,
/// as (label, start, end-exclusive)
pub fn month_windows(now: DateTime<Utc>, count: u32) -> Vec<(String, DateTime<Utc>, DateTime<Utc>)> {
    let current = NaiveDate::from_ymd_opt(now.year(), now.month(), 1).unwrap_or_default();

    (0..count)
        .rev()
        .filter_map(|back| {
            let start = current.checked_sub_months(Months::new(back))?;
            let end = start.checked_add_months(Months::new(1))?;
            Some((
                start.format("%B %Y").to_string(),
                start.and_hms_opt(0, 0, 0)?.and_utc(),
                end.and_hms_opt(0, 0, 0)?.and_utc(),
            ))
        })
        .collect()
}

/// Read-only aggregates for the admin home and stats pages, recomputed per request
pub struct DashboardService {
    pool: SqlitePool,
}

impl DashboardService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn count(&self, query: &str, bounds: &[DateTime<Utc>]) -> Result<i64> {
        let mut q = sqlx::query_scalar::<_, i64>(query);
        for bound in bounds {
            q = q.bind(*bound);
        }

        q.fetch_one(&self.pool).await.map_err(|e| {
            tracing::error!("Failed to compute dashboard count: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn software_rows(&self, clause: &str, limit: i64) -> Result<Vec<DashboardSoftwareDto>> {
        let query = format!("{} {} LIMIT ?", SELECT_DASHBOARD_SOFTWARE, clause);

        let rows = sqlx::query_as::<_, DashboardSoftwareRow>(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list dashboard software: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(rows.into_iter().map(DashboardSoftwareDto::from).collect())
    }

    // ========================================================================
    // Home
    // ========================================================================

    pub async fn home(&self) -> Result<DashboardHomeDto> {
        let now = Utc::now();
        let week_ago = days_ago_start(now, 7);
        let month_ago = days_ago_start(now, 30);

        let category_stats = sqlx::query_as::<_, CategoryStatDto>(
            r#"
            SELECT c.id, c.name, COUNT(s.id) AS software_count
            FROM categories c
            LEFT JOIN software s ON s.category_id = c.id AND s.is_active = TRUE
            WHERE c.is_active = TRUE
            GROUP BY c.id
            ORDER BY software_count DESC, c.name
            LIMIT ?
            "#,
        )
        .bind(DASHBOARD_TOP_N)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to compute category stats: {:?}", e);
            AppError::Database(e)
        })?;

        let recent_users = sqlx::query_as::<_, RecentAccountRow>(
            r#"
            SELECT username, email, date_joined
            FROM accounts
            WHERE is_active = TRUE
            ORDER BY date_joined DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(DASHBOARD_TOP_N)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list recent accounts: {:?}", e);
            AppError::Database(e)
        })?
        .into_iter()
        .map(RecentAccountDto::from)
        .collect();

        Ok(DashboardHomeDto {
            total_software: self
                .count("SELECT COUNT(*) FROM software WHERE is_active = TRUE", &[])
                .await?,
            total_categories: self
                .count("SELECT COUNT(*) FROM categories WHERE is_active = TRUE", &[])
                .await?,
            inactive_categories: self
                .count("SELECT COUNT(*) FROM categories WHERE is_active = FALSE", &[])
                .await?,
            total_users: self
                .count("SELECT COUNT(*) FROM accounts WHERE is_active = TRUE", &[])
                .await?,
            total_downloads: self
                .count("SELECT COALESCE(SUM(download_count), 0) FROM software", &[])
                .await?,
            software_this_week: self
                .count(
                    "SELECT COUNT(*) FROM software WHERE is_active = TRUE AND created_at >= ?",
                    &[week_ago],
                )
                .await?,
            software_this_month: self
                .count(
                    "SELECT COUNT(*) FROM software WHERE is_active = TRUE AND created_at >= ?",
                    &[month_ago],
                )
                .await?,
            new_users_this_week: self
                .count(
                    "SELECT COUNT(*) FROM accounts WHERE is_active = TRUE AND date_joined >= ?",
                    &[week_ago],
                )
                .await?,
            pending_reviews: self
                .count("SELECT COUNT(*) FROM software WHERE is_active = FALSE", &[])
                .await?,
            recent_software: self
                .software_rows(
                    "WHERE s.is_active = TRUE ORDER BY s.created_at DESC, s.id DESC",
                    DASHBOARD_TOP_N,
                )
                .await?,
            popular_software: self
                .software_rows(
                    "WHERE s.is_active = TRUE ORDER BY s.download_count DESC, s.id DESC",
                    DASHBOARD_TOP_N,
                )
                .await?,
            category_stats,
            recent_users,
            inactive_software: self
                .software_rows(
                    "WHERE s.is_active = FALSE ORDER BY s.created_at DESC, s.id DESC",
                    DASHBOARD_REVIEW_N,
                )
                .await?,
        })
    }

    // ========================================================================
    // Stats
    // ========================================================================

    pub async fn stats(&self) -> Result<DashboardStatsDto> {
        let mut monthly_data = Vec::new();
        for (month, start, end) in month_windows(Utc::now(), STATS_MONTHS) {
            monthly_data.push(MonthlyStatDto {
                month,
                software_count: self
                    .count(
                        "SELECT COUNT(*) FROM software WHERE is_active = TRUE AND created_at >= ? AND created_at < ?",
                        &[start, end],
                    )
                    .await?,
                user_count: self
                    .count(
                        "SELECT COUNT(*) FROM accounts WHERE is_active = TRUE AND date_joined >= ? AND date_joined < ?",
                        &[start, end],
                    )
                    .await?,
            });
        }

        let top_uploaders = sqlx::query_as::<_, UploaderStatDto>(
            r#"
            SELECT a.username,
                   COUNT(s.id) AS upload_count,
                   COALESCE(SUM(s.download_count), 0) AS total_downloads
            FROM accounts a
            JOIN software s ON s.uploader_id = a.id AND s.is_active = TRUE
            GROUP BY a.id
            HAVING COUNT(s.id) > 0
            ORDER BY upload_count DESC, a.username
            LIMIT ?
            "#,
        )
        .bind(DASHBOARD_TOP_N)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to rank uploaders: {:?}", e);
            AppError::Database(e)
        })?;

        let active = self
            .count("SELECT COUNT(*) FROM software WHERE is_active = TRUE", &[])
            .await?;
        let total_downloads = self
            .count(
                "SELECT COALESCE(SUM(download_count), 0) FROM software WHERE is_active = TRUE",
                &[],
            )
            .await?;

        let avg_downloads = if active > 0 {
            total_downloads as f64 / active as f64
        } else {
            0.0
        };

        Ok(DashboardStatsDto {
            monthly_data,
            top_uploaders,
            download_stats: DownloadStatsDto {
                total_downloads,
                avg_downloads,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{setup_test_db, AccountFixture, Fixtures, SoftwareFixture};
    use chrono::TimeZone;

    #[test]
    fn test_month_windows_cross_year() {
        let now = Utc.with_ymd_and_hms(2024, 2, 15, 10, 0, 0).unwrap();
        let windows = month_windows(now, 12);

        assert_eq!(windows.len(), 12);
        assert_eq!(windows[0].0, "March 2023");
        assert_eq!(windows[11].0, "February 2024");
        assert_eq!(
            windows[11].1,
            Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            windows[11].2,
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );
        assert!(windows.windows(2).all(|w| w[0].2 == w[1].1));
    }

    #[test]
    fn test_days_ago_start() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 18, 30, 0).unwrap();
        assert_eq!(
            days_ago_start(now, 7),
            Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_home_counts() {
        let pool = setup_test_db().await;
        let fx = Fixtures::new(pool.clone());
        let tools = fx.category("Tools", true).await;
        fx.category("Old", false).await;
        let alice = fx.account("alice", true).await;

        fx.insert_software(SoftwareFixture {
            category_id: Some(tools),
            uploader_id: Some(alice),
            download_count: 10,
            ..SoftwareFixture::new("Fresh")
        })
        .await;
        fx.insert_software(SoftwareFixture {
            download_count: 4,
            created_at: Utc::now() - Duration::days(60),
            ..SoftwareFixture::new("Old Active")
        })
        .await;
        fx.insert_software(SoftwareFixture {
            download_count: 1,
            is_active: false,
            ..SoftwareFixture::new("Pending")
        })
        .await;

        let home = DashboardService::new(pool).home().await.unwrap();

        assert_eq!(home.total_software, 2);
        assert_eq!(home.total_categories, 1);
        assert_eq!(home.inactive_categories, 1);
        assert_eq!(home.total_users, 1);
        assert_eq!(home.total_downloads, 15);
        assert_eq!(home.software_this_week, 1);
        assert_eq!(home.software_this_month, 1);
        assert_eq!(home.new_users_this_week, 1);
        assert_eq!(home.pending_reviews, 1);
        assert_eq!(home.popular_software[0].title, "Fresh");
        assert_eq!(home.recent_software[0].title, "Fresh");
        assert_eq!(home.inactive_software[0].title, "Pending");
        assert_eq!(home.category_stats[0].name, "Tools");
        assert_eq!(home.category_stats[0].software_count, 1);
        assert_eq!(home.recent_users[0].username, "alice");
    }

    #[tokio::test]
    async fn test_stats_top_uploaders_and_average() {
        let pool = setup_test_db().await;
        let fx = Fixtures::new(pool.clone());
        let alice = fx.account("alice", true).await;
        let bob = fx.account("bob", true).await;
        fx.account("carol", true).await;

        for (title, uploader, downloads, active) in [
            ("A1", alice, 10, true),
            ("A2", alice, 20, true),
            ("B1", bob, 6, true),
            ("B2", bob, 100, false),
        ] {
            fx.insert_software(SoftwareFixture {
                uploader_id: Some(uploader),
                download_count: downloads,
                is_active: active,
                ..SoftwareFixture::new(title)
            })
            .await;
        }

        let stats = DashboardService::new(pool).stats().await.unwrap();

        let ranking: Vec<(String, i64, i64)> = stats
            .top_uploaders
            .into_iter()
            .map(|u| (u.username, u.upload_count, u.total_downloads))
            .collect();
        assert_eq!(
            ranking,
            vec![("alice".to_string(), 2, 30), ("bob".to_string(), 1, 6)]
        );

        assert_eq!(stats.download_stats.total_downloads, 36);
        assert!((stats.download_stats.avg_downloads - 12.0).abs() < f64::EPSILON);

        assert_eq!(stats.monthly_data.len(), 12);
        let current = stats.monthly_data.last().unwrap();
        assert_eq!(current.software_count, 3);
        assert_eq!(current.user_count, 3);
    }

    #[tokio::test]
    async fn test_stats_average_is_zero_without_software() {
        let pool = setup_test_db().await;
        Fixtures::new(pool.clone())
            .insert_account(AccountFixture {
                date_joined: Utc::now() - Duration::days(800),
                ..AccountFixture::new("old-timer", false)
            })
            .await;

        let stats = DashboardService::new(pool).stats().await.unwrap();

        assert_eq!(stats.download_stats.avg_downloads, 0.0);
        assert!(stats.top_uploaders.is_empty());
        assert!(stats.monthly_data.iter().all(|m| m.user_count == 0));
    }
}
