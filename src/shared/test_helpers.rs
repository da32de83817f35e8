//! Shared fixtures for database and HTTP tests.

use std::str::FromStr;
use std::sync::Arc;

use axum_test::TestServer;
use chrono::{DateTime, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::Fake;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tempfile::TempDir;

use crate::core::app::{build_router, AppServices};
use crate::core::config::{AppConfig, AuthConfig, StorageConfig};
use crate::features::auth::model::SessionClaims;
use crate::modules::storage::{LocalStorage, Storage};

/// Fresh in-memory database with the real migrations applied.
///
/// A single connection that never expires, since every new in-memory
/// connection would be a different, empty database.
pub async fn setup_test_db() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("in-memory options")
        .foreign_keys(true)
        .with_regexp();

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");

    pool
}

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        session_secret: "test-session-secret-0123456789".to_string(),
        login_url: "/admin/login/".to_string(),
    }
}

pub fn test_app_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_allowed_origins: vec!["*".to_string()],
        max_upload_size: 16 * 1024 * 1024,
        site_url: "https://example.test".to_string(),
    }
}

/// Sign an hour-long session token the way the account subsystem does
pub fn sign_session(config: &AuthConfig, account_id: i64) -> String {
    let now = jsonwebtoken::get_current_timestamp();
    let claims = SessionClaims {
        sub: account_id.to_string(),
        iat: now,
        exp: now + 3600,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.session_secret.as_bytes()),
    )
    .expect("session token")
}

/// Local storage in a throwaway directory; keep the `TempDir` alive for the test's duration
pub fn test_storage() -> (Arc<dyn Storage>, TempDir) {
    let dir = tempfile::tempdir().expect("temp media root");
    let storage = LocalStorage::new(&StorageConfig {
        media_root: dir.path().to_string_lossy().to_string(),
        media_url: "/media/".to_string(),
    });

    (Arc::new(storage), dir)
}

// =============================================================================
// ROW FIXTURES
// =============================================================================

/// An account row as mirrored from the account subsystem
#[derive(Debug, Clone)]
pub struct AccountFixture {
    pub username: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
}

impl AccountFixture {
    /// Active account joined now
    pub fn new(username: &str, is_staff: bool) -> Self {
        Self {
            username: username.to_string(),
            is_staff,
            is_superuser: false,
            is_active: true,
            date_joined: Utc::now(),
        }
    }
}

/// A software row to insert directly, bypassing the admin workflow
#[derive(Debug, Clone)]
pub struct SoftwareFixture {
    pub title: String,
    pub description: String,
    pub version: String,
    pub category_id: Option<i64>,
    pub uploader_id: Option<i64>,
    pub file_path: String,
    pub thumbnail_path: Option<String>,
    pub is_active: bool,
    pub download_count: i64,
    /// Also used as upload and update date
    pub created_at: DateTime<Utc>,
}

impl SoftwareFixture {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            description: format!("About {}", title),
            version: "1.0".to_string(),
            category_id: None,
            uploader_id: None,
            file_path: format!("software_files/{}.zip", title.to_lowercase().replace(' ', "_")),
            thumbnail_path: None,
            is_active: true,
            download_count: 0,
            created_at: Utc::now(),
        }
    }
}

pub struct Fixtures {
    pool: SqlitePool,
}

impl Fixtures {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Active account joined now
    pub async fn account(&self, username: &str, is_staff: bool) -> i64 {
        self.insert_account(AccountFixture::new(username, is_staff)).await
    }

    pub async fn insert_account(&self, a: AccountFixture) -> i64 {
        let email: String = SafeEmail().fake();

        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO accounts (username, email, is_staff, is_superuser, is_active, date_joined)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&a.username)
        .bind(email)
        .bind(a.is_staff)
        .bind(a.is_superuser)
        .bind(a.is_active)
        .bind(a.date_joined)
        .fetch_one(&self.pool)
        .await
        .expect("insert account")
    }

    pub async fn category(&self, name: &str, is_active: bool) -> i64 {
        let now = Utc::now();

        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO categories (name, description, is_active, created_at, updated_at)
            VALUES (?, '', ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(is_active)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .expect("insert category")
    }

    pub async fn software(
        &self,
        title: &str,
        category_id: Option<i64>,
        is_active: bool,
        download_count: i64,
    ) -> i64 {
        self.insert_software(SoftwareFixture {
            category_id,
            is_active,
            download_count,
            ..SoftwareFixture::new(title)
        })
        .await
    }

    pub async fn insert_software(&self, s: SoftwareFixture) -> i64 {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO software (
                title, description, version, category_id, uploader_id, file_path,
                thumbnail_path, download_count, is_active,
                upload_date, update_date, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&s.title)
        .bind(&s.description)
        .bind(&s.version)
        .bind(s.category_id)
        .bind(s.uploader_id)
        .bind(&s.file_path)
        .bind(&s.thumbnail_path)
        .bind(s.download_count)
        .bind(s.is_active)
        .bind(s.created_at)
        .bind(s.created_at)
        .bind(s.created_at)
        .bind(s.created_at)
        .fetch_one(&self.pool)
        .await
        .expect("insert software")
    }
}

// =============================================================================
// HTTP
// =============================================================================

/// The assembled router over an in-memory database and a temporary media root
pub struct TestApp {
    pub server: TestServer,
    pub fx: Fixtures,
    pub pool: SqlitePool,
    pub storage: Arc<dyn Storage>,
    _media: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let pool = setup_test_db().await;
        let (storage, media) = test_storage();

        let services = AppServices::new(pool.clone(), &test_auth_config(), Arc::clone(&storage));
        let router = build_router(services, &test_app_config());

        Self {
            server: TestServer::new(router).expect("test server"),
            fx: Fixtures::new(pool.clone()),
            pool,
            storage,
            _media: media,
        }
    }

    /// Write a blob to the media root and return its key
    pub async fn store_blob(&self, prefix: &str, name: &str, data: &[u8]) -> String {
        self.storage
            .save(prefix, name, data.to_vec())
            .await
            .expect("store blob")
    }

    pub async fn download_count(&self, id: i64) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT download_count FROM software WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .expect("download count")
    }

    /// Create an account and sign a session token for it
    pub async fn token_for(&self, username: &str, is_staff: bool) -> String {
        let id = self.fx.account(username, is_staff).await;
        sign_session(&test_auth_config(), id)
    }
}
