use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit, http::StatusCode, middleware::from_fn_with_state, routing::get,
    Json, Router,
};
use sqlx::SqlitePool;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::OpenApi;

use crate::core::config::{AppConfig, AuthConfig};
use crate::core::middleware;
use crate::core::openapi::ApiDoc;
use crate::features::accounts::AccountService;
use crate::features::admin::{routes as admin_routes, AdminService};
use crate::features::auth::SessionValidator;
use crate::features::categories::{routes as categories_routes, CategoryService};
use crate::features::dashboard::{routes as dashboard_routes, DashboardService};
use crate::features::pages::routes as pages_routes;
use crate::features::sitemap::routes as sitemap_routes;
use crate::features::software::{routes as software_routes, SoftwareService};
use crate::modules::storage::Storage;

/// Every service the router hands out, built once per process
#[derive(Clone)]
pub struct AppServices {
    pub validator: Arc<SessionValidator>,
    pub categories: Arc<CategoryService>,
    pub software: Arc<SoftwareService>,
    pub admin: Arc<AdminService>,
    pub dashboard: Arc<DashboardService>,
    pub storage: Arc<dyn Storage>,
}

impl AppServices {
    pub fn new(pool: SqlitePool, auth: &AuthConfig, storage: Arc<dyn Storage>) -> Self {
        let accounts = Arc::new(AccountService::new(pool.clone()));
        let validator = Arc::new(SessionValidator::new(auth, accounts));
        tracing::info!("Session validator initialized");

        let categories = Arc::new(CategoryService::new(pool.clone()));
        let software = Arc::new(SoftwareService::new(pool.clone()));
        let admin = Arc::new(AdminService::new(
            Arc::clone(&software),
            Arc::clone(&categories),
            Arc::clone(&storage),
        ));
        let dashboard = Arc::new(DashboardService::new(pool));
        tracing::info!("Catalog services initialized");

        Self {
            validator,
            categories,
            software,
            admin,
            dashboard,
            storage,
        }
    }
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Assemble the full application: public pages and API, the `/adminpage` panel and
/// the cross-cutting layers
pub fn build_router(services: AppServices, config: &AppConfig) -> Router {
    let admin = Router::new()
        .merge(categories_routes::admin_routes(Arc::clone(&services.categories)))
        .merge(admin_routes::routes(
            Arc::clone(&services.software),
            Arc::clone(&services.categories),
            Arc::clone(&services.admin),
            Arc::clone(&services.storage),
        ));

    let public = Router::new()
        .merge(software_routes::routes(
            Arc::clone(&services.software),
            Arc::clone(&services.categories),
            Arc::clone(&services.storage),
        ))
        .merge(categories_routes::routes(Arc::clone(&services.categories)))
        .merge(pages_routes::routes())
        .merge(sitemap_routes::routes(
            Arc::clone(&services.software),
            Arc::clone(&services.categories),
            config.site_url.clone(),
        ))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/health", get(health_check));

    Router::new()
        .nest("/adminpage", admin)
        .merge(dashboard_routes::admin_routes(Arc::clone(&services.dashboard)))
        .merge(public)
        // Resolves the session on every route; only the admin guards act on it
        .layer(from_fn_with_state(
            Arc::clone(&services.validator),
            middleware::session_middleware,
        ))
        .layer(DefaultBodyLimit::max(config.max_upload_size))
        .layer(
            ServiceBuilder::new()
                // Generate X-Request-Id using UUID v7 (or use client-provided one)
                .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(middleware::MakeSpanWithRequestId)
                        .on_request(DefaultOnRequest::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                // Propagate X-Request-Id to response headers
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(middleware::cors_layer(config.cors_allowed_origins.clone())),
        )
}
