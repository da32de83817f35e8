use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

/// Public category routes (no authentication required)
pub fn routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route("/api/categories/", get(handlers::list_categories))
        .with_state(service)
}

/// Category administration, mounted under `/adminpage`
///
/// Requires the session middleware to be applied by the caller
pub fn admin_routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route(
            "/categories/",
            get(handlers::category_admin_page).post(handlers::create_category),
        )
        .route(
            "/categories/toggle/{id}/",
            post(handlers::toggle_category),
        )
        .with_state(service)
}
