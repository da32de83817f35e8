use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::dashboard::handlers;
use crate::features::dashboard::services::DashboardService;

/// Dashboard pages
///
/// Carries the full `/adminpage` paths: the panel root cannot be expressed as a
/// nested `/` route.
pub fn admin_routes(dashboard_service: Arc<DashboardService>) -> Router {
    Router::new()
        .route("/adminpage/", get(handlers::admin_home))
        .route("/adminpage/stats/", get(handlers::admin_stats))
        .with_state(dashboard_service)
}
