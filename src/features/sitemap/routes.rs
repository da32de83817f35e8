use axum::{routing::get, Router};
use std::sync::Arc;

use super::handler::{self, SitemapState};
use crate::features::categories::CategoryService;
use crate::features::software::SoftwareService;

pub fn routes(
    software: Arc<SoftwareService>,
    categories: Arc<CategoryService>,
    site_url: String,
) -> Router {
    Router::new()
        .route("/sitemap.xml", get(handler::sitemap))
        .with_state(SitemapState {
            software,
            categories,
            site_url,
        })
}
