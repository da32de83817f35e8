use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::categories::CategoryService;
use crate::features::software::handlers::{self, SoftwareState};
use crate::features::software::services::SoftwareService;
use crate::modules::storage::Storage;

/// Public catalog routes: listing, detail, download and the JSON API
pub fn routes(
    software: Arc<SoftwareService>,
    categories: Arc<CategoryService>,
    storage: Arc<dyn Storage>,
) -> Router {
    let state = SoftwareState {
        software,
        categories,
        storage,
    };

    Router::new()
        .route("/", get(handlers::software_list_page))
        .route("/software/{id}/", get(handlers::software_detail_page))
        .route(
            "/software/{id}/download/",
            get(handlers::download_software),
        )
        .route("/api/software/", get(handlers::list_software))
        .with_state(state)
}
