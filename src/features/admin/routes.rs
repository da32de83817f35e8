use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::admin::handlers::{self, AdminState};
use crate::features::admin::services::AdminService;
use crate::features::categories::CategoryService;
use crate::features::software::SoftwareService;
use crate::modules::storage::Storage;

/// Software administration, mounted under `/adminpage`
///
/// Every handler checks `RequireCatalogAdmin`/`RequireCatalogAdminJson`; the session
/// middleware must be applied by the caller.
pub fn routes(
    software: Arc<SoftwareService>,
    categories: Arc<CategoryService>,
    admin: Arc<AdminService>,
    storage: Arc<dyn Storage>,
) -> Router {
    let state = AdminState {
        software,
        categories,
        admin,
        storage,
    };

    Router::new()
        .route(
            "/upload/",
            get(handlers::upload_page).post(handlers::upload_software),
        )
        .route("/software/", get(handlers::software_list_page))
        .route(
            "/software/edit/{id}/",
            get(handlers::edit_page).post(handlers::edit_software),
        )
        .route(
            "/software/delete/{id}/",
            post(handlers::delete_software),
        )
        .route(
            "/software/toggle/{id}/",
            post(handlers::toggle_software),
        )
        .route(
            "/software/details/{id}/",
            get(handlers::software_details),
        )
        .with_state(state)
}
