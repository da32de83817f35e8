use axum::{routing::get, Router};

use super::handlers;

/// Static pages (no state, no authentication)
pub fn routes() -> Router {
    Router::new()
        .route("/privacy-policy/", get(handlers::privacy_policy))
        .route("/terms-of-service/", get(handlers::terms_of_service))
        .route("/contact-us/", get(handlers::contact_us))
        .route("/about-us/", get(handlers::about_us))
}
