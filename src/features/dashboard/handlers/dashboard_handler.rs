use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Response};
use minijinja::context;

use crate::core::error::PageResult;
use crate::features::auth::guards::RequireCatalogAdmin;
use crate::features::dashboard::services::DashboardService;
use crate::shared::flash::{page_response, IncomingFlash};
use crate::shared::templates;

// ============================================================================
// Home
// ============================================================================

/// Headline counters, recent/popular entries and the review queue
pub async fn admin_home(
    RequireCatalogAdmin(user): RequireCatalogAdmin,
    State(service): State<Arc<DashboardService>>,
    flash: IncomingFlash,
) -> PageResult<Response> {
    let dashboard = service.home().await?;

    let html = templates::render(
        "admin/home.html",
        context! {
            user => user,
            flash => &flash.0,
            nav => "home",
            dashboard => dashboard,
        },
    )?;

    Ok(page_response(StatusCode::OK, html, &flash))
}

// ============================================================================
// Stats
// ============================================================================

pub async fn admin_stats(
    RequireCatalogAdmin(user): RequireCatalogAdmin,
    State(service): State<Arc<DashboardService>>,
    flash: IncomingFlash,
) -> PageResult<Response> {
    let stats = service.stats().await?;

    let html = templates::render(
        "admin/stats.html",
        context! {
            user => user,
            flash => &flash.0,
            nav => "stats",
            stats => stats,
        },
    )?;

    Ok(page_response(StatusCode::OK, html, &flash))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::shared::test_helpers::TestApp;

    #[tokio::test]
    async fn test_home_requires_login() {
        let app = TestApp::spawn().await;

        let response = app.server.get("/adminpage/").await;

        response.assert_status(StatusCode::SEE_OTHER);
        let location = response.headers()["location"].to_str().unwrap().to_string();
        assert_eq!(location, "/admin/login/?next=%2Fadminpage%2F");
    }

    #[tokio::test]
    async fn test_home_forbidden_for_regular_account() {
        let app = TestApp::spawn().await;
        let token = app.token_for("visitor", false).await;

        let response = app
            .server
            .get("/adminpage/")
            .authorization_bearer(token)
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_home_renders_counters() {
        let app = TestApp::spawn().await;
        let token = app.token_for("staffer", true).await;
        app.fx.software("Visible Tool", None, true, 42).await;
        app.fx.software("Awaiting Review", None, false, 0).await;

        let response = app
            .server
            .get("/adminpage/")
            .authorization_bearer(token)
            .await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("Visible Tool"));
        assert!(html.contains("Awaiting Review"));
        assert!(html.contains("42"));
    }

    #[tokio::test]
    async fn test_stats_page_lists_uploaders() {
        let app = TestApp::spawn().await;
        let token = app.token_for("staffer", true).await;
        let uploader = app.fx.account("prolific", false).await;
        app.fx
            .insert_software(crate::shared::test_helpers::SoftwareFixture {
                uploader_id: Some(uploader),
                download_count: 7,
                ..crate::shared::test_helpers::SoftwareFixture::new("Shared Tool")
            })
            .await;

        let response = app
            .server
            .get("/adminpage/stats/")
            .authorization_bearer(token)
            .await;

        response.assert_status_ok();
        assert!(response.text().contains("prolific"));
    }
}
