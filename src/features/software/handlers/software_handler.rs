use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue},
    response::{Html, IntoResponse, Response},
};
use minijinja::context;

use crate::core::error::{AppError, PageResult};
use crate::features::categories::dtos::CategoryOptionDto;
use crate::features::categories::CategoryService;
use crate::features::software::dtos::{ListingQuery, SoftwareCardDto};
use crate::features::software::services::{
    normalize_search, parse_category_param, SoftwareFilter, SoftwareService,
};
use crate::modules::storage::Storage;
use crate::shared::constants::PUBLIC_PAGE_SIZE;
use crate::shared::templates;

/// State for the public software pages and API
#[derive(Clone)]
pub struct SoftwareState {
    pub software: Arc<SoftwareService>,
    pub categories: Arc<CategoryService>,
    pub storage: Arc<dyn Storage>,
}

/// 1-based page number; anything unparsable is a missing page
fn parse_page(raw: Option<&str>) -> Result<i64, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(1),
        Some(value) => value
            .parse::<i64>()
            .map_err(|_| AppError::NotFound(format!("Invalid page ({})", value))),
    }
}

/// Query string that keeps the current search/category across page links
fn filter_query_string(search: Option<&str>, category_id: Option<i64>) -> String {
    let mut parts = Vec::new();
    if let Some(search) = search {
        parts.push(format!("search={}", urlencoding::encode(search)));
    }
    if let Some(category_id) = category_id {
        parts.push(format!("category={}", category_id));
    }
    parts.join("&")
}

/// Paginated listing of active software
pub async fn software_list_page(
    State(state): State<SoftwareState>,
    Query(query): Query<ListingQuery>,
) -> PageResult<Html<String>> {
    let category_id = parse_category_param(query.category.as_deref())?;
    let page_number = parse_page(query.page.as_deref())?;
    let search = normalize_search(query.search.as_deref());

    let filter = SoftwareFilter::public(search.as_deref(), category_id);
    let page = state
        .software
        .list_page(&filter, page_number, PUBLIC_PAGE_SIZE)
        .await?
        .map(|s| SoftwareCardDto::new(s, state.storage.as_ref()));

    let categories: Vec<CategoryOptionDto> = state
        .categories
        .list_active()
        .await?
        .into_iter()
        .map(CategoryOptionDto::from)
        .collect();

    let html = templates::render(
        "software_list.html",
        context! {
            page => page,
            categories => categories,
            search_query => search.as_deref().unwrap_or(""),
            selected_category => category_id,
            filter_query => filter_query_string(search.as_deref(), category_id),
        },
    )?;

    Ok(Html(html))
}

/// Detail page of one active entry
pub async fn software_detail_page(
    State(state): State<SoftwareState>,
    Path(id): Path<i64>,
) -> PageResult<Html<String>> {
    let software = state
        .software
        .get_active(id)
        .await?
        .ok_or_else(|| AppError::NotFound("No software found matching the query".to_string()))?;

    let html = templates::render(
        "software_detail.html",
        context! { software => SoftwareCardDto::new(software, state.storage.as_ref()) },
    )?;

    Ok(Html(html))
}

/// Serve the package as an attachment and count the download.
///
/// Lookup, file presence and the blob read all happen before the counter moves, so
/// a failed download never changes it.
pub async fn download_software(
    State(state): State<SoftwareState>,
    Path(id): Path<i64>,
) -> PageResult<Response> {
    let software = state
        .software
        .get_active(id)
        .await?
        .ok_or_else(|| AppError::NotFound("No software found matching the query".to_string()))?;

    if !software.has_file() {
        return Err(AppError::NotFound("File not found".to_string()).into());
    }

    let data = state.storage.read(&software.file_path).await?;

    if !state.software.record_download(software.id).await? {
        return Err(AppError::NotFound("No software found matching the query".to_string()).into());
    }

    tracing::info!(
        "Download of software {} ({} bytes)",
        software.id,
        data.len()
    );

    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        software.file_name()
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/octet-stream"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        data,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use crate::shared::test_helpers::{SoftwareFixture, TestApp};

    #[tokio::test]
    async fn test_listing_shows_only_active_entries() {
        let app = TestApp::spawn().await;
        let cat = app.fx.category("Utilities", true).await;
        app.fx.software("Visible Tool", Some(cat), true, 0).await;
        app.fx.software("Hidden Tool", Some(cat), false, 0).await;

        let response = app.server.get("/").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let body = response.text();
        assert!(body.contains("Visible Tool"));
        assert!(!body.contains("Hidden Tool"));
        assert!(body.contains("Utilities"));
    }

    #[tokio::test]
    async fn test_listing_rejects_bad_category_and_page() {
        let app = TestApp::spawn().await;

        let response = app.server.get("/?category=tools").await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

        let response = app.server.get("/?page=2").await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

        let response = app.server.get("/?category=&search=").await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_detail_hides_inactive() {
        let app = TestApp::spawn().await;
        let active = app.fx.software("Shown", None, true, 0).await;
        let inactive = app.fx.software("Hidden", None, false, 0).await;

        let response = app.server.get(&format!("/software/{}/", active)).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.text().contains("Shown"));

        let response = app.server.get(&format!("/software/{}/", inactive)).await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_download_serves_file_and_counts() {
        let app = TestApp::spawn().await;
        let key = app.store_blob("software_files", "tool.zip", b"PK-data").await;
        let id = app
            .fx
            .insert_software(SoftwareFixture {
                file_path: key,
                download_count: 5,
                ..SoftwareFixture::new("Tool")
            })
            .await;

        for _ in 0..2 {
            let response = app.server.get(&format!("/software/{}/download/", id)).await;
            assert_eq!(response.status_code(), StatusCode::OK);
            assert_eq!(response.as_bytes().as_ref(), b"PK-data");

            let headers = response.headers();
            assert_eq!(headers[header::CONTENT_TYPE], "application/octet-stream");
            assert_eq!(
                headers[header::CONTENT_DISPOSITION],
                "attachment; filename=\"tool.zip\""
            );
        }

        assert_eq!(app.download_count(id).await, 7);
    }

    #[tokio::test]
    async fn test_failed_downloads_do_not_count() {
        let app = TestApp::spawn().await;
        let key = app.store_blob("software_files", "tool.zip", b"x").await;

        let inactive = app
            .fx
            .insert_software(SoftwareFixture {
                file_path: key,
                is_active: false,
                ..SoftwareFixture::new("Inactive")
            })
            .await;
        let fileless = app
            .fx
            .insert_software(SoftwareFixture {
                file_path: String::new(),
                ..SoftwareFixture::new("Fileless")
            })
            .await;
        let missing_blob = app
            .fx
            .insert_software(SoftwareFixture {
                file_path: "software_files/gone.zip".to_string(),
                ..SoftwareFixture::new("Gone")
            })
            .await;

        for id in [inactive, fileless, missing_blob, 9999] {
            let response = app.server.get(&format!("/software/{}/download/", id)).await;
            assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        }

        assert_eq!(app.download_count(inactive).await, 0);
        assert_eq!(app.download_count(fileless).await, 0);
        assert_eq!(app.download_count(missing_blob).await, 0);
    }

    #[test]
    fn test_parse_page() {
        assert_eq!(parse_page(None).unwrap(), 1);
        assert_eq!(parse_page(Some("3")).unwrap(), 3);
        assert!(matches!(parse_page(Some("last")), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_filter_query_string() {
        assert_eq!(filter_query_string(None, None), "");
        assert_eq!(
            filter_query_string(Some("photo editor"), Some(2)),
            "search=photo%20editor&category=2"
        );
    }
}
