use axum::response::Html;
use chrono::{Datelike, Utc};
use minijinja::context;

use crate::core::error::PageResult;
use crate::shared::templates;

fn render_static(template: &str) -> PageResult<Html<String>> {
    let html = templates::render(template, context! { current_year => Utc::now().year() })?;
    Ok(Html(html))
}

pub async fn privacy_policy() -> PageResult<Html<String>> {
    render_static("pages/privacy_policy.html")
}

pub async fn terms_of_service() -> PageResult<Html<String>> {
    render_static("pages/terms_of_service.html")
}

pub async fn contact_us() -> PageResult<Html<String>> {
    render_static("pages/contact_us.html")
}

pub async fn about_us() -> PageResult<Html<String>> {
    render_static("pages/about_us.html")
}
