use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};

use super::urlset::{download_priority, render_urlset, ChangeFreq, SitemapUrl};
use crate::core::error::PageResult;
use crate::features::categories::CategoryService;
use crate::features::pages::STATIC_PAGES;
use crate::features::software::services::SoftwareFilter;
use crate::features::software::SoftwareService;

const API_ENDPOINTS: &[&str] = &["/api/software/", "/api/categories/"];

#[derive(Clone)]
pub struct SitemapState {
    pub software: Arc<SoftwareService>,
    pub categories: Arc<CategoryService>,
    /// Absolute base without trailing slash
    pub site_url: String,
}

pub async fn sitemap(State(state): State<SitemapState>) -> PageResult<Response> {
    let now = Utc::now();
    let entries = state
        .software
        .list(&SoftwareFilter::public(None, None), None)
        .await?;

    // The catalog home leads the static section
    let mut urls: Vec<SitemapUrl> = std::iter::once("/")
        .chain(STATIC_PAGES.iter().map(|(path, _)| *path))
        .map(|path| SitemapUrl {
            location: path.to_string(),
            lastmod: now,
            changefreq: ChangeFreq::Weekly,
            priority: 0.8,
        })
        .collect();

    // Newest active entry per category
    let mut category_lastmod: BTreeMap<i64, DateTime<Utc>> = BTreeMap::new();
    for s in &entries {
        if let Some(category_id) = s.category_id {
            let newest = category_lastmod.entry(category_id).or_insert(s.updated_at);
            *newest = (*newest).max(s.updated_at);
        }

        urls.push(SitemapUrl {
            location: format!("/software/{}/", s.id),
            lastmod: s.updated_at,
            changefreq: ChangeFreq::Weekly,
            priority: download_priority(s.download_count),
        });
    }

    for category in state.categories.list_active().await? {
        if let Some(lastmod) = category_lastmod.get(&category.id) {
            urls.push(SitemapUrl {
                location: format!("/?category={}", category.id),
                lastmod: *lastmod,
                changefreq: ChangeFreq::Daily,
                priority: 0.7,
            });
        }
    }

    urls.extend(API_ENDPOINTS.iter().map(|path| SitemapUrl {
        location: path.to_string(),
        lastmod: now,
        changefreq: ChangeFreq::Daily,
        priority: 0.3,
    }));

    tracing::debug!("Sitemap generated with {} urls", urls.len());

    Ok((
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        render_urlset(&state.site_url, &urls),
    )
        .into_response())
}
