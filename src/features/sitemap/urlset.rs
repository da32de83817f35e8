use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Daily,
    Weekly,
}

impl ChangeFreq {
    fn as_str(&self) -> &'static str {
        match self {
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SitemapUrl {
    /// Site-relative path, e.g. `/software/3/`
    pub location: String,
    pub lastmod: DateTime<Utc>,
    pub changefreq: ChangeFreq,
    pub priority: f32,
}

/// Priority of an entry's page, tiered by popularity
pub fn download_priority(download_count: i64) -> f32 {
    match download_count {
        n if n > 1000 => 1.0,
        n if n > 500 => 0.9,
        n if n > 100 => 0.8,
        _ => 0.7,
    }
}

fn escape_xml(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Serialize `urls` as a sitemaps.org `urlset` document
pub fn render_urlset(site_url: &str, urls: &[SitemapUrl]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for url in urls {
        // Writing into a String cannot fail
        let _ = write!(
            xml,
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
            escape_xml(&format!("{}{}", site_url, url.location)),
            url.lastmod.to_rfc3339_opts(SecondsFormat::Secs, true),
            url.changefreq.as_str(),
            url.priority,
        );
    }

    xml.push_str("</urlset>\n");
    xml
}
