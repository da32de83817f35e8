//! `GET /sitemap.xml` for search engines.
//!
//! Lists the static pages, every active entry, every active category that has
//! active entries and the public API endpoints, with absolute URLs built from
//! `SITE_URL`.

mod handler;
pub mod routes;
mod urlset;
