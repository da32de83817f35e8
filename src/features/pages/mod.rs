//! Static informational pages.
//!
//! | Method | Endpoint | Template |
//! |--------|----------|----------|
//! | GET | `/privacy-policy/` | `pages/privacy_policy.html` |
//! | GET | `/terms-of-service/` | `pages/terms_of_service.html` |
//! | GET | `/contact-us/` | `pages/contact_us.html` |
//! | GET | `/about-us/` | `pages/about_us.html` |

mod handlers;
pub mod routes;

/// (path, template) for every static page; also feeds the sitemap
pub const STATIC_PAGES: &[(&str, &str)] = &[
    ("/privacy-policy/", "pages/privacy_policy.html"),
    ("/terms-of-service/", "pages/terms_of_service.html"),
    ("/contact-us/", "pages/contact_us.html"),
    ("/about-us/", "pages/about_us.html"),
];
