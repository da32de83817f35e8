//! HTML page rendering using Jinja2 syntax.
//!
//! Templates live in `templates/` and are embedded into the binary at compile time,
//! so a running server never depends on the working directory.

use minijinja::Environment;
use serde::Serialize;
use std::sync::OnceLock;

use crate::core::error::AppError;

/// Global template environment
static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

/// (name, source) for every page template
const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../templates/base.html")),
    ("error.html", include_str!("../../templates/error.html")),
    (
        "software_list.html",
        include_str!("../../templates/software_list.html"),
    ),
    (
        "software_detail.html",
        include_str!("../../templates/software_detail.html"),
    ),
    (
        "pages/privacy_policy.html",
        include_str!("../../templates/pages/privacy_policy.html"),
    ),
    (
        "pages/terms_of_service.html",
        include_str!("../../templates/pages/terms_of_service.html"),
    ),
    (
        "pages/contact_us.html",
        include_str!("../../templates/pages/contact_us.html"),
    ),
    (
        "pages/about_us.html",
        include_str!("../../templates/pages/about_us.html"),
    ),
    (
        "admin/base.html",
        include_str!("../../templates/admin/base.html"),
    ),
    (
        "admin/home.html",
        include_str!("../../templates/admin/home.html"),
    ),
    (
        "admin/stats.html",
        include_str!("../../templates/admin/stats.html"),
    ),
    (
        "admin/software_list.html",
        include_str!("../../templates/admin/software_list.html"),
    ),
    (
        "admin/software_form.html",
        include_str!("../../templates/admin/software_form.html"),
    ),
    (
        "admin/category_list.html",
        include_str!("../../templates/admin/category_list.html"),
    ),
];

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();

    for &(name, source) in TEMPLATES {
        if let Err(e) = env.add_template(name, source) {
            tracing::warn!("Failed to load template {}: {}", name, e);
        } else {
            tracing::debug!("Loaded template: {}", name);
        }
    }

    env
}

/// Get the global template environment
fn get_environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(init_environment)
}

/// Render a page template with a serializable context
pub fn render<S: Serialize>(template_name: &str, ctx: S) -> Result<String, AppError> {
    let template = get_environment()
        .get_template(template_name)
        .map_err(|e| AppError::Internal(format!("Template '{}' not found: {}", template_name, e)))?;

    template.render(ctx).map_err(|e| {
        AppError::Internal(format!(
            "Failed to render template '{}': {}",
            template_name, e
        ))
    })
}

/// Render the generic error page, degrading to plain text if the template itself fails
pub fn render_error_page(status: u16, title: &str, message: &str) -> String {
    render(
        "error.html",
        minijinja::context! { status => status, title => title, message => message },
    )
    .unwrap_or_else(|_| format!("{} {}: {}", status, title, message))
}
