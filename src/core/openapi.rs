use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::admin::{dtos as admin_dtos, handlers as admin_handlers};
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::software::{dtos as software_dtos, handlers as software_handlers};
use crate::shared::types::ToggleStatusResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Catalog (public)
        software_handlers::list_software,
        categories_handlers::list_categories,
        // Admin (AJAX)
        admin_handlers::toggle_software,
        admin_handlers::software_details,
        categories_handlers::toggle_category,
    ),
    components(
        schemas(
            // Shared
            ToggleStatusResponse,
            // Software
            software_dtos::SoftwareApiDto,
            software_dtos::SoftwareListResponse,
            // Categories
            categories_dtos::CategoryApiDto,
            categories_dtos::CategoryListResponse,
            // Admin
            admin_dtos::CategoryRef,
            admin_dtos::SoftwareDetailsDto,
        )
    ),
    tags(
        (name = "software", description = "Public software catalog"),
        (name = "categories", description = "Software categories (public)"),
        (name = "admin", description = "Catalog administration (staff only)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Software Portal API",
        version = "0.1.0",
        description = "JSON endpoints of the software download portal",
    )
)]
pub struct ApiDoc;

/// Adds the session token as a Bearer security scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
