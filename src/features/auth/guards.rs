//! Authorization guards for the admin panel.
//!
//! Both guards apply the same predicate (`AuthenticatedUser::is_catalog_admin`); they differ
//! only in how a failure is reported to the transport:
//! - `RequireCatalogAdmin`: anonymous callers are redirected to the login page,
//!   signed-in callers without privilege get a 403 error page
//! - `RequireCatalogAdminJson`: any failure is a 403 `{"error": "Permission denied"}`

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;

use crate::core::error::{AppError, PageError};
use crate::features::auth::model::{AuthenticatedUser, LoginUrl};

const DEFAULT_LOGIN_URL: &str = "/admin/login/";

/// Guard for admin pages and form/AJAX actions.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireCatalogAdmin(user): RequireCatalogAdmin) { ... }
/// ```
pub struct RequireCatalogAdmin(pub AuthenticatedUser);

/// Why `RequireCatalogAdmin` refused a request
#[derive(Debug)]
pub enum AdminRejection {
    /// Not signed in: send to the login page, returning here afterwards
    Login { login_url: String, next: String },
    /// Signed in without staff privilege
    Forbidden,
}

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        match self {
            AdminRejection::Login { login_url, next } => {
                let target = format!("{}?next={}", login_url, urlencoding::encode(&next));
                Redirect::to(&target).into_response()
            }
            AdminRejection::Forbidden => PageError(AppError::Forbidden(
                "Staff access required".to_string(),
            ))
            .into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireCatalogAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(user) = parts.extensions.get::<AuthenticatedUser>() else {
            let login_url = parts
                .extensions
                .get::<LoginUrl>()
                .map(|l| l.0.clone())
                .unwrap_or_else(|| DEFAULT_LOGIN_URL.to_string());
            // Nested routers see a stripped URI; send back to the full path
            let uri = parts
                .extensions
                .get::<OriginalUri>()
                .map(|o| &o.0)
                .unwrap_or(&parts.uri);
            let next = uri
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_else(|| "/".to_string());

            return Err(AdminRejection::Login { login_url, next });
        };

        if !user.is_catalog_admin() {
            return Err(AdminRejection::Forbidden);
        }

        Ok(RequireCatalogAdmin(user.clone()))
    }
}

/// Guard for JSON endpoints that report permission failures as 403 bodies.
pub struct RequireCatalogAdminJson(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireCatalogAdminJson
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<AuthenticatedUser>() {
            Some(user) if user.is_catalog_admin() => Ok(RequireCatalogAdminJson(user.clone())),
            _ => Err((
                StatusCode::FORBIDDEN,
                Json(json!({ "error": "Permission denied" })),
            )
                .into_response()),
        }
    }
}
