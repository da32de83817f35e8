use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Form, Json,
};
use minijinja::context;
use validator::Validate;

use crate::core::error::PageResult;
use crate::features::auth::guards::RequireCatalogAdmin;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::categories::dtos::{AdminCategoryDto, CategoryAdminQuery, CategoryForm};
use crate::features::categories::services::CategoryService;
use crate::shared::constants::FORM_ERROR_NOTICE;
use crate::shared::flash::{page_response, redirect_with_flash, Flash, IncomingFlash};
use crate::shared::templates;
use crate::shared::types::{activation_word, ToggleStatusResponse};
use crate::shared::validation::{field_errors, FieldErrors};

const CATEGORY_LIST_PATH: &str = "/adminpage/categories/";

async fn render_category_page(
    service: &CategoryService,
    user: &AuthenticatedUser,
    search: Option<&str>,
    form: &CategoryForm,
    errors: &FieldErrors,
    flash: &IncomingFlash,
) -> PageResult<String> {
    let categories: Vec<AdminCategoryDto> = service
        .list_with_counts(false, search)
        .await?
        .into_iter()
        .map(AdminCategoryDto::from)
        .collect();

    let html = templates::render(
        "admin/category_list.html",
        context! {
            user => user,
            flash => &flash.0,
            nav => "categories",
            categories => categories,
            search_query => search.unwrap_or(""),
            form => form,
            form_is_active => form.is_active(),
            errors => errors,
        },
    )?;

    Ok(html)
}

/// All categories, active and inactive, with a create form
pub async fn category_admin_page(
    RequireCatalogAdmin(user): RequireCatalogAdmin,
    State(service): State<Arc<CategoryService>>,
    Query(query): Query<CategoryAdminQuery>,
    flash: IncomingFlash,
) -> PageResult<Response> {
    let form = CategoryForm {
        is_active: Some("on".to_string()),
        ..Default::default()
    };

    let html = render_category_page(
        &service,
        &user,
        query.search.as_deref(),
        &form,
        &FieldErrors::new(),
        &flash,
    )
    .await?;

    Ok(page_response(StatusCode::OK, html, &flash))
}

/// Create a category; invalid input re-renders the page with field errors
pub async fn create_category(
    RequireCatalogAdmin(user): RequireCatalogAdmin,
    State(service): State<Arc<CategoryService>>,
    Form(form): Form<CategoryForm>,
) -> PageResult<Response> {
    let form = CategoryForm {
        name: form.name.trim().to_string(),
        ..form
    };

    if let Err(e) = form.validate() {
        let notice = IncomingFlash(Some(Flash::error(FORM_ERROR_NOTICE)));
        let html =
            render_category_page(&service, &user, None, &form, &field_errors(&e), &notice).await?;

        // The notice is rendered inline, nothing to clear
        return Ok(page_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            html,
            &IncomingFlash(None),
        ));
    }

    let category = service.create(&form).await?;

    Ok(redirect_with_flash(
        CATEGORY_LIST_PATH,
        Flash::success(format!(
            "Category \"{}\" has been created successfully!",
            category.name
        )),
    ))
}

/// Flip a category's active flag (AJAX; always 200)
#[utoipa::path(
    post,
    path = "/adminpage/categories/toggle/{id}/",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Toggle outcome", body = ToggleStatusResponse),
        (status = 303, description = "Not signed in, redirected to login")
    ),
    tag = "admin"
)]
pub async fn toggle_category(
    RequireCatalogAdmin(user): RequireCatalogAdmin,
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<i64>,
) -> Json<ToggleStatusResponse> {
    let body = match service.toggle_active(id).await {
        Ok(category) => {
            tracing::info!(
                "{} toggled category {} to {}",
                user.username,
                category.id,
                category.is_active
            );
            ToggleStatusResponse::toggled(
                category.is_active,
                format!(
                    "Category \"{}\" has been {}.",
                    category.name,
                    activation_word(category.is_active)
                ),
            )
        }
        Err(e) => ToggleStatusResponse::failed(format!("Error updating category status: {}", e)),
    };

    Json(body)
}

#[cfg(test)]
mod tests {
    use axum::http::{header, StatusCode};
    use serde::Serialize;

    use crate::shared::constants::FORM_ERROR_NOTICE;
    use crate::shared::test_helpers::TestApp;
    use crate::shared::types::ToggleStatusResponse;

    #[derive(Serialize)]
    struct NewCategory<'a> {
        name: &'a str,
        description: &'a str,
        is_active: &'a str,
    }

    #[tokio::test]
    async fn test_page_lists_inactive_and_searches() {
        let app = TestApp::spawn().await;
        let token = app.token_for("staffer", true).await;
        app.fx.category("Graphics", true).await;
        app.fx.category("Legacy Games", false).await;

        let response = app
            .server
            .get("/adminpage/categories/")
            .authorization_bearer(&token)
            .await;
        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("Graphics"));
        assert!(html.contains("Legacy Games"));

        let response = app
            .server
            .get("/adminpage/categories/?search=legacy")
            .authorization_bearer(&token)
            .await;
        let html = response.text();
        assert!(html.contains("Legacy Games"));
        assert!(!html.contains("Graphics"));
    }

    #[tokio::test]
    async fn test_create_redirects_with_flash() {
        let app = TestApp::spawn().await;
        let token = app.token_for("staffer", true).await;

        let response = app
            .server
            .post("/adminpage/categories/")
            .authorization_bearer(&token)
            .form(&NewCategory {
                name: "  Audio  ",
                description: "Players and editors",
                is_active: "on",
            })
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/adminpage/categories/");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.contains("Category%20%22Audio%22%20has%20been%20created%20successfully"));

        let name: String = sqlx::query_scalar("SELECT name FROM categories")
            .fetch_one(&app.pool)
            .await
            .unwrap();
        assert_eq!(name, "Audio");
    }

    #[tokio::test]
    async fn test_create_blank_name_rerenders() {
        let app = TestApp::spawn().await;
        let token = app.token_for("staffer", true).await;

        let response = app
            .server
            .post("/adminpage/categories/")
            .authorization_bearer(&token)
            .form(&NewCategory {
                name: "   ",
                description: "",
                is_active: "on",
            })
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.text().contains(FORM_ERROR_NOTICE));
    }

    #[tokio::test]
    async fn test_toggle_category() {
        let app = TestApp::spawn().await;
        let token = app.token_for("staffer", true).await;
        let id = app.fx.category("Archived", false).await;

        let response = app
            .server
            .post(&format!("/adminpage/categories/toggle/{}/", id))
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        let body: ToggleStatusResponse = response.json();
        assert!(body.success);
        assert_eq!(body.is_active, Some(true));
        assert_eq!(body.message, "Category \"Archived\" has been activated.");
    }

    #[tokio::test]
    async fn test_toggle_requires_login() {
        let app = TestApp::spawn().await;
        let id = app.fx.category("Tools", true).await;

        let response = app
            .server
            .post(&format!("/adminpage/categories/toggle/{}/", id))
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
    }
}
