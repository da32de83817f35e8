use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use minijinja::context;
use serde_json::json;

use crate::core::error::{AppError, PageResult};
use crate::features::admin::dtos::{
    AdminSoftwareQuery, AdminSoftwareRowDto, SoftwareDetailsDto, SoftwareSubmission,
};
use crate::features::admin::services::{AdminService, FormMode};
use crate::features::auth::guards::{RequireCatalogAdmin, RequireCatalogAdminJson};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::categories::dtos::CategoryOptionDto;
use crate::features::categories::CategoryService;
use crate::features::software::dtos::SoftwareCardDto;
use crate::features::software::services::{parse_category_param, SoftwareFilter, StatusFilter};
use crate::features::software::SoftwareService;
use crate::modules::storage::Storage;
use crate::shared::constants::{FORM_ERROR_NOTICE, RECENT_UPLOADS_N};
use crate::shared::flash::{page_response, redirect_with_flash, Flash, IncomingFlash};
use crate::shared::templates;
use crate::shared::types::{activation_word, ToggleStatusResponse};
use crate::shared::validation::FieldErrors;

const SOFTWARE_LIST_PATH: &str = "/adminpage/software/";

/// State for the admin software pages
#[derive(Clone)]
pub struct AdminState {
    pub software: Arc<SoftwareService>,
    pub categories: Arc<CategoryService>,
    pub admin: Arc<AdminService>,
    pub storage: Arc<dyn Storage>,
}

// =============================================================================
// LISTING
// =============================================================================

/// All entries (any status) with status/category/search filters
pub async fn software_list_page(
    RequireCatalogAdmin(user): RequireCatalogAdmin,
    State(state): State<AdminState>,
    Query(query): Query<AdminSoftwareQuery>,
    flash: IncomingFlash,
) -> PageResult<Response> {
    let status: StatusFilter = query.status.as_deref().unwrap_or("all").parse()?;
    let category_id = parse_category_param(query.category.as_deref())?;
    let filter = SoftwareFilter::admin(query.search.as_deref(), category_id, status);

    let rows: Vec<AdminSoftwareRowDto> = state
        .software
        .list(&filter, None)
        .await?
        .into_iter()
        .map(|s| AdminSoftwareRowDto::new(s, state.storage.as_ref()))
        .collect();

    let categories = category_options(&state.categories).await?;
    let total_software = rows.len();

    let html = templates::render(
        "admin/software_list.html",
        context! {
            user => user,
            flash => &flash.0,
            nav => "software",
            software_list => rows,
            total_software => total_software,
            categories => categories,
            status_filter => status.as_str(),
            category_filter => category_id,
            search_query => filter.search.as_deref().unwrap_or(""),
        },
    )?;

    Ok(page_response(StatusCode::OK, html, &flash))
}

// =============================================================================
// UPLOAD / EDIT FORMS
// =============================================================================

async fn category_options(categories: &CategoryService) -> PageResult<Vec<CategoryOptionDto>> {
    Ok(categories
        .list_active()
        .await?
        .into_iter()
        .map(CategoryOptionDto::from)
        .collect())
}

/// What the form page shows besides the form values
struct FormPage<'a> {
    user: &'a AuthenticatedUser,
    mode: FormMode,
    /// Entry being edited
    editing: Option<SoftwareCardDto>,
    form: &'a SoftwareSubmission,
    errors: &'a FieldErrors,
}

async fn render_form(state: &AdminState, page: FormPage<'_>, flash: &IncomingFlash) -> PageResult<String> {
    let categories = category_options(&state.categories).await?;

    let (page_title, action) = match (&page.mode, &page.editing) {
        (FormMode::Edit, Some(s)) => (
            "Edit Software",
            format!("/adminpage/software/edit/{}/", s.id),
        ),
        _ => ("Upload Software", "/adminpage/upload/".to_string()),
    };

    let recent_uploads: Vec<SoftwareCardDto> = match page.mode {
        FormMode::Create => state
            .software
            .recent_by_uploader(page.user.account_id, RECENT_UPLOADS_N)
            .await?
            .into_iter()
            .map(|s| SoftwareCardDto::new(s, state.storage.as_ref()))
            .collect(),
        FormMode::Edit => Vec::new(),
    };

    let html = templates::render(
        "admin/software_form.html",
        context! {
            user => page.user,
            flash => &flash.0,
            nav => if page.mode == FormMode::Create { "upload" } else { "software" },
            page_title => page_title,
            action => action,
            is_edit => page.mode == FormMode::Edit,
            software => page.editing,
            form => page.form,
            selected_category => page.form.category_id(),
            errors => page.errors,
            categories => categories,
            recent_uploads => recent_uploads,
        },
    )?;

    Ok(html)
}

/// Re-render after failed validation: 422 with the notice shown inline
async fn render_invalid(state: &AdminState, page: FormPage<'_>) -> PageResult<Response> {
    let notice = IncomingFlash(Some(Flash::error(FORM_ERROR_NOTICE)));
    let html = render_form(state, page, &notice).await?;

    Ok(page_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        html,
        &IncomingFlash(None),
    ))
}

pub async fn upload_page(
    RequireCatalogAdmin(user): RequireCatalogAdmin,
    State(state): State<AdminState>,
    flash: IncomingFlash,
) -> PageResult<Response> {
    let form = SoftwareSubmission::default();
    let page = FormPage {
        user: &user,
        mode: FormMode::Create,
        editing: None,
        form: &form,
        errors: &FieldErrors::new(),
    };

    let html = render_form(&state, page, &flash).await?;
    Ok(page_response(StatusCode::OK, html, &flash))
}

pub async fn upload_software(
    RequireCatalogAdmin(user): RequireCatalogAdmin,
    State(state): State<AdminState>,
    multipart: Multipart,
) -> PageResult<Response> {
    let submission = SoftwareSubmission::from_multipart(multipart).await?;

    let errors = state.admin.validate(&submission, FormMode::Create).await?;
    if !errors.is_empty() {
        let page = FormPage {
            user: &user,
            mode: FormMode::Create,
            editing: None,
            form: &submission,
            errors: &errors,
        };
        return render_invalid(&state, page).await;
    }

    let software = state.admin.create(submission, user.account_id).await?;
    tracing::info!("{} uploaded software {}", user.username, software.id);

    Ok(redirect_with_flash(
        SOFTWARE_LIST_PATH,
        Flash::success(format!(
            "Software \"{}\" has been uploaded successfully!",
            software.title
        )),
    ))
}

pub async fn edit_page(
    RequireCatalogAdmin(user): RequireCatalogAdmin,
    State(state): State<AdminState>,
    Path(id): Path<i64>,
    flash: IncomingFlash,
) -> PageResult<Response> {
    let software = state
        .software
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("No software found matching the query".to_string()))?;

    let form = SoftwareSubmission::from(&software);
    let page = FormPage {
        user: &user,
        mode: FormMode::Edit,
        editing: Some(SoftwareCardDto::new(software, state.storage.as_ref())),
        form: &form,
        errors: &FieldErrors::new(),
    };

    let html = render_form(&state, page, &flash).await?;
    Ok(page_response(StatusCode::OK, html, &flash))
}

pub async fn edit_software(
    RequireCatalogAdmin(user): RequireCatalogAdmin,
    State(state): State<AdminState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> PageResult<Response> {
    let current = state
        .software
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("No software found matching the query".to_string()))?;

    let submission = SoftwareSubmission::from_multipart(multipart).await?;

    let errors = state.admin.validate(&submission, FormMode::Edit).await?;
    if !errors.is_empty() {
        let page = FormPage {
            user: &user,
            mode: FormMode::Edit,
            editing: Some(SoftwareCardDto::new(current, state.storage.as_ref())),
            form: &submission,
            errors: &errors,
        };
        return render_invalid(&state, page).await;
    }

    let software = state.admin.update(id, submission).await?;
    tracing::info!("{} updated software {}", user.username, software.id);

    Ok(redirect_with_flash(
        SOFTWARE_LIST_PATH,
        Flash::success(format!(
            "Software \"{}\" has been updated successfully!",
            software.title
        )),
    ))
}

// =============================================================================
// DELETE / TOGGLE / DETAILS
// =============================================================================

pub async fn delete_software(
    RequireCatalogAdmin(user): RequireCatalogAdmin,
    State(state): State<AdminState>,
    Path(id): Path<i64>,
) -> PageResult<Response> {
    let removed = state.admin.delete(id).await?;
    tracing::info!("{} deleted software {}", user.username, removed.id);

    Ok(redirect_with_flash(
        SOFTWARE_LIST_PATH,
        Flash::success(format!(
            "Software \"{}\" has been deleted successfully!",
            removed.title
        )),
    ))
}

/// Flip an entry's active flag (AJAX; always 200, failures in the body)
#[utoipa::path(
    post,
    path = "/adminpage/software/toggle/{id}/",
    params(
        ("id" = i64, Path, description = "Software ID")
    ),
    responses(
        (status = 200, description = "Toggle outcome", body = ToggleStatusResponse),
        (status = 303, description = "Not signed in, redirected to login")
    ),
    tag = "admin"
)]
pub async fn toggle_software(
    RequireCatalogAdmin(user): RequireCatalogAdmin,
    State(state): State<AdminState>,
    Path(id): Path<i64>,
) -> Json<ToggleStatusResponse> {
    let body = match state.software.toggle_active(id).await {
        Ok(software) => {
            tracing::info!(
                "{} toggled software {} to {}",
                user.username,
                software.id,
                software.is_active
            );
            ToggleStatusResponse::toggled(
                software.is_active,
                format!(
                    "Software \"{}\" has been {}.",
                    software.title,
                    activation_word(software.is_active)
                ),
            )
        }
        Err(e) => ToggleStatusResponse::failed(format!("Error updating software status: {}", e)),
    };

    Json(body)
}

/// Field projection of one entry for the edit dialog
#[utoipa::path(
    get,
    path = "/adminpage/software/details/{id}/",
    params(
        ("id" = i64, Path, description = "Software ID")
    ),
    responses(
        (status = 200, description = "Software details", body = SoftwareDetailsDto),
        (status = 403, description = "Permission denied"),
        (status = 404, description = "Software not found"),
        (status = 500, description = "Unexpected failure")
    ),
    tag = "admin"
)]
pub async fn software_details(
    RequireCatalogAdminJson(_user): RequireCatalogAdminJson,
    State(state): State<AdminState>,
    Path(id): Path<i64>,
) -> Response {
    match state.admin.details(id).await {
        Ok(details) => Json(details).into_response(),
        Err(e) => {
            let status = match e {
                AppError::NotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(json!({ "error": e.public_message() }))).into_response()
        }
    }
}
