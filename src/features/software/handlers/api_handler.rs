use axum::{
    extract::{Query, State},
    Json,
};

use super::software_handler::SoftwareState;
use crate::core::error::Result;
use crate::features::software::dtos::{SoftwareApiDto, SoftwareApiQuery, SoftwareListResponse};
use crate::features::software::services::{parse_category_param, SoftwareFilter};
use crate::shared::constants::API_RESULT_LIMIT;

/// List up to 20 active software entries, newest first
#[utoipa::path(
    get,
    path = "/api/software/",
    params(SoftwareApiQuery),
    responses(
        (status = 200, description = "Matching software", body = SoftwareListResponse),
        (status = 400, description = "Invalid category")
    ),
    tag = "software"
)]
pub async fn list_software(
    State(state): State<SoftwareState>,
    Query(query): Query<SoftwareApiQuery>,
) -> Result<Json<SoftwareListResponse>> {
    let category_id = parse_category_param(query.category.as_deref())?;
    let filter = SoftwareFilter::public(query.search.as_deref(), category_id);

    let software = state
        .software
        .list(&filter, Some(API_RESULT_LIMIT))
        .await?
        .into_iter()
        .map(|s| SoftwareApiDto::new(s, state.storage.as_ref()))
        .collect();

    Ok(Json(SoftwareListResponse { software }))
}
