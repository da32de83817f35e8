use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::features::categories::dtos::{CategoryApiDto, CategoryListResponse};
use crate::features::categories::services::CategoryService;

/// List active categories with their active software counts
#[utoipa::path(
    get,
    path = "/api/categories/",
    responses(
        (status = 200, description = "Active categories", body = CategoryListResponse),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
) -> Result<Json<CategoryListResponse>> {
    let categories = service.list_with_counts(true, None).await?;

    Ok(Json(CategoryListResponse {
        categories: categories.into_iter().map(CategoryApiDto::from).collect(),
    }))
}
