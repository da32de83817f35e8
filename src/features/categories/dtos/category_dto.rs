use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::categories::models::{Category, CategoryWithCount};

/// Category entry in `GET /api/categories/`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryApiDto {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Number of active software entries in this category
    pub software_count: i64,
}

impl From<CategoryWithCount> for CategoryApiDto {
    fn from(c: CategoryWithCount) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            software_count: c.software_count,
        }
    }
}

/// Response body for `GET /api/categories/`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryListResponse {
    pub categories: Vec<CategoryApiDto>,
}

/// Category option for filter controls and form selects
#[derive(Debug, Clone, Serialize)]
pub struct CategoryOptionDto {
    pub id: i64,
    pub name: String,
}

impl From<Category> for CategoryOptionDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
        }
    }
}

/// Row on the admin category page
#[derive(Debug, Clone, Serialize)]
pub struct AdminCategoryDto {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub software_count: i64,
    pub created_at: String,
}

impl From<CategoryWithCount> for AdminCategoryDto {
    fn from(c: CategoryWithCount) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            is_active: c.is_active,
            software_count: c.software_count,
            created_at: c.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Query params for the admin category page
#[derive(Debug, Default, Deserialize)]
pub struct CategoryAdminQuery {
    pub search: Option<String>,
}

/// Form submitted to create a category
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CategoryForm {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// HTML checkbox: present ("on") when checked
    #[serde(default)]
    pub is_active: Option<String>,
}

impl CategoryForm {
    pub fn is_active(&self) -> bool {
        self.is_active.is_some()
    }
}
