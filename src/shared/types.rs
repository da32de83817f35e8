use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            errors,
        }
    }
}

/// Body returned by the AJAX toggle endpoints; always sent with HTTP 200
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ToggleStatusResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    pub message: String,
}

impl ToggleStatusResponse {
    pub fn toggled(is_active: bool, message: String) -> Self {
        Self {
            success: true,
            is_active: Some(is_active),
            message,
        }
    }

    pub fn failed(message: String) -> Self {
        Self {
            success: false,
            is_active: None,
            message,
        }
    }
}

/// "activated" / "deactivated" for toggle messages
pub fn activation_word(is_active: bool) -> &'static str {
    if is_active {
        "activated"
    } else {
        "deactivated"
    }
}

// =============================================================================
// PAGINATION
// =============================================================================

/// One page of a paginated listing
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Current page number (1-indexed)
    pub number: i64,
    pub num_pages: i64,
    pub total: i64,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, number: i64, page_size: i64, total: i64) -> Self {
        let num_pages = Self::page_count(total, page_size);
        Self {
            items,
            number,
            num_pages,
            total,
            has_previous: number > 1,
            has_next: number < num_pages,
        }
    }

    /// Convert the items, keeping the page bookkeeping
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            total: self.total,
            has_previous: self.has_previous,
            has_next: self.has_next,
        }
    }

    /// Number of pages for `total` items; an empty listing still has one page
    pub fn page_count(total: i64, page_size: i64) -> i64 {
        let page_size = page_size.max(1);
        ((total + page_size - 1) / page_size).max(1)
    }
}
