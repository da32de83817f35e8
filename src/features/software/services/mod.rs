mod filter;
mod software_service;

pub use filter::{normalize_search, parse_category_param, SoftwareFilter, StatusFilter};
pub use software_service::SoftwareService;
