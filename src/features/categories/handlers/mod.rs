pub mod admin_category_handler;
pub mod category_handler;

pub use admin_category_handler::{
    __path_toggle_category, category_admin_page, create_category, toggle_category,
};
pub use category_handler::{__path_list_categories, list_categories};
