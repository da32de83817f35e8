pub mod api_handler;
pub mod software_handler;

pub use api_handler::{__path_list_software, list_software};
pub use software_handler::{
    download_software, software_detail_page, software_list_page, SoftwareState,
};
