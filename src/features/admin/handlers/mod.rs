pub mod software_admin_handler;

pub use software_admin_handler::{
    __path_software_details, __path_toggle_software, delete_software, edit_page, edit_software,
    software_details, software_list_page, toggle_software, upload_page, upload_software,
    AdminState,
};
