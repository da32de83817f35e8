mod dashboard_handler;

pub use dashboard_handler::{admin_home, admin_stats};
