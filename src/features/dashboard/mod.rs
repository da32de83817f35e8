//! Admin dashboard: aggregate counters and trailing statistics.
//!
//! ## Endpoints (under `/adminpage`, staff or superuser only)
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/` | Counters, recent/popular entries, categories, review queue |
//! | GET | `/stats/` | Monthly creations, top uploaders, download averages |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use routes::admin_routes;
pub use services::DashboardService;
