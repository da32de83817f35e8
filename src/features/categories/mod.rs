//! Software categories.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/categories/` | No | Active categories with active software counts |
//! | GET | `/adminpage/categories/` | Staff | All categories, searchable |
//! | POST | `/adminpage/categories/` | Staff | Create a category |
//! | POST | `/adminpage/categories/toggle/{id}/` | Staff | Flip the active flag (JSON) |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::CategoryService;
