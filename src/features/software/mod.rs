//! Public software catalog.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/` | No | Paginated listing (`search`, `category`, `page`) |
//! | GET | `/software/{id}/` | No | Detail page of an active entry |
//! | GET | `/software/{id}/download/` | No | Download the package, counting it |
//! | GET | `/api/software/` | No | Up to 20 active entries as JSON (`search`, `category`) |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::SoftwareService;
