//! Staff administration of catalog entries.
//!
//! ## Endpoints (all under `/adminpage`, staff or superuser only)
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET/POST | `/upload/` | Upload form / create an entry |
//! | GET | `/software/` | All entries, filter by `status`, `category`, `search` |
//! | GET/POST | `/software/edit/{id}/` | Edit form / save changes |
//! | POST | `/software/delete/{id}/` | Delete an entry and its files |
//! | POST | `/software/toggle/{id}/` | Flip the active flag (JSON, always 200) |
//! | GET | `/software/details/{id}/` | JSON projection for the edit dialog |
//!
//! Page routes send anonymous callers to the login page; the details route answers
//! 403 JSON instead.

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::AdminService;
