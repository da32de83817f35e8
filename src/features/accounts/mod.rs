//! Local projection of the external account subsystem.
//!
//! Accounts are created and authenticated elsewhere; the catalog only needs
//! their identity, staff flags and join date (uploader display, dashboard stats,
//! admin authorization).

pub mod models;
pub mod services;

pub use services::AccountService;
