//! Session resolution and admin authorization.
//!
//! Sign-in itself belongs to the external account subsystem, which issues HS256 session
//! tokens signed with the shared `SESSION_SECRET`. This feature validates those tokens,
//! attaches the account to the request and gates the admin panel.

mod session;

pub mod guards;
pub mod model;

pub use session::{SessionValidator, SESSION_COOKIE};
