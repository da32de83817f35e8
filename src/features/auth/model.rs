use serde::{Deserialize, Serialize};

use crate::features::accounts::models::Account;

/// The account attached to a request by the session middleware
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub account_id: i64,
    pub username: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
}

impl AuthenticatedUser {
    /// Check if user may manage the catalog (staff or superuser, active)
    pub fn is_catalog_admin(&self) -> bool {
        self.is_active && (self.is_staff || self.is_superuser)
    }
}

impl From<Account> for AuthenticatedUser {
    fn from(a: Account) -> Self {
        Self {
            account_id: a.id,
            username: a.username,
            is_staff: a.is_staff,
            is_superuser: a.is_superuser,
            is_active: a.is_active,
        }
    }
}

/// Where anonymous admin requests are sent, attached to every request by the session middleware
#[derive(Debug, Clone)]
pub struct LoginUrl(pub String);

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Account ID
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}
