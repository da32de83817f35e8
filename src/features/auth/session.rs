use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::sync::Arc;

use super::model::{AuthenticatedUser, SessionClaims};
use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::accounts::AccountService;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "session";

/// Validates HS256 session tokens issued by the account subsystem and resolves their account
pub struct SessionValidator {
    decoding_key: DecodingKey,
    login_url: String,
    accounts: Arc<AccountService>,
}

impl SessionValidator {
    pub fn new(config: &AuthConfig, accounts: Arc<AccountService>) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(config.session_secret.as_bytes()),
            login_url: config.login_url.clone(),
            accounts,
        }
    }

    pub fn login_url(&self) -> &str {
        &self.login_url
    }

    /// Decode a token and load its account; inactive or missing accounts are rejected
    pub async fn validate(&self, token: &str) -> Result<AuthenticatedUser> {
        let validation = Validation::new(Algorithm::HS256);

        let claims = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Unauthorized(e.to_string()))?
            .claims;

        let account_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::Unauthorized("Malformed session subject".to_string()))?;

        let account = self
            .accounts
            .get_by_id(account_id)
            .await?
            .filter(|a| a.is_active)
            .ok_or_else(|| AppError::Unauthorized("Account not found or inactive".to_string()))?;

        Ok(account.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{
        setup_test_db, sign_session, test_auth_config, AccountFixture, Fixtures,
    };

    #[tokio::test]
    async fn test_validate_resolves_account() {
        let pool = setup_test_db().await;
        let id = Fixtures::new(pool.clone()).account("staffer", true).await;

        let validator =
            SessionValidator::new(&test_auth_config(), Arc::new(AccountService::new(pool)));
        let token = sign_session(&test_auth_config(), id);
        let user = validator.validate(&token).await.unwrap();

        assert_eq!(user.account_id, id);
        assert_eq!(user.username, "staffer");
        assert!(user.is_catalog_admin());
    }

    #[tokio::test]
    async fn test_rejects_foreign_signature() {
        let pool = setup_test_db().await;
        let id = Fixtures::new(pool.clone()).account("staffer", true).await;
        let validator =
            SessionValidator::new(&test_auth_config(), Arc::new(AccountService::new(pool)));

        let mut other_config = test_auth_config();
        other_config.session_secret = "another-secret-entirely".to_string();
        let token = sign_session(&other_config, id);

        assert!(matches!(
            validator.validate(&token).await.unwrap_err(),
            AppError::Unauthorized(_)
        ));
    }

    #[tokio::test]
    async fn test_rejects_inactive_account() {
        let pool = setup_test_db().await;
        let id = Fixtures::new(pool.clone())
            .insert_account(AccountFixture {
                is_active: false,
                ..AccountFixture::new("gone", true)
            })
            .await;

        let validator =
            SessionValidator::new(&test_auth_config(), Arc::new(AccountService::new(pool)));
        let token = sign_session(&test_auth_config(), id);

        assert!(matches!(
            validator.validate(&token).await.unwrap_err(),
            AppError::Unauthorized(_)
        ));
    }

    #[tokio::test]
    async fn test_rejects_garbage_token() {
        let pool = setup_test_db().await;
        let validator =
            SessionValidator::new(&test_auth_config(), Arc::new(AccountService::new(pool)));

        assert!(validator.validate("not-a-token").await.is_err());
    }
}
