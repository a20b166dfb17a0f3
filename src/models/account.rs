/// Account model
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{AuthError, Result};
use crate::models::Settings;
use crate::security;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub login: String,
    pub password_hash: String,
    pub token: Option<String>,
    #[sqlx(json)]
    pub settings: Settings,
}

impl Account {
    /// Create an account from a login and a plaintext password.
    ///
    /// The password is digested immediately; the plaintext is never stored.
    pub fn new(login: impl Into<String>, password: &str) -> Self {
        Self {
            login: login.into(),
            password_hash: security::hash_secret(password),
            token: None,
            settings: Settings::default(),
        }
    }

    /// Replace the password, storing only its digest.
    pub fn set_password(&mut self, password: &str) {
        self.password_hash = security::hash_secret(password);
    }

    /// Check a submitted password against the stored digest.
    pub fn password_matches(&self, password: &str) -> bool {
        self.password_hash == security::hash_secret(password)
    }

    /// Validate the account before persisting.
    ///
    /// The login must be non-empty and the password digest must be neither
    /// empty nor the digest of the empty password.
    pub fn validate(&self) -> Result<()> {
        if self.login.is_empty() {
            return Err(AuthError::NoLoginForAccount);
        }
        if self.password_hash.is_empty() || self.password_hash == security::hash_secret("") {
            return Err(AuthError::NoPasswordForAccount);
        }
        Ok(())
    }
}
