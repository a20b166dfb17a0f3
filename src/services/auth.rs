/// Authentication service: credential/token verification, token issue,
/// password changes. Stateless over the account store.
use std::sync::Arc;

use serde::Deserialize;

use crate::error::{AuthError, Result};
use crate::models::Account;
use crate::security;
use crate::store::AccountStore;

/// Auth-relevant fields extracted from a request.
///
/// A present `login` selects the credential path even when it is empty; the
/// empty string then fails `IncorrectLogin` rather than falling back to the
/// token.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthFields {
    pub login: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,
    #[serde(default)]
    pub use_prev_token: bool,
}

pub struct AuthService {
    accounts: Arc<dyn AccountStore>,
}

impl AuthService {
    pub fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self { accounts }
    }

    pub fn accounts(&self) -> &Arc<dyn AccountStore> {
        &self.accounts
    }

    /// Authenticate by credentials or token; credentials win when both are
    /// present.
    pub async fn authenticate(
        &self,
        credentials: Option<(&str, &str)>,
        token: Option<&str>,
    ) -> Result<Account> {
        if let Some((login, password)) = credentials {
            self.authenticate_by_credentials(login, password).await
        } else if let Some(token) = token {
            self.authenticate_by_token(token).await
        } else {
            Err(AuthError::NoDataForAuth)
        }
    }

    pub async fn authenticate_from_request(&self, fields: &AuthFields) -> Result<Account> {
        let credentials = fields
            .login
            .as_deref()
            .map(|login| (login, fields.password.as_deref().unwrap_or("")));
        self.authenticate(credentials, fields.token.as_deref())
            .await
    }

    pub async fn authenticate_by_credentials(
        &self,
        login: &str,
        password: &str,
    ) -> Result<Account> {
        let account = self
            .accounts
            .get_by_login(login)
            .await?
            .ok_or(AuthError::IncorrectLogin)?;

        if !account.password_matches(password) {
            return Err(AuthError::IncorrectPassword);
        }
        Ok(account)
    }

    pub async fn authenticate_by_token(&self, token: &str) -> Result<Account> {
        self.accounts
            .get_by_token(token)
            .await?
            .ok_or(AuthError::IncorrectToken)
    }

    /// Rotate the account's token: generate, persist, return.
    pub async fn issue_new_token(&self, account: &mut Account) -> Result<String> {
        let token = security::new_token();
        account.token = Some(token.clone());
        self.accounts.update(account).await?;
        tracing::info!(login = %account.login, "session token rotated");
        Ok(token)
    }

    /// Replace the account's password with a generated one and return the
    /// plaintext for out-of-band delivery. Never logged.
    pub async fn change_password(&self, login: &str) -> Result<String> {
        let mut account = self
            .accounts
            .get_by_login(login)
            .await?
            .ok_or(AuthError::IncorrectLogin)?;

        self.issue_new_token(&mut account).await?;

        let password = security::generate_password();
        account.set_password(&password);
        self.accounts.update(&account).await?;

        tracing::info!(login = %account.login, "password regenerated");
        Ok(password)
    }

    /// Replace the password with one chosen by the user.
    pub async fn set_new_password(
        &self,
        account: Option<Account>,
        current_password: &str,
        new_password: &str,
        confirm: &str,
    ) -> Result<()> {
        let mut account = account.ok_or(AuthError::IncorrectLogin)?;

        if !account.password_matches(current_password) {
            return Err(AuthError::IncorrectPassword);
        }
        if new_password != confirm {
            return Err(AuthError::NewPasswordsMismatch);
        }

        account.set_password(new_password);
        self.accounts.update(&account).await?;

        tracing::info!(login = %account.login, "password changed by user");
        Ok(())
    }
}
