/// Session gate: per-request authentication integration
///
/// Resolves the authenticated account for a request (or auto-registers a
/// guest), and owns the session-cookie contract. Redirects are values, not
/// faults; handlers turn them into HTTP responses.
use std::sync::Arc;

use axum_extra::extract::cookie::{Cookie, CookieJar};
use time::{Duration, OffsetDateTime};

use crate::error::{AuthError, Result};
use crate::models::{Account, Profile};
use crate::security;
use crate::services::{AuthFields, AuthService};
use crate::store::ProfileStore;

pub const SESSION_COOKIE: &str = "token";

/// What the gate decided for a request.
#[derive(Debug)]
pub enum SessionOutcome {
    Authenticated(Account),
    RedirectTo(String),
    /// An exempt path; no authentication was attempted.
    Anonymous,
}

/// Result of an explicit login submission.
#[derive(Debug)]
pub enum LoginOutcome {
    /// Normal flow: the caller should redirect here.
    Redirect(String),
    /// `use_prev_token` flow: authenticated without a page redirect.
    TokenReused,
}

pub struct SessionGate {
    auth: Arc<AuthService>,
    profiles: Option<Arc<dyn ProfileStore>>,
    root: String,
    cookie_ttl: Duration,
}

impl SessionGate {
    pub fn new(
        auth: Arc<AuthService>,
        profiles: Option<Arc<dyn ProfileStore>>,
        root: impl Into<String>,
        cookie_ttl_days: i64,
    ) -> Self {
        Self {
            auth,
            profiles,
            root: root.into(),
            cookie_ttl: Duration::days(cookie_ttl_days),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Paths that must stay reachable without a session.
    fn is_exempt(&self, path: &str) -> bool {
        let path = path.trim_end_matches('/');
        [
            format!("{}auth/login", self.root),
            format!("{}auth/auth", self.root),
            format!("{}auth/change_password", self.root),
        ]
        .iter()
        .any(|exempt| exempt.trim_end_matches('/') == path)
    }

    /// Merge the session cookie into the request fields; an explicit `token`
    /// field wins over the cookie.
    fn with_cookie_token(&self, fields: &AuthFields, jar: &CookieJar) -> AuthFields {
        let mut fields = fields.clone();
        if fields.token.is_none() {
            fields.token = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());
        }
        fields
    }

    /// Resolve the account behind a request.
    ///
    /// Only `NoDataForAuth` and `IncorrectToken` are intercepted here, to
    /// drive the auto-register-or-redirect decision; every other fault
    /// propagates to the boundary.
    pub async fn resolve_session(
        &self,
        path: &str,
        fields: &AuthFields,
        jar: CookieJar,
        allow_auto_register: bool,
    ) -> Result<(CookieJar, SessionOutcome)> {
        if self.is_exempt(path) {
            return Ok((jar, SessionOutcome::Anonymous));
        }

        let fields = self.with_cookie_token(fields, &jar);
        match self.auth.authenticate_from_request(&fields).await {
            Ok(account) => Ok((jar, SessionOutcome::Authenticated(account))),
            Err(AuthError::NoDataForAuth) | Err(AuthError::IncorrectToken) => {
                if allow_auto_register {
                    let (jar, account) = self.register_guest(jar).await?;
                    Ok((jar, SessionOutcome::Authenticated(account)))
                } else {
                    Ok((
                        jar,
                        SessionOutcome::RedirectTo(format!("{}auth/login/", self.root)),
                    ))
                }
            }
            Err(other) => Err(other),
        }
    }

    /// Synthesize a guest account with random credentials, persist a guest
    /// profile when a profile store is configured, and open a session for it.
    async fn register_guest(&self, jar: CookieJar) -> Result<(CookieJar, Account)> {
        let mut account =
            Account::new(security::generate_password(), &security::generate_password());
        self.auth.accounts().insert(&account).await?;

        if let Some(profiles) = &self.profiles {
            profiles.insert(&Profile::guest(&account.login)).await?;
        }

        let token = self.auth.issue_new_token(&mut account).await?;
        tracing::info!(login = %account.login, "guest account auto-registered");
        Ok((self.set_session_cookie(jar, &token), account))
    }

    /// Authenticate a login submission and open the session.
    ///
    /// On `NoDataForAuth`/`IncorrectToken` the stale cookie is cleared and
    /// the fault re-raised, so the jar comes back alongside the result.
    pub async fn perform_login(
        &self,
        fields: &AuthFields,
        jar: CookieJar,
    ) -> (CookieJar, Result<LoginOutcome>) {
        let fields = self.with_cookie_token(fields, &jar);
        match self.auth.authenticate_from_request(&fields).await {
            Ok(mut account) => {
                let (token, outcome) = match account.token.clone() {
                    Some(current) if fields.use_prev_token => {
                        (current, LoginOutcome::TokenReused)
                    }
                    _ => match self.auth.issue_new_token(&mut account).await {
                        Ok(token) => (token, LoginOutcome::Redirect(self.root.clone())),
                        Err(err) => return (jar, Err(err)),
                    },
                };
                let jar = self.set_session_cookie(jar, &token);
                (jar, Ok(outcome))
            }
            Err(err @ (AuthError::NoDataForAuth | AuthError::IncorrectToken)) => {
                (self.clear_session_cookie(jar), Err(err))
            }
            Err(other) => (jar, Err(other)),
        }
    }

    /// Close the session and send the caller back to the root.
    pub fn perform_logout(&self, jar: CookieJar) -> (CookieJar, String) {
        (self.clear_session_cookie(jar), self.root.clone())
    }

    /// Clear any stale cookie before the login form is rendered.
    pub fn show_login_form(&self, jar: CookieJar) -> CookieJar {
        self.clear_session_cookie(jar)
    }

    fn set_session_cookie(&self, jar: CookieJar, token: &str) -> CookieJar {
        let cookie = Cookie::build((SESSION_COOKIE, token.to_string()))
            .path("/")
            .expires(OffsetDateTime::now_utc() + self.cookie_ttl)
            .build();
        jar.add(cookie)
    }

    fn clear_session_cookie(&self, jar: CookieJar) -> CookieJar {
        // Cleared by contract: empty value, expiry 30 minutes in the past.
        let cookie = Cookie::build((SESSION_COOKIE, ""))
            .path("/")
            .expires(OffsetDateTime::now_utc() - Duration::minutes(30))
            .build();
        jar.add(cookie)
    }
}
