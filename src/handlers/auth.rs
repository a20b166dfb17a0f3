/// Login/logout and password-change handlers
use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
    Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::json;

use crate::error::{AuthError, Result};
use crate::models::ProfileView;
use crate::services::AuthFields;
use crate::session::{LoginOutcome, SessionOutcome};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct SetNewPasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub new_password2: String,
}

/// Application entry: runs the per-request session hook.
///
/// An authenticated (or freshly auto-registered) session gets its profile
/// back; anyone else is redirected to the login page.
pub async fn session_entry(
    State(state): State<AppState>,
    uri: axum::http::Uri,
    jar: CookieJar,
) -> Result<impl IntoResponse> {
    let (jar, outcome) = state
        .gate
        .resolve_session(uri.path(), &AuthFields::default(), jar, state.auto_register)
        .await?;

    let body = match outcome {
        SessionOutcome::Authenticated(account) => {
            let profile = state.profiles.get_by_account_login(&account.login).await?;
            Json(json!({
                "login": account.login,
                "user": profile.as_ref().map(ProfileView::from),
            }))
            .into_response()
        }
        SessionOutcome::RedirectTo(path) => Redirect::to(&path).into_response(),
        SessionOutcome::Anonymous => Json(json!(null)).into_response(),
    };
    Ok((jar, body))
}

/// Login page: clears any stale session cookie before the form renders.
pub async fn login_form(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = state.gate.show_login_form(jar);
    (jar, Json(json!({ "page": "login" })))
}

/// Login submission: authenticates and opens the session.
///
/// Returns `{"redirect_to": root}` in the normal flow, plain `true` when the
/// caller asked to keep its current token.
pub async fn auth_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(fields): Form<AuthFields>,
) -> impl IntoResponse {
    let (jar, outcome) = state.gate.perform_login(&fields, jar).await;
    let body = outcome.map(|outcome| match outcome {
        LoginOutcome::Redirect(path) => Json(json!({ "redirect_to": path })),
        LoginOutcome::TokenReused => Json(json!(true)),
    });
    (jar, body)
}

/// Logout: clears the session cookie and redirects to the root.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let (jar, root) = state.gate.perform_logout(jar);
    (jar, Redirect::to(&root))
}

/// Regenerate the password of an account and hand the plaintext back for
/// out-of-band delivery.
pub async fn change_password(
    State(state): State<AppState>,
    Form(payload): Form<ChangePasswordRequest>,
) -> Result<Json<serde_json::Value>> {
    let password = state.auth.change_password(&payload.login).await?;
    Ok(Json(json!({ "password": password })))
}

/// Change the password to one chosen by the user.
///
/// Requires a phone-verified profile behind the current session; the change
/// is confirmed out-of-band.
pub async fn set_new_password(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(payload): Form<SetNewPasswordRequest>,
) -> Result<Json<serde_json::Value>> {
    let (account, profile) = super::verification::current_profile(&state, &jar).await?;
    if !profile.phone_verified {
        return Err(AuthError::NotRegisteredYet);
    }

    state
        .auth
        .set_new_password(
            Some(account),
            &payload.current_password,
            &payload.new_password,
            &payload.new_password2,
        )
        .await?;

    state
        .verification
        .notify_password_changed(&profile, &payload.new_password)
        .await?;

    Ok(Json(json!(true)))
}
