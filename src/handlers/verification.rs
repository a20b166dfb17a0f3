/// Phone/email verification flow handlers
use axum::{extract::State, Form, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::json;

use crate::error::{AuthError, Result};
use crate::models::profile::preview_randomizer;
use crate::models::{Account, Profile, ProfileView};
use crate::services::AuthFields;
use crate::session::SESSION_COOKIE;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PhoneRequest {
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmCodeRequest {
    pub verification_code: String,
}

#[derive(Debug, Deserialize)]
pub struct RecoveryCodesRequest {
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct DualCodeRequest {
    pub phone: String,
    pub vc1: String,
    pub vc2: String,
}

/// Resolve the account and profile behind the current session cookie.
pub(super) async fn current_profile(
    state: &AppState,
    jar: &CookieJar,
) -> Result<(Account, Profile)> {
    let fields = AuthFields {
        token: jar.get(SESSION_COOKIE).map(|c| c.value().to_string()),
        ..AuthFields::default()
    };
    let account = state.auth.authenticate_from_request(&fields).await?;
    let profile = state
        .profiles
        .get_by_account_login(&account.login)
        .await?
        .ok_or_else(|| AuthError::Store(format!("no profile for account {}", account.login)))?;
    Ok((account, profile))
}

fn profile_payload(view: ProfileView) -> Json<serde_json::Value> {
    Json(json!({
        "user": view,
        "preview_randomizer": preview_randomizer(),
    }))
}

/// Report the verification flags of a phone's registered owner.
pub async fn check_phone(
    State(state): State<AppState>,
    Form(payload): Form<PhoneRequest>,
) -> Result<Json<serde_json::Value>> {
    let status = state
        .verification
        .check_phone_registration(&payload.phone)
        .await?;
    Ok(Json(serde_json::to_value(status).unwrap_or_default()))
}

/// Fast registration, stage 1: claim the phone and send the code.
pub async fn registration_start(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(payload): Form<PhoneRequest>,
) -> Result<Json<serde_json::Value>> {
    let (_, mut profile) = current_profile(&state, &jar).await?;
    state
        .verification
        .start_registration(&mut profile, &payload.phone)
        .await?;
    Ok(Json(json!(true)))
}

/// Fast registration, stage 2: confirm the code.
pub async fn registration_confirm(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(payload): Form<ConfirmCodeRequest>,
) -> Result<Json<serde_json::Value>> {
    let (_, mut profile) = current_profile(&state, &jar).await?;
    let view = state
        .verification
        .confirm_registration(&mut profile, &payload.verification_code)
        .await?;
    Ok(profile_payload(view))
}

/// Password recovery: store the email and send one code per channel.
pub async fn send_recovery_codes(
    State(state): State<AppState>,
    Form(payload): Form<RecoveryCodesRequest>,
) -> Result<Json<serde_json::Value>> {
    state
        .verification
        .send_recovery_codes(&payload.phone, &payload.email)
        .await?;
    Ok(Json(json!(null)))
}

/// Password recovery: verify both codes and issue a new password.
pub async fn recover_password(
    State(state): State<AppState>,
    Form(payload): Form<DualCodeRequest>,
) -> Result<Json<serde_json::Value>> {
    state
        .verification
        .recover_password(&payload.phone, &payload.vc1, &payload.vc2)
        .await?;
    Ok(Json(json!(true)))
}

/// Confirm email ownership without touching the password.
pub async fn confirm_email(
    State(state): State<AppState>,
    Form(payload): Form<DualCodeRequest>,
) -> Result<Json<serde_json::Value>> {
    let view = state
        .verification
        .confirm_email_and_auth(&payload.phone, &payload.vc1, &payload.vc2)
        .await?;
    Ok(profile_payload(view))
}
