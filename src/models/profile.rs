/// Profile model: the application-level entity owning an Account reference
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub position_name: Option<String>,
    /// Login of the owned Account record.
    pub account_login: String,
    pub phone: Option<String>,
    pub phone_verified: bool,
    pub email: Option<String>,
    pub email_verified: bool,
    pub verification_code: Option<String>,
    pub verification_code2: Option<String>,
    pub verification_code_failed_attempts: i32,
}

impl Profile {
    /// A guest profile for an auto-registered account.
    pub fn guest(account_login: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: "Anonymous user".to_string(),
            position_name: None,
            account_login: account_login.into(),
            phone: None,
            phone_verified: false,
            email: None,
            email_verified: false,
            verification_code: None,
            verification_code2: None,
            verification_code_failed_attempts: 0,
        }
    }

    /// Drop all phone-axis verification state, forcing the registration flow
    /// to restart from the beginning.
    pub fn reset_phone_verification(&mut self) {
        self.phone = None;
        self.phone_verified = false;
        self.verification_code = None;
        self.verification_code_failed_attempts = 0;
    }

    /// Drop all email-axis verification state.
    pub fn reset_email_verification(&mut self) {
        self.email = None;
        self.email_verified = false;
        self.verification_code = None;
        self.verification_code2 = None;
        self.verification_code_failed_attempts = 0;
    }
}

/// Projection of profile fields returned to the client after a successful
/// auth or verification step.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub position_name: Option<String>,
    pub name: String,
    pub phone: Option<String>,
    pub phone_verified: bool,
    pub email: Option<String>,
    pub email_verified: bool,
}

impl From<&Profile> for ProfileView {
    fn from(profile: &Profile) -> Self {
        Self {
            position_name: profile.position_name.clone(),
            name: profile.name.clone(),
            phone: profile.phone.clone(),
            phone_verified: profile.phone_verified,
            email: profile.email.clone(),
            email_verified: profile.email_verified,
        }
    }
}

/// Cache-busting value attached next to every profile payload.
pub fn preview_randomizer() -> u32 {
    Utc::now().timestamp_subsec_micros()
}
