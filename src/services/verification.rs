/// Phone/email verification state machine
///
/// Drives the three code-guarded flows: fast registration, password
/// recovery and email confirmation. Codes are 4 digits; three mismatches
/// against one pending code are fatal and drop the axis's verification
/// state, forcing the flow to restart.
use std::sync::Arc;

use serde::Serialize;

use crate::error::{AuthError, Result};
use crate::models::{Profile, ProfileView};
use crate::notify::{Channel, Notifier};
use crate::phone;
use crate::security;
use crate::services::AuthService;
use crate::store::ProfileStore;

const MAX_CODE_ATTEMPTS: i32 = 3;

#[derive(Debug, Serialize)]
pub struct RegistrationStatus {
    pub email_verified: bool,
    pub phone_verified: bool,
}

pub struct VerificationService {
    auth: Arc<AuthService>,
    profiles: Arc<dyn ProfileStore>,
    notifier: Arc<dyn Notifier>,
    sms_sender: String,
}

impl VerificationService {
    pub fn new(
        auth: Arc<AuthService>,
        profiles: Arc<dyn ProfileStore>,
        notifier: Arc<dyn Notifier>,
        sms_sender: impl Into<String>,
    ) -> Self {
        Self {
            auth,
            profiles,
            notifier,
            sms_sender: sms_sender.into(),
        }
    }

    async fn send_sms(&self, phone: &str, text: &str) -> Result<()> {
        let payload = format!("{}\n{}", self.sms_sender, text);
        self.notifier
            .notify(Channel::Sms, phone, &payload)
            .await
            .map_err(|e| AuthError::SmsError(e.to_string()))
    }

    /// Look up the phone-verified owner of a phone number.
    pub async fn check_phone_registration(&self, raw_phone: &str) -> Result<RegistrationStatus> {
        let phone = phone::normalize(raw_phone)?;
        let owner = self
            .profiles
            .find_phone_verified(&phone)
            .await?
            .ok_or(AuthError::NotRegisteredYet)?;

        Ok(RegistrationStatus {
            email_verified: owner.email_verified,
            phone_verified: owner.phone_verified,
        })
    }

    /// First registration stage: claim a phone for the caller's profile.
    ///
    /// Re-keys the underlying account login to the phone number, stores a
    /// fresh code and dispatches it. A dispatch failure propagates without
    /// rolling the code back; re-invoking retries cleanly.
    pub async fn start_registration(&self, profile: &mut Profile, raw_phone: &str) -> Result<()> {
        if profile.phone_verified {
            return Err(AuthError::AlreadyRegistered);
        }

        let phone = phone::normalize(raw_phone)?;
        if self.profiles.find_phone_verified(&phone).await?.is_some() {
            return Err(AuthError::AlreadyRegistered);
        }

        self.auth
            .accounts()
            .rename_login(&profile.account_login, &phone)
            .await?;
        let code = security::new_verification_code();
        profile.account_login = phone.clone();
        profile.phone = Some(phone.clone());
        profile.verification_code = Some(code.clone());
        profile.verification_code_failed_attempts = 0;
        self.profiles.update(profile).await?;

        self.send_sms(&phone, &format!("Confirmation code: {code}"))
            .await?;

        tracing::info!(phone = %phone, "registration code dispatched");
        Ok(())
    }

    /// Second registration stage: check the submitted code.
    pub async fn confirm_registration(
        &self,
        profile: &mut Profile,
        submitted_code: &str,
    ) -> Result<ProfileView> {
        let Some(pending) = profile.verification_code.clone() else {
            // Nothing pending: fail hard and scrub whatever state is left.
            profile.phone_verified = false;
            profile.verification_code = None;
            profile.verification_code_failed_attempts = 0;
            self.profiles.update(profile).await?;
            return Err(AuthError::IncorrectVerificationCodeFatal);
        };

        if pending == submitted_code {
            profile.phone_verified = true;
            profile.verification_code = None;
            profile.verification_code_failed_attempts = 0;

            // Codec password set directly: rotating the token here would
            // invalidate the session the caller just registered with.
            let password = security::generate_password();
            let mut account = self
                .auth
                .accounts()
                .get_by_login(&profile.account_login)
                .await?
                .ok_or(AuthError::IncorrectLogin)?;
            account.set_password(&password);
            self.auth.accounts().update(&account).await?;
            self.profiles.update(profile).await?;

            if let Some(phone) = profile.phone.clone() {
                self.send_sms(
                    &phone,
                    &format!("You are registered!\nYour password: {password}"),
                )
                .await?;
            }

            tracing::info!(login = %profile.account_login, "phone verified, registration completed");
            Ok(ProfileView::from(&*profile))
        } else {
            self.register_code_mismatch(profile, CodeAxis::Phone).await
        }
    }

    /// Store a recovery email plus one code per channel and dispatch both.
    pub async fn send_recovery_codes(&self, raw_phone: &str, email: &str) -> Result<()> {
        let phone = phone::normalize(raw_phone)?;
        let mut owner = self
            .profiles
            .find_phone_verified(&phone)
            .await?
            .ok_or(AuthError::NotRegisteredYet)?;

        if owner.email_verified {
            return Err(AuthError::EmailIsVerified);
        }

        let sms_code = security::new_verification_code();
        let email_code = security::new_verification_code();
        owner.email = Some(email.to_string());
        owner.verification_code = Some(sms_code.clone());
        owner.verification_code2 = Some(email_code.clone());
        owner.verification_code_failed_attempts = 0;
        self.profiles.update(&owner).await?;

        self.send_sms(&phone, &format!("Confirmation code: {sms_code}"))
            .await?;
        self.notifier
            .notify(Channel::Email, email, &format!("Confirmation code: {email_code}"))
            .await?;

        tracing::info!(phone = %phone, "recovery codes dispatched");
        Ok(())
    }

    /// Recover the password behind a phone, proving email ownership on the
    /// way when it is not proven yet.
    pub async fn recover_password(&self, raw_phone: &str, vc1: &str, vc2: &str) -> Result<()> {
        let phone = phone::normalize(raw_phone)?;
        let mut owner = self
            .profiles
            .find_phone_verified(&phone)
            .await?
            .ok_or(AuthError::NotRegisteredYet)?;

        // Prior verification is trusted: skip the codes entirely.
        if owner.email_verified {
            self.issue_and_deliver_password(&owner).await?;
            return Ok(());
        }

        if self.both_codes_match(&owner, vc1, vc2) {
            owner.email_verified = true;
            owner.verification_code = None;
            owner.verification_code2 = None;
            owner.verification_code_failed_attempts = 0;
            self.profiles.update(&owner).await?;

            self.issue_and_deliver_password(&owner).await?;
            tracing::info!(login = %owner.account_login, "password recovered, email verified");
            Ok(())
        } else {
            self.register_code_mismatch(&mut owner, CodeAxis::Email)
                .await
                .map(|_| ())
        }
    }

    /// Prove email ownership without touching the password.
    pub async fn confirm_email_and_auth(
        &self,
        raw_phone: &str,
        vc1: &str,
        vc2: &str,
    ) -> Result<ProfileView> {
        let phone = phone::normalize(raw_phone)?;
        let mut owner = self
            .profiles
            .find_phone_verified(&phone)
            .await?
            .ok_or(AuthError::NotRegisteredYet)?;

        if self.both_codes_match(&owner, vc1, vc2) {
            owner.email_verified = true;
            owner.verification_code = None;
            owner.verification_code2 = None;
            owner.verification_code_failed_attempts = 0;
            self.profiles.update(&owner).await?;

            if let Some(email) = owner.email.clone() {
                self.notifier
                    .notify(Channel::Email, &email, "Your email address is confirmed.")
                    .await?;
            }

            tracing::info!(login = %owner.account_login, "email confirmed");
            Ok(ProfileView::from(&owner))
        } else {
            self.register_code_mismatch(&mut owner, CodeAxis::Email)
                .await
        }
    }

    /// Confirm a user-chosen password change out-of-band.
    pub async fn notify_password_changed(&self, profile: &Profile, password: &str) -> Result<()> {
        if let Some(phone) = profile.phone.clone() {
            self.send_sms(
                &phone,
                &format!("Your password was changed.\nNew password: {password}"),
            )
            .await?;
        }
        Ok(())
    }

    fn both_codes_match(&self, owner: &Profile, vc1: &str, vc2: &str) -> bool {
        owner.verification_code.as_deref() == Some(vc1)
            && owner.verification_code2.as_deref() == Some(vc2)
    }

    async fn issue_and_deliver_password(&self, owner: &Profile) -> Result<()> {
        let password = self.auth.change_password(&owner.account_login).await?;
        if let Some(phone) = owner.phone.clone() {
            self.send_sms(&phone, &format!("Your new password: {password}"))
                .await?;
        }
        Ok(())
    }

    /// Shared lockout policy: the third mismatch drops the axis's
    /// verification state, every earlier one is retryable.
    async fn register_code_mismatch(
        &self,
        profile: &mut Profile,
        axis: CodeAxis,
    ) -> Result<ProfileView> {
        profile.verification_code_failed_attempts += 1;
        if profile.verification_code_failed_attempts < MAX_CODE_ATTEMPTS {
            self.profiles.update(profile).await?;
            Err(AuthError::IncorrectVerificationCode)
        } else {
            match axis {
                CodeAxis::Phone => profile.reset_phone_verification(),
                CodeAxis::Email => profile.reset_email_verification(),
            }
            self.profiles.update(profile).await?;
            tracing::warn!(login = %profile.account_login, "verification locked out, state reset");
            Err(AuthError::IncorrectVerificationCodeFatal)
        }
    }
}

enum CodeAxis {
    Phone,
    Email,
}
