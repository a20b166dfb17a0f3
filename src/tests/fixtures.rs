/// Test fixtures and helpers
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{AuthError, Result};
use crate::models::{Account, Profile};
use crate::notify::{Channel, Notifier};
use crate::services::{AuthService, VerificationService};
use crate::session::SessionGate;
use crate::store::{AccountStore, MemoryAccountStore, MemoryProfileStore, ProfileStore};

pub const TEST_LOGIN: &str = "u1";
pub const TEST_PASSWORD: &str = "pw1";
pub const TEST_PHONE: &str = "+79123456789";
pub const TEST_EMAIL: &str = "test@example.com";
pub const SMS_SENDER: &str = "authgate";

/// Notifier that records every dispatch; can be told to fail.
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(Channel, String, String)>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn messages(&self) -> Vec<(Channel, String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, channel: Channel, destination: &str, payload: &str) -> Result<()> {
        if self.fail {
            return Err(AuthError::SmsError("transport down".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((channel, destination.to_string(), payload.to_string()));
        Ok(())
    }
}

/// Everything a test needs, wired over in-memory stores.
pub struct TestHarness {
    pub accounts: Arc<MemoryAccountStore>,
    pub profiles: Arc<MemoryProfileStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub auth: Arc<AuthService>,
    pub gate: SessionGate,
    pub verification: VerificationService,
}

pub fn harness() -> TestHarness {
    harness_with_notifier(Arc::new(RecordingNotifier::new()))
}

pub fn harness_with_notifier(notifier: Arc<RecordingNotifier>) -> TestHarness {
    let accounts = Arc::new(MemoryAccountStore::new());
    let profiles = Arc::new(MemoryProfileStore::new());
    let auth = Arc::new(AuthService::new(accounts.clone()));
    let gate = SessionGate::new(auth.clone(), Some(profiles.clone()), "/", 30);
    let verification = VerificationService::new(
        auth.clone(),
        profiles.clone(),
        notifier.clone(),
        SMS_SENDER,
    );
    TestHarness {
        accounts,
        profiles,
        notifier,
        auth,
        gate,
        verification,
    }
}

/// Persist an account with the given credentials.
pub async fn create_account(harness: &TestHarness, login: &str, password: &str) -> Account {
    let account = Account::new(login, password);
    harness.accounts.insert(&account).await.expect("insert account");
    account
}

/// Persist an account plus a profile owning it.
pub async fn create_profile(
    harness: &TestHarness,
    login: &str,
    password: &str,
    phone_verified: bool,
) -> Profile {
    create_account(harness, login, password).await;
    let mut profile = Profile::guest(login);
    profile.name = "Test user".to_string();
    profile.phone = Some(login.to_string());
    profile.phone_verified = phone_verified;
    harness.profiles.insert(&profile).await.expect("insert profile")
}
