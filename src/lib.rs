// Authgate library

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod notify;
pub mod phone;
pub mod security;
pub mod services;
pub mod session;
pub mod store;

#[cfg(test)]
mod tests;

use std::sync::Arc;

pub use error::{AuthError, Result};
pub use models::{Account, Profile, ProfileView, Settings};
pub use services::{AuthFields, AuthService, VerificationService};
pub use session::{LoginOutcome, SessionGate, SessionOutcome};

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub gate: Arc<SessionGate>,
    pub verification: Arc<VerificationService>,
    pub profiles: Arc<dyn store::ProfileStore>,
    pub auto_register: bool,
}
