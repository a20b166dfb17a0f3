/// Business logic services
pub mod auth;
pub mod verification;

pub use auth::{AuthFields, AuthService};
pub use verification::VerificationService;
