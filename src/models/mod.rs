/// Data models for authentication
pub mod account;
pub mod profile;
pub mod settings;

pub use account::Account;
pub use profile::{Profile, ProfileView};
pub use settings::Settings;
