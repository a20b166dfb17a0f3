/// Persistence traits and their implementations
///
/// The auth services take these by `Arc<dyn …>` at construction time; the
/// Postgres implementations back the binary, the in-memory ones back the
/// tests and embedded use.
pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Account, Profile};

/// Persistence of Account records, keyed by the unique login.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn get_by_login(&self, login: &str) -> Result<Option<Account>>;

    async fn get_by_token(&self, token: &str) -> Result<Option<Account>>;

    /// Persist a new account. Fails `DuplicateLogin` when the login is taken
    /// and `NoLoginForAccount`/`NoPasswordForAccount` when it is incomplete.
    async fn insert(&self, account: &Account) -> Result<()>;

    /// Update an existing account in place, keyed by login.
    async fn update(&self, account: &Account) -> Result<()>;

    /// Re-key an account to a new login, carrying every other field over.
    async fn rename_login(&self, old_login: &str, new_login: &str) -> Result<()>;
}

/// Persistence of Profile records owned by the host application.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_by_account_login(&self, login: &str) -> Result<Option<Profile>>;

    /// Look up the phone-verified profile whose account login is this phone.
    async fn find_phone_verified(&self, phone: &str) -> Result<Option<Profile>>;

    async fn insert(&self, profile: &Profile) -> Result<Profile>;

    async fn update(&self, profile: &Profile) -> Result<()>;
}

pub use memory::{MemoryAccountStore, MemoryProfileStore};
pub use postgres::{PgAccountStore, PgProfileStore};
