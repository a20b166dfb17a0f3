/// In-memory stores
///
/// Back the unit tests and embedded use; semantics match the Postgres
/// implementations, including the uniqueness constraint on login.
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{AuthError, Result};
use crate::models::{Account, Profile};
use crate::store::{AccountStore, ProfileStore};

#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<HashMap<String, Account>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn get_by_login(&self, login: &str) -> Result<Option<Account>> {
        Ok(self.accounts.read().await.get(login).cloned())
    }

    async fn get_by_token(&self, token: &str) -> Result<Option<Account>> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|account| account.token.as_deref() == Some(token))
            .cloned())
    }

    async fn insert(&self, account: &Account) -> Result<()> {
        account.validate()?;

        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.login) {
            return Err(AuthError::DuplicateLogin);
        }
        accounts.insert(account.login.clone(), account.clone());
        Ok(())
    }

    async fn update(&self, account: &Account) -> Result<()> {
        account.validate()?;

        let mut accounts = self.accounts.write().await;
        match accounts.get_mut(&account.login) {
            Some(stored) => {
                *stored = account.clone();
                Ok(())
            }
            None => Err(AuthError::IncorrectLogin),
        }
    }

    async fn rename_login(&self, old_login: &str, new_login: &str) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(new_login) {
            return Err(AuthError::DuplicateLogin);
        }
        let mut account = accounts
            .remove(old_login)
            .ok_or(AuthError::IncorrectLogin)?;
        account.login = new_login.to_string();
        accounts.insert(new_login.to_string(), account);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryProfileStore {
    profiles: RwLock<HashMap<i64, Profile>>,
    next_id: RwLock<i64>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get_by_account_login(&self, login: &str) -> Result<Option<Profile>> {
        Ok(self
            .profiles
            .read()
            .await
            .values()
            .find(|profile| profile.account_login == login)
            .cloned())
    }

    async fn find_phone_verified(&self, phone: &str) -> Result<Option<Profile>> {
        Ok(self
            .profiles
            .read()
            .await
            .values()
            .find(|profile| profile.account_login == phone && profile.phone_verified)
            .cloned())
    }

    async fn insert(&self, profile: &Profile) -> Result<Profile> {
        let mut next_id = self.next_id.write().await;
        *next_id += 1;

        let mut stored = profile.clone();
        stored.id = *next_id;
        self.profiles.write().await.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, profile: &Profile) -> Result<()> {
        let mut profiles = self.profiles.write().await;
        match profiles.get_mut(&profile.id) {
            Some(stored) => {
                *stored = profile.clone();
                Ok(())
            }
            None => Err(AuthError::Store(format!("no profile with id {}", profile.id))),
        }
    }
}
