/// Postgres-backed stores
use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::Result;
use crate::models::{Account, Profile};
use crate::store::{AccountStore, ProfileStore};

pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn get_by_login(&self, login: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT login, password_hash, token, settings FROM accounts WHERE login = $1
            "#,
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn get_by_token(&self, token: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT login, password_hash, token, settings FROM accounts WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn insert(&self, account: &Account) -> Result<()> {
        account.validate()?;

        sqlx::query(
            r#"
            INSERT INTO accounts (login, password_hash, token, settings)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&account.login)
        .bind(&account.password_hash)
        .bind(&account.token)
        .bind(serde_json::to_value(&account.settings).unwrap_or_default())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, account: &Account) -> Result<()> {
        account.validate()?;

        sqlx::query(
            r#"
            UPDATE accounts SET password_hash = $1, token = $2, settings = $3 WHERE login = $4
            "#,
        )
        .bind(&account.password_hash)
        .bind(&account.token)
        .bind(serde_json::to_value(&account.settings).unwrap_or_default())
        .bind(&account.login)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn rename_login(&self, old_login: &str, new_login: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE accounts SET login = $1 WHERE login = $2
            "#,
        )
        .bind(new_login)
        .bind(old_login)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn get_by_account_login(&self, login: &str) -> Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT * FROM profiles WHERE account_login = $1
            "#,
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn find_phone_verified(&self, phone: &str) -> Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT * FROM profiles WHERE account_login = $1 AND phone_verified = true
            "#,
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn insert(&self, profile: &Profile) -> Result<Profile> {
        let inserted = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (
                name, position_name, account_login, phone, phone_verified,
                email, email_verified, verification_code, verification_code2,
                verification_code_failed_attempts
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&profile.name)
        .bind(&profile.position_name)
        .bind(&profile.account_login)
        .bind(&profile.phone)
        .bind(profile.phone_verified)
        .bind(&profile.email)
        .bind(profile.email_verified)
        .bind(&profile.verification_code)
        .bind(&profile.verification_code2)
        .bind(profile.verification_code_failed_attempts)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    async fn update(&self, profile: &Profile) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE profiles SET
                name = $1, position_name = $2, account_login = $3, phone = $4,
                phone_verified = $5, email = $6, email_verified = $7,
                verification_code = $8, verification_code2 = $9,
                verification_code_failed_attempts = $10
            WHERE id = $11
            "#,
        )
        .bind(&profile.name)
        .bind(&profile.position_name)
        .bind(&profile.account_login)
        .bind(&profile.phone)
        .bind(profile.phone_verified)
        .bind(&profile.email)
        .bind(profile.email_verified)
        .bind(&profile.verification_code)
        .bind(&profile.verification_code2)
        .bind(profile.verification_code_failed_attempts)
        .bind(profile.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
