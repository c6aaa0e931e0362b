//! # Account Service

//! Operator accounts over the SQLite `accounts` table. The control panel only sees the `AccountDirectory`
//! trait; login outcome and operator identity are all it consumes.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use tracing::{info, warn};
use crate::config::SeedAccount;
use crate::errors::{DoorPanelError, DoorPanelResult};
use crate::models::Account;
use crate::repositories::{AccountRepository, Repository};
use crate::services::auth::password_hasher::PasswordHasher;
use crate::services::DatabaseClient;

/// Lookup and verification of operator accounts
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn username_exists(&self, username: &str) -> DoorPanelResult<bool>;

    async fn credentials_correct(&self, username: &str, password: &str) -> DoorPanelResult<bool>;

    async fn create_account(&self, username: &str, password: &str, is_admin: bool) -> DoorPanelResult<()>;

    /// # Returns
    ///
    /// * `Err(DoorPanelError::AccountNotFound)` if no account has that username
    async fn get_account(&self, username: &str) -> DoorPanelResult<Account>;

    async fn user_is_admin(&self, username: &str) -> DoorPanelResult<bool> {
        Ok(self.get_account(username).await?.is_admin)
    }
}

pub struct AccountService {
    client: DatabaseClient,
    hasher: PasswordHasher,
}

impl AccountService {
    pub fn new(client: DatabaseClient, hasher: PasswordHasher) -> Self {
        Self { client, hasher }
    }

    fn repository(&self) -> AccountRepository {
        AccountRepository::new(self.client.clone())
    }

    /// Creates every configured account whose username is not taken yet.
    ///
    /// Safe to run on every start; returns how many accounts were created.
    pub async fn seed_accounts(&self, seeds: &[SeedAccount]) -> DoorPanelResult<usize> {
        let mut created = 0;
        for seed in seeds {
            if self.username_exists(&seed.username).await? {
                continue;
            }
            self.create_account(&seed.username, seed.password.expose_secret(), seed.is_admin).await?;
            created += 1;
        }
        if created > 0 {
            info!("Seeded {} account(s)", created);
        }
        Ok(created)
    }
}

#[async_trait]
impl AccountDirectory for AccountService {
    async fn username_exists(&self, username: &str) -> DoorPanelResult<bool> {
        Ok(self.repository().find_by_username(username).await?.is_some())
    }

    async fn credentials_correct(&self, username: &str, password: &str) -> DoorPanelResult<bool> {
        match self.repository().find_by_username(username).await? {
            Some(account) => {
                let hasher = self.hasher.clone();
                let password = password.to_string();
                tokio::task::spawn_blocking(move || {
                    hasher.verify(&password, &account.salt, &account.salted_password_hash)
                })
                    .await
                    .map_err(|e| DoorPanelError::AuthenticationError(format!("password check failed: {}", e)))
            }
            None => {
                warn!("Credential check for unknown user {}", username);
                Ok(false)
            }
        }
    }

    async fn create_account(&self, username: &str, password: &str, is_admin: bool) -> DoorPanelResult<()> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let (salt, hash) = tokio::task::spawn_blocking(move || {
            let salt = hasher.generate_salt();
            let hash = hasher.hash(&password, &salt);
            (salt, hash)
        })
            .await
            .map_err(|e| DoorPanelError::AuthenticationError(format!("password hashing failed: {}", e)))?;

        self.repository().insert(&Account {
            username: username.to_string(),
            salt,
            salted_password_hash: hash,
            is_admin,
        }).await?;
        info!("Created account {} (admin: {})", username, is_admin);
        Ok(())
    }

    async fn get_account(&self, username: &str) -> DoorPanelResult<Account> {
        self.repository()
            .find_by_username(username)
            .await?
            .ok_or_else(|| DoorPanelError::AccountNotFound(username.to_string()))
    }
}
