use async_trait::async_trait;
use sqlx_oldapi::Sqlite;
use crate::errors::DoorPanelError;
use crate::models::Account;
use crate::repositories::repository_trait::Repository;
use crate::services::DatabaseClient;

/// A repository responsible for operator accounts in the `accounts` table.
pub struct AccountRepository {
    /// The database client used to interact with the database.
    client: DatabaseClient,
}

impl AccountRepository {
    /// Creates a new `AccountRepository`.
    pub fn new(client: DatabaseClient) -> Self {
        Self { client }
    }

    /// Looks up a single account by username
    ///
    /// # Returns
    /// * `Ok(Some(Account))` if the account exists
    /// * `Ok(None)` if no account has that username
    /// * `Err(DoorPanelError)` if there was an error during the database operation
    pub async fn find_by_username(&self, username: &str) -> Result<Option<Account>, DoorPanelError> {
        sqlx_oldapi::query_as::<Sqlite, Account>(
            "SELECT username, salt, salted_password_hash, is_admin FROM accounts WHERE username = ?1",
        )
            .bind(username)
            .fetch_optional(&*self.client.pool)
            .await
            .map_err(DoorPanelError::DatabaseError)
    }
}

#[async_trait]
impl Repository<Account> for AccountRepository {
    /// Inserts an account row. The username is the primary key, so a duplicate fails.
    async fn insert(&self, account: &Account) -> Result<i64, DoorPanelError> {
        let query = r#"
            INSERT INTO accounts (username, salt, salted_password_hash, is_admin)
            VALUES (?1, ?2, ?3, ?4)
        "#;

        let result = sqlx_oldapi::query::<Sqlite>(query)
            .bind(&account.username)
            .bind(&account.salt)
            .bind(&account.salted_password_hash)
            .bind(account.is_admin)
            .execute(&*self.client.pool)
            .await
            .map_err(DoorPanelError::DatabaseError)?;

        Ok(result.last_insert_rowid())
    }
}
