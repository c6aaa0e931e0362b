use async_trait::async_trait;
use sqlx_oldapi::FromRow;
use sqlx_oldapi::sqlite::SqliteRow;
use crate::errors::DoorPanelError;

/// Defines a generic asynchronous repository interface for interacting with the database
#[async_trait]
pub trait Repository<T>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Sync + Unpin,
{
    /// Inserts a single item into the database
    ///
    /// # Returns
    ///
    /// * `Ok(i64)` the row id of the inserted item
    /// * `Err(DoorPanelError)` if an error occurs during the insertion
    async fn insert(&self, item: &T) -> Result<i64, DoorPanelError>;
}
