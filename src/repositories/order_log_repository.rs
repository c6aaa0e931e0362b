use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx_oldapi::Sqlite;
use crate::errors::DoorPanelError;
use crate::models::OrderLog;
use crate::repositories::repository_trait::Repository;
use crate::services::DatabaseClient;

/// A repository responsible for work order rows in the `order_logs` table.
pub struct OrderLogRepository {
    /// The database client used to interact with the database.
    client: DatabaseClient,
}

impl OrderLogRepository {
    /// Creates a new `OrderLogRepository`.
    pub fn new(client: DatabaseClient) -> Self {
        Self { client }
    }

    /// Stamps the finish time of an order row
    ///
    /// # Returns
    /// * `Ok(())` if exactly one row was updated
    /// * `Err(DoorPanelError::DatabaseError)` if no row has that id or the update failed
    pub async fn mark_finished(&self, id: i64, finished_at: NaiveDateTime) -> Result<(), DoorPanelError> {
        let result = sqlx_oldapi::query::<Sqlite>("UPDATE order_logs SET finished_at = ?1 WHERE id = ?2")
            .bind(finished_at)
            .bind(id)
            .execute(&*self.client.pool)
            .await
            .map_err(DoorPanelError::DatabaseError)?;

        if result.rows_affected() == 0 {
            return Err(DoorPanelError::DatabaseError(sqlx_oldapi::Error::RowNotFound));
        }
        Ok(())
    }

    /// Most recent orders first
    pub async fn recent(&self, limit: u32) -> Result<Vec<OrderLog>, DoorPanelError> {
        sqlx_oldapi::query_as::<Sqlite, OrderLog>(
            "SELECT id, username, door_size, started_at, finished_at FROM order_logs ORDER BY id DESC LIMIT ?1",
        )
            .bind(limit)
            .fetch_all(&*self.client.pool)
            .await
            .map_err(DoorPanelError::DatabaseError)
    }
}

#[async_trait]
impl Repository<OrderLog> for OrderLogRepository {
    /// Inserts an order row and returns its id. The `id` field of `log` is ignored.
    async fn insert(&self, log: &OrderLog) -> Result<i64, DoorPanelError> {
        let query = r#"
            INSERT INTO order_logs (username, door_size, started_at, finished_at)
            VALUES (?1, ?2, ?3, ?4)
        "#;

        let result = sqlx_oldapi::query::<Sqlite>(query)
            .bind(&log.username)
            .bind(&log.door_size)
            .bind(log.started_at)
            .bind(log.finished_at)
            .execute(&*self.client.pool)
            .await
            .map_err(DoorPanelError::DatabaseError)?;

        Ok(result.last_insert_rowid())
    }
}
