//! # Database Services

//! This module provides the `DatabaseService`, which owns the SQLite connection, creates the schema on start
//! and implements the `OrderStore` persistence collaborator used by the control panel.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tracing::{debug, info};
use crate::config::DatabaseSettings;
use crate::errors::DoorPanelResult;
use crate::models::{GripSizeCategory, OrderLog};
use crate::repositories::{OrderLogRepository, Repository};
use crate::services::DatabaseClient;

const CREATE_ACCOUNTS: &str = r#"
    CREATE TABLE IF NOT EXISTS accounts (
        username TEXT PRIMARY KEY NOT NULL,
        salt BLOB NOT NULL,
        salted_password_hash BLOB NOT NULL,
        is_admin BOOLEAN NOT NULL DEFAULT 0
    )
"#;

const CREATE_ORDER_LOGS: &str = r#"
    CREATE TABLE IF NOT EXISTS order_logs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL,
        door_size TEXT NOT NULL,
        started_at DATETIME NOT NULL,
        finished_at DATETIME
    )
"#;

/// Durable record of work orders
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists the start of an order and returns its id
    async fn record_order_start(&self, operator: &str, door_size: GripSizeCategory, started_at: NaiveDateTime) -> DoorPanelResult<i64>;

    /// Stamps the finish time of a previously started order
    async fn record_order_finish(&self, order_id: i64, finished_at: NaiveDateTime) -> DoorPanelResult<()>;
}

/// Provides services for the local SQLite database
#[derive(Clone)]
pub struct DatabaseService {
    /// The database client for the local database
    client: DatabaseClient,
}

impl DatabaseService {
    /// Opens the database described by `settings` and creates any missing tables
    pub async fn new(settings: &DatabaseSettings) -> DoorPanelResult<Self> {
        let client = DatabaseClient::new(&settings.connection_string(), settings.max_connections).await?;
        let service = Self { client };
        service.ensure_schema().await?;
        info!("Database ready at {}", settings.path.display());
        Ok(service)
    }

    pub fn client(&self) -> &DatabaseClient {
        &self.client
    }

    /// Creates the `accounts` and `order_logs` tables when they do not exist
    pub async fn ensure_schema(&self) -> DoorPanelResult<()> {
        self.client.execute(CREATE_ACCOUNTS).await?;
        self.client.execute(CREATE_ORDER_LOGS).await?;
        debug!("Schema ensured");
        Ok(())
    }

    /// Fetches the most recent orders, newest first
    pub async fn recent_orders(&self, limit: u32) -> DoorPanelResult<Vec<OrderLog>> {
        OrderLogRepository::new(self.client.clone()).recent(limit).await
    }
}

#[async_trait]
impl OrderStore for DatabaseService {
    async fn record_order_start(&self, operator: &str, door_size: GripSizeCategory, started_at: NaiveDateTime) -> DoorPanelResult<i64> {
        let repo = OrderLogRepository::new(self.client.clone());
        let id = repo.insert(&OrderLog {
            id: 0,
            username: operator.to_string(),
            door_size: door_size.to_string(),
            started_at,
            finished_at: None,
        }).await?;
        debug!("Order {} recorded for {}", id, operator);
        Ok(id)
    }

    async fn record_order_finish(&self, order_id: i64, finished_at: NaiveDateTime) -> DoorPanelResult<()> {
        OrderLogRepository::new(self.client.clone())
            .mark_finished(order_id, finished_at)
            .await
    }
}
