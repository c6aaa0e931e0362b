//! # Database Client

//! This module defines the `DatabaseClient` struct, a thin wrapper around a SQLite connection pool used for
//! the accounts and order log tables.


use std::str::FromStr;
use sqlx_oldapi::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteQueryResult};
use sqlx_oldapi::{Error as SqlxError, query};
use std::sync::Arc;
use crate::errors::DoorPanelError;

/// Represents a client for interacting with the local SQLite database
#[derive(Debug, Clone)]
pub struct DatabaseClient {
    /// The connection pool used to manage database connections
    pub pool: Arc<SqlitePool>,
}

impl DatabaseClient {
    /// Creates a new `DatabaseClient` and opens a connection pool to the database file
    ///
    /// The connection string should be in the format `sqlite://path/to/file.sqlite`. The file is created
    /// when it does not exist yet.
    ///
    /// # Arguments
    ///
    /// * `connection_string`: The connection string to the database
    /// * `max_connections`: Upper bound on pooled connections
    ///
    /// # Returns
    ///
    /// * `Ok(Self)`: The created `DatabaseClient` if the connection is successful
    /// * `Err(DoorPanelError)`: If there's an error parsing the connection string or opening the database
    pub async fn new(connection_string: &str, max_connections: u32) -> Result<Self, DoorPanelError> {
        let connect_options = SqliteConnectOptions::from_str(connection_string)
            .map_err(|e| DoorPanelError::DatabaseError(SqlxError::Configuration(Box::new(e))))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(connect_options)
            .await
            .map_err(DoorPanelError::DatabaseError)?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Executes a SQL statement without returning any rows, such as DDL
    pub async fn execute(&self, sql_query: &str) -> Result<SqliteQueryResult, DoorPanelError> {
        query(sql_query)
            .execute(&*self.pool)
            .await
            .map_err(DoorPanelError::DatabaseError)
    }
}
