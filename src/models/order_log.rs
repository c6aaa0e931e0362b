//! # Order Records

//! This module defines the in-memory `OrderRecord` tracked by an operator session and the `OrderLog`
//! row persisted in the `order_logs` table.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx_oldapi::FromRow;
use crate::models::GripSizeCategory;

/// One work order as held by the running session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Row id once the start has been persisted
    pub id: Option<i64>,
    /// The operator who released the brakes
    pub operator: String,
    /// The door size selected when the order started
    pub door_size: GripSizeCategory,
    pub started_at: NaiveDateTime,
    /// `None` until the operator finishes the order
    pub finished_at: Option<NaiveDateTime>,
}

impl OrderRecord {
    pub fn new(operator: &str, door_size: GripSizeCategory, started_at: NaiveDateTime) -> Self {
        Self {
            id: None,
            operator: operator.to_string(),
            door_size,
            started_at,
            finished_at: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }
}

/// A persisted order row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct OrderLog {
    pub id: i64,
    pub username: String,
    pub door_size: String,
    pub started_at: NaiveDateTime,
    pub finished_at: Option<NaiveDateTime>,
}

