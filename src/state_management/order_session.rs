use chrono::NaiveDateTime;
use tracing::{info, warn};
use crate::errors::{DoorPanelError, DoorPanelResult};
use crate::models::{local_now, GripSizeCategory, OrderRecord};

/// Tracks the lifecycle of the operator's current work order.
///
/// At most one order is active. Starting while one is open is refused; finishing stamps the end time
/// and hands the record back so it can be persisted.
#[derive(Debug, Default, Clone)]
pub struct OrderSession {
    active: Option<OrderRecord>,
}

impl OrderSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&OrderRecord> {
        self.active.as_ref()
    }

    pub fn has_active_order(&self) -> bool {
        self.active.is_some()
    }

    /// Opens a new order stamped with the current local time
    pub fn start(&mut self, operator: &str, door_size: GripSizeCategory) -> DoorPanelResult<&OrderRecord> {
        self.start_at(operator, door_size, local_now())
    }

    pub fn start_at(&mut self, operator: &str, door_size: GripSizeCategory, started_at: NaiveDateTime) -> DoorPanelResult<&OrderRecord> {
        if let Some(current) = &self.active {
            warn!("Refusing to start a new order, order by {} started at {} is still open", current.operator, current.started_at);
            return Err(DoorPanelError::OrderAlreadyActive(current.operator.clone()));
        }
        info!("Order started by {} (size: {})", operator, door_size);
        Ok(&*self.active.insert(OrderRecord::new(operator, door_size, started_at)))
    }

    /// Records the persisted row id of the active order
    pub fn attach_id(&mut self, id: i64) {
        if let Some(record) = self.active.as_mut() {
            record.id = Some(id);
        }
    }

    /// Stamps and closes the active order. `None` when nothing is open.
    pub fn finish(&mut self) -> Option<OrderRecord> {
        self.finish_at(local_now())
    }

    pub fn finish_at(&mut self, finished_at: NaiveDateTime) -> Option<OrderRecord> {
        let mut record = self.active.take()?;
        record.finished_at = Some(finished_at);
        info!("Order by {} finished at {}", record.operator, finished_at);
        Some(record)
    }

    /// Drops the active order without finishing it
    pub fn abandon(&mut self) -> Option<OrderRecord> {
        let record = self.active.take();
        if let Some(record) = &record {
            warn!("Abandoning unfinished order by {} started at {}", record.operator, record.started_at);
        }
        record
    }
}
