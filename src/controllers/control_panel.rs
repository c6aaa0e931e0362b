//! # Control Panel

//! The operator-facing sequencing layer. Owns one session: who is logged in, the selected door size, the
//! door sequence and the current order. Every operation returns a `StatusMessage`; nothing here propagates
//! an error to the caller.
//!
//! Motion moves are planned first, transmitted second and only then applied to the door sequence, so a
//! failed send leaves the sequence where it was.

use std::sync::Arc;
use serde::Serialize;
use tracing::{error, info, warn};
use crate::errors::DoorPanelError;
use crate::models::{ControlCommand, Direction, GripParameters, GripSizeCategory, OrderRecord, StatusMessage};
use crate::services::{AccountDirectory, CommandDispatcher, OrderStore};
use crate::state_management::{DoorCellState, DoorSequence, OrderSession};

/// Which of the four action controls may currently be used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionAvailability {
    pub brake_release: bool,
    pub move_to_work_table: bool,
    pub move_to_storage: bool,
    pub stop: bool,
}

/// A read-only view of the panel for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelSnapshot {
    pub operator: Option<String>,
    pub operator_is_admin: bool,
    pub door_size: GripSizeCategory,
    pub grip: GripParameters,
    pub door_state: DoorCellState,
    pub active_order: Option<OrderRecord>,
    pub actions: ActionAvailability,
}

struct Operator {
    username: String,
    is_admin: bool,
}

pub struct ControlPanel {
    dispatcher: CommandDispatcher,
    accounts: Arc<dyn AccountDirectory>,
    orders: Arc<dyn OrderStore>,
    default_size: GripSizeCategory,
    operator: Option<Operator>,
    selected_size: GripSizeCategory,
    sequence: DoorSequence,
    session: OrderSession,
}

impl ControlPanel {
    /// Creates a logged-out panel
    ///
    /// # Arguments
    ///
    /// * `dispatcher`: Sends control commands and motion programs to the robot
    /// * `accounts`: Verifies operator credentials
    /// * `orders`: Persists order start and finish
    /// * `default_size`: The door size selected after each login
    pub fn new(
        dispatcher: CommandDispatcher,
        accounts: Arc<dyn AccountDirectory>,
        orders: Arc<dyn OrderStore>,
        default_size: GripSizeCategory,
    ) -> Self {
        info!("Initializing control panel (default door size: {})", default_size);
        Self {
            dispatcher,
            accounts,
            orders,
            default_size,
            operator: None,
            selected_size: default_size,
            sequence: DoorSequence::new(),
            session: OrderSession::new(),
        }
    }

    pub fn operator(&self) -> Option<&str> {
        self.operator.as_ref().map(|o| o.username.as_str())
    }

    pub fn selected_size(&self) -> GripSizeCategory {
        self.selected_size
    }

    pub fn door_state(&self) -> DoorCellState {
        self.sequence.state()
    }

    pub fn active_order(&self) -> Option<&OrderRecord> {
        self.session.active()
    }

    /// Verifies the credentials and opens a fresh session for the operator
    pub async fn login(&mut self, username: &str, password: &str) -> StatusMessage {
        let username = username.trim();
        if username.is_empty() || password.trim().is_empty() {
            return StatusMessage::MissingCredentials;
        }

        match self.accounts.username_exists(username).await {
            Ok(true) => {}
            Ok(false) => {
                info!("Login refused, unknown user {}", username);
                return StatusMessage::UnknownUsername;
            }
            Err(e) => return Self::failure("login", e),
        }

        match self.accounts.credentials_correct(username, password).await {
            Ok(true) => {}
            Ok(false) => {
                info!("Login refused for {}, incorrect password", username);
                return StatusMessage::IncorrectPassword;
            }
            Err(e) => return Self::failure("login", e),
        }

        let is_admin = self.accounts.user_is_admin(username).await.unwrap_or_else(|e| {
            warn!("Could not read admin flag for {}: {}", username, e);
            false
        });

        self.clear_session();
        self.operator = Some(Operator { username: username.to_string(), is_admin });
        info!("{} logged in (admin: {})", username, is_admin);
        StatusMessage::LoggedIn(username.to_string())
    }

    /// Ends the session. The door sequence is reset and an unfinished order is dropped.
    pub fn logout(&mut self) -> StatusMessage {
        let Some(operator) = self.operator.take() else {
            return StatusMessage::NotLoggedIn;
        };
        self.clear_session();
        info!("{} logged out", operator.username);
        StatusMessage::LoggedOut
    }

    pub fn select_size(&mut self, size: GripSizeCategory) -> StatusMessage {
        if self.operator.is_none() {
            return StatusMessage::NotLoggedIn;
        }
        self.selected_size = size;
        info!("Door size set to {} ({})", size, size.grip_parameters());
        StatusMessage::SizeSelected(size)
    }

    /// Releases the robot brakes and starts an order unless one is already open
    pub async fn brake_release(&mut self) -> StatusMessage {
        let Some(operator) = self.operator() else {
            return StatusMessage::NotLoggedIn;
        };
        let operator = operator.to_string();

        if let Err(e) = self.dispatcher.send_control(ControlCommand::BrakeRelease).await {
            return Self::failure("brake release", e);
        }

        let started_at = match self.session.start(&operator, self.selected_size) {
            Ok(record) => record.started_at,
            Err(DoorPanelError::OrderAlreadyActive(owner)) => {
                return StatusMessage::BrakeReleasedOrderInProgress(owner);
            }
            Err(e) => return Self::failure("brake release", e),
        };

        match self.orders.record_order_start(&operator, self.selected_size, started_at).await {
            Ok(id) => {
                self.session.attach_id(id);
                StatusMessage::BrakeReleased(operator)
            }
            Err(e) => {
                error!("Order by {} started but not recorded: {}", operator, e);
                StatusMessage::Error(format!("Brake released, order started by {} but not recorded: {}", operator, e))
            }
        }
    }

    /// Picks the next door from the stack onto the work table
    pub async fn move_to_work_table(&mut self) -> StatusMessage {
        if self.operator.is_none() {
            return StatusMessage::NotLoggedIn;
        }

        let planned = match self.sequence.plan_move_to_work_table() {
            Ok(planned) => planned,
            Err(reason) => {
                info!("Move to work table refused: {}", reason);
                return reason.into();
            }
        };

        let size = self.selected_size;
        let grip = size.grip_parameters();
        if let Err(e) = self.dispatcher.send_motion_program(planned.slot, Direction::ToWorkTable, Some(grip)).await {
            return Self::failure("move to work table", e);
        }

        match self.sequence.complete(planned) {
            Ok(_) => StatusMessage::DoorAtTable { slot: planned.slot, size, grip },
            Err(reason) => reason.into(),
        }
    }

    /// Puts the door on the work table into storage
    pub async fn move_to_storage(&mut self) -> StatusMessage {
        if self.operator.is_none() {
            return StatusMessage::NotLoggedIn;
        }

        let planned = match self.sequence.plan_move_to_storage() {
            Ok(planned) => planned,
            Err(reason) => {
                info!("Move to storage refused: {}", reason);
                return reason.into();
            }
        };

        if let Err(e) = self.dispatcher.send_motion_program(planned.slot, Direction::ToStorage, None).await {
            return Self::failure("move to storage", e);
        }

        match self.sequence.complete(planned) {
            Ok(_) => StatusMessage::DoorStored(planned.slot),
            Err(reason) => reason.into(),
        }
    }

    /// Sends `stop` on the control channel. Accepted with or without a logged-in operator.
    pub async fn stop(&self) -> StatusMessage {
        stop_robot(&self.dispatcher).await
    }

    /// Stamps and persists the end of the active order
    pub async fn finish_order(&mut self) -> StatusMessage {
        let Some(operator) = self.operator() else {
            return StatusMessage::NotLoggedIn;
        };
        let operator = operator.to_string();

        let Some(record) = self.session.finish() else {
            return StatusMessage::NoActiveOrder;
        };
        let Some(finished_at) = record.finished_at else {
            return StatusMessage::NoActiveOrder;
        };

        let persisted = match record.id {
            Some(id) => self.orders.record_order_finish(id, finished_at).await,
            None => {
                warn!("Order by {} was never recorded, recording it now", record.operator);
                match self.orders.record_order_start(&record.operator, record.door_size, record.started_at).await {
                    Ok(id) => self.orders.record_order_finish(id, finished_at).await,
                    Err(e) => Err(e),
                }
            }
        };

        match persisted {
            Ok(()) => StatusMessage::OrderFinished(operator),
            Err(e) => {
                error!("Order by {} finished but not recorded: {}", record.operator, e);
                StatusMessage::Error(format!("Order finished by {} but not recorded: {}", operator, e))
            }
        }
    }

    pub fn available_actions(&self) -> ActionAvailability {
        let logged_in = self.operator.is_some();
        ActionAvailability {
            brake_release: logged_in,
            move_to_work_table: logged_in && self.sequence.can_move_to_work_table(),
            move_to_storage: logged_in && self.sequence.can_move_to_storage(),
            stop: true,
        }
    }

    pub fn snapshot(&self) -> PanelSnapshot {
        PanelSnapshot {
            operator: self.operator().map(str::to_string),
            operator_is_admin: self.operator.as_ref().is_some_and(|o| o.is_admin),
            door_size: self.selected_size,
            grip: self.selected_size.grip_parameters(),
            door_state: self.sequence.state(),
            active_order: self.session.active().cloned(),
            actions: self.available_actions(),
        }
    }

    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    fn clear_session(&mut self) {
        self.sequence.reset();
        self.session.abandon();
        self.selected_size = self.default_size;
    }

    fn failure(action: &str, e: DoorPanelError) -> StatusMessage {
        error!("{} failed: {}", action, e);
        StatusMessage::Error(e.to_string())
    }
}

/// Sends `stop` through the given dispatcher and reports the outcome as a status
pub async fn stop_robot(dispatcher: &CommandDispatcher) -> StatusMessage {
    match dispatcher.send_control(ControlCommand::Stop).await {
        Ok(()) => {
            warn!("Stop sent to robot");
            StatusMessage::StopSent
        }
        Err(e) => ControlPanel::failure("stop", e),
    }
}
