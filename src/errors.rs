/// # Door Panel Errors
/// This module defines the `DoorPanelError` enum, which encapsulates all potential errors that can occur within the door panel controller.
/// None of these are fatal to a running session: the control panel renders every one of them into an operator status message.


use thiserror::Error;
use sqlx_oldapi::Error as SqlxError;
use std::io;
use tokio::sync::mpsc::error::SendError;
use tokio::sync::oneshot::error::RecvError;
use crate::models::{DoorSlot, RobotChannel};

/// Reasons the door state machine refuses an operator action.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionRejected {
    /// All three storage slots have already been cycled through the work table.
    #[error("all doors processed")]
    AllDoorsProcessed,

    /// A door is still sitting on the work table.
    #[error("door #{0} already at work table")]
    DoorAlreadyAtTable(DoorSlot),

    /// Nothing is on the work table to put away.
    #[error("no door at work table")]
    NoDoorAtTable,

    /// A move was planned for one door but the sequence has since moved on to another.
    #[error("move planned for door #{planned} is stale, door #{current} is current")]
    StalePlan { planned: DoorSlot, current: DoorSlot },
}

#[derive(Error, Debug)]
pub enum DoorPanelError {
    /// Connecting to or writing to the robot controller failed.
    #[error("Dispatch on {channel} channel failed: {source}")]
    DispatchFailed {
        channel: RobotChannel,
        #[source]
        source: io::Error,
    },

    /// Represents errors originating from database interactions.
    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    /// A motion program could not be looked up or rendered.
    #[error("Motion program error: {0}")]
    TemplateError(String),

    /// A new order was started while another one is still open.
    #[error("Order already active for {0}")]
    OrderAlreadyActive(String),

    /// The requested account does not exist.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Password hashing or verification failed.
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// Represents errors arising from misconfigurations or invalid settings.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// Represents errors when sending data over a channel.
    #[error("Channel send error: {0}")]
    ChannelSendError(String),

    /// Represents errors when receiving data from a channel.
    #[error("Channel receive error: {0}")]
    ChannelRecvError(String),
}

impl<T> From<SendError<T>> for DoorPanelError {
    fn from(err: SendError<T>) -> Self {
        DoorPanelError::ChannelSendError(err.to_string())
    }
}

impl From<RecvError> for DoorPanelError {
    fn from(err: RecvError) -> Self {
        DoorPanelError::ChannelRecvError(err.to_string())
    }
}


impl From<config::ConfigError> for DoorPanelError {
    fn from(err: config::ConfigError) -> Self {
        DoorPanelError::ConfigError(err.to_string())
    }
}

pub type DoorPanelResult<T> = Result<T, DoorPanelError>;

impl DoorPanelError {
    /// Builds a `DispatchFailed` for the given channel
    pub fn dispatch(channel: RobotChannel, source: io::Error) -> Self {
        DoorPanelError::DispatchFailed { channel, source }
    }
}
