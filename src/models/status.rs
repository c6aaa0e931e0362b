//! # Operator Status Vocabulary

//! Every control panel action ends in exactly one of these messages. Rejections and failures are
//! ordinary values here, never panics, so the operator can always keep issuing commands (including stop).

use derive_more::Display;
use serde::{Deserialize, Serialize};
use crate::errors::TransitionRejected;
use crate::models::{DoorSlot, GripParameters, GripSizeCategory};

#[derive(Debug, Display, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatusMessage {
    #[display("Please enter username and password.")]
    MissingCredentials,
    #[display("Username does not exist.")]
    UnknownUsername,
    #[display("Incorrect password.")]
    IncorrectPassword,
    #[display("Status: Logged in as {_0}.")]
    LoggedIn(String),
    #[display("Status: Please log in first.")]
    NotLoggedIn,
    #[display("Status: Logged out.")]
    LoggedOut,
    #[display("Status: Door size set to {_0}.")]
    SizeSelected(GripSizeCategory),
    #[display("Status: Brake released. Order started by {_0}.")]
    BrakeReleased(String),
    #[display("Status: Brake released. Order by {_0} still in progress.")]
    BrakeReleasedOrderInProgress(String),
    #[display("Status: Door #{slot} at work table (size: {size}, width: {} mm, force: {}).", grip.width_mm, grip.force)]
    DoorAtTable {
        slot: DoorSlot,
        size: GripSizeCategory,
        grip: GripParameters,
    },
    #[display("Status: Door #{_0} already at work table.")]
    DoorAlreadyAtTable(DoorSlot),
    #[display("Status: All doors processed.")]
    AllDoorsProcessed,
    #[display("Status: No door at work table.")]
    NoDoorAtTable,
    #[display("Status: Door #{planned} is no longer current (door #{current} is).")]
    StalePlan { planned: DoorSlot, current: DoorSlot },
    #[display("Status: Door #{_0} stored.")]
    DoorStored(DoorSlot),
    #[display("Status: Stop sent.")]
    StopSent,
    #[display("Status: Order finished by {_0}.")]
    OrderFinished(String),
    #[display("Status: No active order to finish.")]
    NoActiveOrder,
    #[display("Error: {_0}")]
    Error(String),
}

impl StatusMessage {
    /// Whether this message reports a failure rather than a completed or refused action
    pub fn is_error(&self) -> bool {
        matches!(self, StatusMessage::Error(_))
    }
}

impl From<TransitionRejected> for StatusMessage {
    fn from(reason: TransitionRejected) -> Self {
        match reason {
            TransitionRejected::AllDoorsProcessed => StatusMessage::AllDoorsProcessed,
            TransitionRejected::DoorAlreadyAtTable(slot) => StatusMessage::DoorAlreadyAtTable(slot),
            TransitionRejected::NoDoorAtTable => StatusMessage::NoDoorAtTable,
            TransitionRejected::StalePlan { planned, current } => StatusMessage::StalePlan { planned, current },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn door_at_table_reports_grip_details() {
        let message = StatusMessage::DoorAtTable {
            slot: DoorSlot::FIRST,
            size: GripSizeCategory::Large,
            grip: GripParameters::new(64, 20),
        };
        assert_eq!(
            message.to_string(),
            "Status: Door #1 at work table (size: Large, width: 64 mm, force: 20)."
        );
    }

    #[test]
    fn rejections_map_to_informational_status() {
        let message = StatusMessage::from(TransitionRejected::NoDoorAtTable);
        assert_eq!(message.to_string(), "Status: No door at work table.");
        assert!(!message.is_error());
    }

    #[test]
    fn stale_plan_names_both_doors() {
        let planned = DoorSlot::FIRST;
        let current = DoorSlot::new(2).unwrap();
        let message = StatusMessage::from(TransitionRejected::StalePlan { planned, current });
        assert_eq!(message.to_string(), "Status: Door #1 is no longer current (door #2 is).");
    }
}
