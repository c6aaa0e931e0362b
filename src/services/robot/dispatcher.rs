//! # Command Dispatcher

//! The only path by which the controller affects the physical cell. Renders motion programs, frames every
//! payload with a single trailing line feed and hands it to the `Transport`. No reply is read and nothing
//! is retried.

use std::sync::Arc;
use tracing::{error, info};
use crate::errors::DoorPanelResult;
use crate::models::{ControlCommand, Direction, DoorSlot, GripParameters, RobotChannel};
use crate::programs::template_for;
use crate::services::robot::transport::Transport;

/// Ensures the payload ends with exactly one line feed appended by us.
///
/// A payload that already ends in `\n` is returned unchanged.
pub fn frame_payload(message: &str) -> String {
    if message.ends_with('\n') {
        message.to_string()
    } else {
        format!("{}\n", message)
    }
}

/// First non-blank line of a payload, used to identify a transmission in the audit log
fn first_line(payload: &str) -> &str {
    payload.lines().map(str::trim).find(|line| !line.is_empty()).unwrap_or("")
}

#[derive(Clone)]
pub struct CommandDispatcher {
    transport: Arc<dyn Transport>,
}

impl CommandDispatcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Sends a short fixed command on the control channel
    pub async fn send_control_command(&self, command: &str) -> DoorPanelResult<()> {
        self.transmit(RobotChannel::Control, &frame_payload(command)).await
    }

    pub async fn send_control(&self, command: ControlCommand) -> DoorPanelResult<()> {
        self.send_control_command(command.as_str()).await
    }

    /// Renders the program for `(slot, direction)` and sends it on the motion channel
    ///
    /// # Arguments
    ///
    /// * `slot`: The door slot approved by the door sequence
    /// * `direction`: Which way the door travels
    /// * `grip`: Width and force for pick programs, ignored for storage programs
    ///
    /// # Returns
    ///
    /// * `Ok(())` once the whole program has been written
    /// * `Err(DoorPanelError::TemplateError)` if rendering fails, nothing is sent in that case
    /// * `Err(DoorPanelError::DispatchFailed)` if the transmission fails
    pub async fn send_motion_program(&self, slot: DoorSlot, direction: Direction, grip: Option<GripParameters>) -> DoorPanelResult<()> {
        let program = template_for(slot, direction)?.render(grip)?;
        self.transmit(RobotChannel::Motion, &frame_payload(&program)).await
    }

    async fn transmit(&self, channel: RobotChannel, payload: &str) -> DoorPanelResult<()> {
        let port = self.transport.port(channel);
        match self.transport.transmit(channel, payload.as_bytes()).await {
            Ok(()) => {
                info!(
                    target: "door_panels::dispatch",
                    "Sent {} bytes on {} channel (port {}): {}",
                    payload.len(), channel, port, first_line(payload)
                );
                Ok(())
            }
            Err(e) => {
                error!(
                    target: "door_panels::dispatch",
                    "Failed to send {} bytes on {} channel (port {}): {}",
                    payload.len(), channel, port, e
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newline_is_appended_once_when_missing() {
        assert_eq!(frame_payload("stop"), "stop\n");
    }

    #[test]
    fn existing_newline_is_not_doubled() {
        assert_eq!(frame_payload("stop\n"), "stop\n");
        assert_eq!(frame_payload(&frame_payload("brake release")), "brake release\n");
    }

    #[test]
    fn empty_message_becomes_a_bare_line_feed() {
        assert_eq!(frame_payload(""), "\n");
    }

    #[test]
    fn first_line_skips_leading_blank_lines() {
        assert_eq!(first_line("\n\n  def move_door1_to_storage():\n  end\n"), "def move_door1_to_storage():");
        assert_eq!(first_line("stop\n"), "stop");
    }
}
