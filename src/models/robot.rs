//! # Robot Controller Channels

//! The robot controller exposes two plain TCP endpoints: a dashboard port for short control commands and a
//! script port that accepts complete motion programs. Each transmission uses a fresh connection.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// The controller endpoint a payload is written to.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RobotChannel {
    /// Dashboard server, one line command per connection.
    #[display("control")]
    Control,
    /// Script server, one complete program per connection.
    #[display("motion")]
    Motion,
}

/// Unparameterized commands sent on the control channel.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlCommand {
    #[display("brake release")]
    BrakeRelease,
    #[display("stop")]
    Stop,
}

impl ControlCommand {
    /// The literal text understood by the dashboard server
    pub fn as_str(self) -> &'static str {
        match self {
            ControlCommand::BrakeRelease => "brake release",
            ControlCommand::Stop => "stop",
        }
    }
}
