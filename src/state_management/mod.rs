pub mod door_sequence;
pub mod order_session;
pub mod panel_command_processor;

pub use door_sequence::*;
pub use order_session::*;
pub use panel_command_processor::*;
