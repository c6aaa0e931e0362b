pub mod catalog;
pub mod urscript;

pub use catalog::{template_for, MotionProgramTemplate, GRIP_FORCE_TOKEN, GRIP_WIDTH_TOKEN};
