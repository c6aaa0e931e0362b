//! # Grip Parameters

//! Maps the operator-selected door size to the gripper width and force injected into pick programs.
//! The mapping is total: any input that is not one of the three known sizes resolves to the fallback entry.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// The door size category chosen on the control panel.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GripSizeCategory {
    Small,
    Medium,
    Large,
    /// Anything that did not match a known size.
    Unrecognized,
}

impl GripSizeCategory {
    pub const KNOWN: [GripSizeCategory; 3] = [
        GripSizeCategory::Small,
        GripSizeCategory::Medium,
        GripSizeCategory::Large,
    ];

    /// Parses an operator selection. Never fails: unknown text becomes `Unrecognized`.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        Self::KNOWN
            .into_iter()
            .find(|category| category.to_string().eq_ignore_ascii_case(input))
            .unwrap_or(GripSizeCategory::Unrecognized)
    }

    /// The grip width and force for this size
    pub fn grip_parameters(self) -> GripParameters {
        resolve(self)
    }
}

impl From<&str> for GripSizeCategory {
    fn from(input: &str) -> Self {
        GripSizeCategory::parse(input)
    }
}

/// Width and force handed to the gripper when picking a door.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[display("width: {width_mm} mm, force: {force}")]
pub struct GripParameters {
    /// Finger opening in millimetres
    pub width_mm: u32,
    /// Gripper force setpoint
    pub force: u32,
}

impl GripParameters {
    pub const fn new(width_mm: u32, force: u32) -> Self {
        Self { width_mm, force }
    }
}

/// Resolves a size category to its grip parameters.
///
/// The fallback (48 mm, 10) is intentionally not the same as `Medium`.
pub fn resolve(category: GripSizeCategory) -> GripParameters {
    match category {
        GripSizeCategory::Small => GripParameters::new(47, 10),
        GripSizeCategory::Medium => GripParameters::new(56, 15),
        GripSizeCategory::Large => GripParameters::new(64, 20),
        GripSizeCategory::Unrecognized => GripParameters::new(48, 10),
    }
}
