//! # Door Slots and Motion Directions

//! This module defines the identifiers the door sequence works with: the three fixed storage slots of the
//! door stack and the two directions a door can travel between the stack and the work table.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of storage positions in the physical door stack
pub const DOOR_SLOT_COUNT: u8 = 3;

/// Returned when an integer outside `1..=3` is used as a door slot
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid door slot {0} (expected 1..={})", DOOR_SLOT_COUNT)]
pub struct InvalidDoorSlot(pub u8);

/// One of the three storage positions, processed strictly in ascending order.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DoorSlot(u8);

impl DoorSlot {
    pub const FIRST: DoorSlot = DoorSlot(1);
    pub const SECOND: DoorSlot = DoorSlot(2);
    pub const LAST: DoorSlot = DoorSlot(DOOR_SLOT_COUNT);

    /// Creates a slot, rejecting anything outside the stack
    pub fn new(index: u8) -> Result<Self, InvalidDoorSlot> {
        if (1..=DOOR_SLOT_COUNT).contains(&index) {
            Ok(DoorSlot(index))
        } else {
            Err(InvalidDoorSlot(index))
        }
    }

    /// The 1-based position in the stack
    pub fn index(self) -> u8 {
        self.0
    }

    /// The slot after this one, or `None` once the stack is exhausted
    pub fn next(self) -> Option<DoorSlot> {
        DoorSlot::new(self.0 + 1).ok()
    }

    /// All slots in processing order
    pub fn all() -> impl Iterator<Item = DoorSlot> {
        (1..=DOOR_SLOT_COUNT).map(DoorSlot)
    }
}

impl TryFrom<u8> for DoorSlot {
    type Error = InvalidDoorSlot;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        DoorSlot::new(value)
    }
}

impl From<DoorSlot> for u8 {
    fn from(slot: DoorSlot) -> Self {
        slot.0
    }
}

/// Which way a door travels in a motion program.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Pick the door from the stack and place it on the work table.
    #[display("to work table")]
    ToWorkTable,
    /// Take the door from the work table into the storage magazine.
    #[display("to storage")]
    ToStorage,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::ToWorkTable, Direction::ToStorage];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_are_limited_to_the_stack() {
        assert!(DoorSlot::new(0).is_err());
        assert_eq!(DoorSlot::new(1).unwrap(), DoorSlot::FIRST);
        assert_eq!(DoorSlot::new(3).unwrap(), DoorSlot::LAST);
        assert_eq!(DoorSlot::new(4), Err(InvalidDoorSlot(4)));
    }

    #[test]
    fn slots_advance_in_order_and_stop_after_the_last() {
        let order: Vec<u8> = DoorSlot::all().map(DoorSlot::index).collect();
        assert_eq!(order, vec![1, 2, 3]);
        assert_eq!(DoorSlot::FIRST.next().map(DoorSlot::index), Some(2));
        assert_eq!(DoorSlot::LAST.next(), None);
    }

    #[test]
    fn slot_displays_as_its_index() {
        assert_eq!(DoorSlot::LAST.to_string(), "3");
    }
}
