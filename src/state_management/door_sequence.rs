//! # Door Sequence State Machine

//! Tracks which stack slot is picked next and whether a door occupies the single-capacity work table.
//! Slots go 1 → 2 → 3, one at a time, each making a full stack → table → storage cycle before the next.
//!
//! Moves are split into a `plan_*` step that checks legality and names the slot, and a `complete` step
//! that applies the transition. The control panel transmits in between, so a failed send never advances
//! the sequence.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use crate::errors::TransitionRejected;
use crate::models::{Direction, DoorSlot, DOOR_SLOT_COUNT};

/// Externally visible state of the door sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoorCellState {
    /// Work table empty, the given slot is next to be picked.
    AwaitingPick(DoorSlot),
    /// The door from the given slot is on the work table.
    DoorAtTable(DoorSlot),
    /// All slots processed and the work table is empty.
    Complete,
}

/// A move the sequence has approved but not yet applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedMove {
    pub slot: DoorSlot,
    pub direction: Direction,
}

/// Per-session door sequence. Created at login, reset on logout, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorSequence {
    /// Next slot to pick, `DOOR_SLOT_COUNT + 1` once all doors are done
    next_door_index: u8,
    /// Slot currently on the work table
    last_door_at_table: Option<DoorSlot>,
}

impl Default for DoorSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl DoorSequence {
    pub fn new() -> Self {
        Self {
            next_door_index: DoorSlot::FIRST.index(),
            last_door_at_table: None,
        }
    }

    pub fn state(&self) -> DoorCellState {
        match self.last_door_at_table {
            Some(slot) => DoorCellState::DoorAtTable(slot),
            None => match DoorSlot::new(self.next_door_index) {
                Ok(slot) => DoorCellState::AwaitingPick(slot),
                Err(_) => DoorCellState::Complete,
            },
        }
    }

    pub fn next_door_index(&self) -> u8 {
        self.next_door_index
    }

    pub fn door_at_table(&self) -> Option<DoorSlot> {
        self.last_door_at_table
    }

    pub fn is_complete(&self) -> bool {
        self.state() == DoorCellState::Complete
    }

    pub fn can_move_to_work_table(&self) -> bool {
        self.plan_move_to_work_table().is_ok()
    }

    pub fn can_move_to_storage(&self) -> bool {
        self.plan_move_to_storage().is_ok()
    }

    /// Checks that the next door may be picked and names its slot
    pub fn plan_move_to_work_table(&self) -> Result<PlannedMove, TransitionRejected> {
        match self.state() {
            DoorCellState::AwaitingPick(slot) => Ok(PlannedMove { slot, direction: Direction::ToWorkTable }),
            DoorCellState::DoorAtTable(slot) => Err(TransitionRejected::DoorAlreadyAtTable(slot)),
            DoorCellState::Complete => Err(TransitionRejected::AllDoorsProcessed),
        }
    }

    /// Checks that a door is on the table and names its slot
    pub fn plan_move_to_storage(&self) -> Result<PlannedMove, TransitionRejected> {
        match self.state() {
            DoorCellState::DoorAtTable(slot) => Ok(PlannedMove { slot, direction: Direction::ToStorage }),
            DoorCellState::AwaitingPick(_) | DoorCellState::Complete => Err(TransitionRejected::NoDoorAtTable),
        }
    }

    /// Applies a planned move once its program has been transmitted.
    ///
    /// The plan is re-validated so a stale plan cannot corrupt the sequence.
    pub fn complete(&mut self, planned: PlannedMove) -> Result<DoorCellState, TransitionRejected> {
        let before = self.state();
        match planned.direction {
            Direction::ToWorkTable => {
                let current = self.plan_move_to_work_table()?;
                if current.slot != planned.slot {
                    return Err(TransitionRejected::StalePlan { planned: planned.slot, current: current.slot });
                }
                self.last_door_at_table = Some(planned.slot);
            }
            Direction::ToStorage => {
                let current = self.plan_move_to_storage()?;
                if current.slot != planned.slot {
                    return Err(TransitionRejected::StalePlan { planned: planned.slot, current: current.slot });
                }
                self.last_door_at_table = None;
                self.next_door_index = (self.next_door_index + 1).min(DOOR_SLOT_COUNT + 1);
            }
        }
        let after = self.state();
        info!("Door sequence: {:?} -> {:?}", before, after);
        Ok(after)
    }

    /// Plans and applies a pick in one step
    pub fn request_move_to_work_table(&mut self) -> Result<DoorSlot, TransitionRejected> {
        let planned = self.plan_move_to_work_table()?;
        self.complete(planned)?;
        Ok(planned.slot)
    }

    /// Plans and applies a store in one step
    pub fn request_move_to_storage(&mut self) -> Result<DoorSlot, TransitionRejected> {
        let planned = self.plan_move_to_storage()?;
        self.complete(planned)?;
        Ok(planned.slot)
    }

    /// Back to `AwaitingPick(1)` from any state
    pub fn reset(&mut self) {
        debug!("Door sequence reset from {:?}", self.state());
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(index: u8) -> DoorSlot {
        DoorSlot::new(index).unwrap()
    }

    /// Every state reachable from the initial one by legal moves
    fn reachable_states() -> Vec<DoorSequence> {
        let mut states = vec![DoorSequence::new()];
        let mut current = DoorSequence::new();
        while !current.is_complete() {
            current.request_move_to_work_table().unwrap();
            states.push(current.clone());
            current.request_move_to_storage().unwrap();
            states.push(current.clone());
        }
        states
    }

    #[test]
    fn starts_awaiting_the_first_door() {
        assert_eq!(DoorSequence::new().state(), DoorCellState::AwaitingPick(DoorSlot::FIRST));
    }

    #[test]
    fn three_full_cycles_reach_complete_in_order() {
        let mut sequence = DoorSequence::new();
        let mut trace = vec![sequence.state()];
        for _ in 0..3 {
            sequence.request_move_to_work_table().unwrap();
            trace.push(sequence.state());
            sequence.request_move_to_storage().unwrap();
            trace.push(sequence.state());
        }
        assert_eq!(trace, vec![
            DoorCellState::AwaitingPick(slot(1)),
            DoorCellState::DoorAtTable(slot(1)),
            DoorCellState::AwaitingPick(slot(2)),
            DoorCellState::DoorAtTable(slot(2)),
            DoorCellState::AwaitingPick(slot(3)),
            DoorCellState::DoorAtTable(slot(3)),
            DoorCellState::Complete,
        ]);
    }

    #[test]
    fn storage_is_never_allowed_with_an_empty_table() {
        for sequence in reachable_states() {
            if sequence.door_at_table().is_none() {
                assert_eq!(sequence.plan_move_to_storage(), Err(TransitionRejected::NoDoorAtTable));
            }
        }
    }

    #[test]
    fn pick_is_never_allowed_with_an_occupied_table_or_when_complete() {
        for sequence in reachable_states() {
            match sequence.state() {
                DoorCellState::DoorAtTable(slot) => assert_eq!(
                    sequence.plan_move_to_work_table(),
                    Err(TransitionRejected::DoorAlreadyAtTable(slot))
                ),
                DoorCellState::Complete => assert_eq!(
                    sequence.plan_move_to_work_table(),
                    Err(TransitionRejected::AllDoorsProcessed)
                ),
                DoorCellState::AwaitingPick(_) => assert!(sequence.can_move_to_work_table()),
            }
        }
    }

    #[test]
    fn rejected_requests_leave_the_state_unchanged() {
        let mut sequence = DoorSequence::new();
        assert_eq!(sequence.request_move_to_storage(), Err(TransitionRejected::NoDoorAtTable));
        assert_eq!(sequence, DoorSequence::new());

        sequence.request_move_to_work_table().unwrap();
        let at_table = sequence.clone();
        assert_eq!(sequence.request_move_to_work_table(), Err(TransitionRejected::DoorAlreadyAtTable(slot(1))));
        assert_eq!(sequence, at_table);
    }

    #[test]
    fn complete_stays_complete_until_reset() {
        let mut sequence = reachable_states().pop().unwrap();
        assert!(sequence.is_complete());
        assert_eq!(sequence.request_move_to_work_table(), Err(TransitionRejected::AllDoorsProcessed));
        assert_eq!(sequence.request_move_to_storage(), Err(TransitionRejected::NoDoorAtTable));
        assert_eq!(sequence.next_door_index(), DOOR_SLOT_COUNT + 1);
        assert!(sequence.is_complete());
    }

    #[test]
    fn reset_returns_to_the_first_door_from_any_state() {
        for mut sequence in reachable_states() {
            sequence.reset();
            assert_eq!(sequence.state(), DoorCellState::AwaitingPick(DoorSlot::FIRST));
            assert_eq!(sequence.door_at_table(), None);
        }
    }

    #[test]
    fn planning_alone_does_not_transition() {
        let sequence = DoorSequence::new();
        let planned = sequence.plan_move_to_work_table().unwrap();
        assert_eq!(planned, PlannedMove { slot: slot(1), direction: Direction::ToWorkTable });
        assert_eq!(sequence.state(), DoorCellState::AwaitingPick(slot(1)));
    }

    #[test]
    fn stale_plans_are_refused() {
        let mut sequence = DoorSequence::new();
        let stale = sequence.plan_move_to_work_table().unwrap();
        sequence.complete(stale).unwrap();
        assert!(sequence.complete(stale).is_err());
        assert_eq!(sequence.state(), DoorCellState::DoorAtTable(slot(1)));
    }

    #[test]
    fn stale_pick_on_an_empty_table_names_both_doors() {
        let mut sequence = DoorSequence::new();
        let stale = sequence.plan_move_to_work_table().unwrap();
        sequence.request_move_to_work_table().unwrap();
        sequence.request_move_to_storage().unwrap();

        assert_eq!(
            sequence.complete(stale),
            Err(TransitionRejected::StalePlan { planned: slot(1), current: slot(2) })
        );
        assert_eq!(sequence.state(), DoorCellState::AwaitingPick(slot(2)));
    }

    #[test]
    fn stale_store_names_the_door_actually_on_the_table() {
        let mut sequence = DoorSequence::new();
        sequence.request_move_to_work_table().unwrap();
        let stale = sequence.plan_move_to_storage().unwrap();
        sequence.complete(stale).unwrap();
        sequence.request_move_to_work_table().unwrap();

        assert_eq!(
            sequence.complete(stale),
            Err(TransitionRejected::StalePlan { planned: slot(1), current: slot(2) })
        );
        assert_eq!(sequence.state(), DoorCellState::DoorAtTable(slot(2)));
    }
}
