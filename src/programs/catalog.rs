//! # Motion Program Catalog

//! An immutable map from `(DoorSlot, Direction)` to the program that performs that move. Pick programs are
//! parameterized by `GripParameters` through an explicit render step that fails loudly if a placeholder
//! is missing from the template or left over in the output.

use std::collections::HashMap;
use once_cell::sync::Lazy;
use crate::errors::{DoorPanelError, DoorPanelResult};
use crate::models::{Direction, DoorSlot, GripParameters};
use crate::programs::urscript;

pub const GRIP_WIDTH_TOKEN: &str = "{{GRIP_WIDTH}}";
pub const GRIP_FORCE_TOKEN: &str = "{{GRIP_FORCE}}";

/// A stored motion program for one door move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionProgramTemplate {
    pub slot: DoorSlot,
    pub direction: Direction,
    source: &'static str,
}

impl MotionProgramTemplate {
    /// The raw template text, placeholders included
    pub fn source(&self) -> &'static str {
        self.source
    }

    /// Whether rendering needs grip parameters
    pub fn requires_grip(&self) -> bool {
        self.direction == Direction::ToWorkTable
    }

    /// Produces the program text to transmit.
    ///
    /// Pick programs need `grip`; storage programs ignore it and come back unchanged.
    pub fn render(&self, grip: Option<GripParameters>) -> DoorPanelResult<String> {
        if !self.requires_grip() {
            return Ok(self.source.to_string());
        }

        let grip = grip.ok_or_else(|| DoorPanelError::TemplateError(format!(
            "door #{} {} program needs grip parameters", self.slot, self.direction
        )))?;

        for token in [GRIP_WIDTH_TOKEN, GRIP_FORCE_TOKEN] {
            if !self.source.contains(token) {
                return Err(DoorPanelError::TemplateError(format!(
                    "door #{} {} program is missing placeholder {}", self.slot, self.direction, token
                )));
            }
        }

        let program = self.source
            .replace(GRIP_WIDTH_TOKEN, &grip.width_mm.to_string())
            .replace(GRIP_FORCE_TOKEN, &grip.force.to_string());

        if program.contains("{{") {
            return Err(DoorPanelError::TemplateError(format!(
                "door #{} {} program has unresolved placeholders", self.slot, self.direction
            )));
        }
        Ok(program)
    }
}

static CATALOG: Lazy<HashMap<(DoorSlot, Direction), MotionProgramTemplate>> = Lazy::new(|| {
    let entries = [
        (DoorSlot::FIRST, Direction::ToWorkTable, urscript::DOOR_1_TO_WORK_TABLE),
        (DoorSlot::FIRST, Direction::ToStorage, urscript::DOOR_1_TO_STORAGE),
        (DoorSlot::SECOND, Direction::ToWorkTable, urscript::DOOR_2_TO_WORK_TABLE),
        (DoorSlot::SECOND, Direction::ToStorage, urscript::DOOR_2_TO_STORAGE),
        (DoorSlot::LAST, Direction::ToWorkTable, urscript::DOOR_3_TO_WORK_TABLE),
        (DoorSlot::LAST, Direction::ToStorage, urscript::DOOR_3_TO_STORAGE),
    ];
    entries
        .into_iter()
        .map(|(slot, direction, source)| ((slot, direction), MotionProgramTemplate { slot, direction, source }))
        .collect()
});

/// Looks up the program for a door move
pub fn template_for(slot: DoorSlot, direction: Direction) -> DoorPanelResult<&'static MotionProgramTemplate> {
    CATALOG.get(&(slot, direction)).ok_or_else(|| DoorPanelError::TemplateError(format!(
        "no motion program for door #{} {}", slot, direction
    )))
}

/// Number of programs in the catalog
pub fn len() -> usize {
    CATALOG.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn every_move() -> impl Iterator<Item = (DoorSlot, Direction)> {
        DoorSlot::all().flat_map(|slot| Direction::ALL.into_iter().map(move |direction| (slot, direction)))
    }

    #[test]
    fn one_program_per_slot_and_direction() {
        assert_eq!(len(), 6);
        for (slot, direction) in every_move() {
            let template = template_for(slot, direction).unwrap();
            assert_eq!(template.slot, slot);
            assert_eq!(template.direction, direction);
        }
    }

    #[test]
    fn programs_target_their_own_door() {
        for (slot, direction) in every_move() {
            let source = template_for(slot, direction).unwrap().source();
            let routine = match direction {
                Direction::ToWorkTable => format!("move_door{}_to_work_table()", slot),
                Direction::ToStorage => format!("move_door{}_to_storage()", slot),
            };
            assert!(source.contains(&routine), "{} {} calls {}", slot, direction, routine);
        }
    }

    #[test]
    fn pick_programs_carry_both_placeholders_and_storage_programs_none() {
        for (slot, direction) in every_move() {
            let source = template_for(slot, direction).unwrap().source();
            let has_tokens = source.contains(GRIP_WIDTH_TOKEN) && source.contains(GRIP_FORCE_TOKEN);
            assert_eq!(has_tokens, direction == Direction::ToWorkTable, "door #{} {}", slot, direction);
            assert!(direction == Direction::ToWorkTable || !source.contains("{{"));
        }
    }

    #[test]
    fn render_substitutes_width_and_force() {
        let template = template_for(DoorSlot::FIRST, Direction::ToWorkTable).unwrap();
        let program = template.render(Some(GripParameters::new(64, 20))).unwrap();
        assert!(program.contains("rg_grip(64, 20)"));
        assert!(!program.contains(GRIP_WIDTH_TOKEN));
        assert!(!program.contains(GRIP_FORCE_TOKEN));
    }

    #[test]
    fn render_leaves_the_stored_template_untouched() {
        let template = template_for(DoorSlot::SECOND, Direction::ToWorkTable).unwrap();
        let _ = template.render(Some(GripParameters::new(47, 10))).unwrap();
        assert!(template_for(DoorSlot::SECOND, Direction::ToWorkTable).unwrap().source().contains(GRIP_WIDTH_TOKEN));
    }

    #[test]
    fn rendered_text_has_nothing_left_to_substitute() {
        let template = template_for(DoorSlot::LAST, Direction::ToWorkTable).unwrap();
        let program = template.render(Some(GripParameters::new(56, 15))).unwrap();
        let again = program
            .replace(GRIP_WIDTH_TOKEN, "99")
            .replace(GRIP_FORCE_TOKEN, "99");
        assert_eq!(program, again);
    }

    #[test]
    fn pick_program_without_grip_is_an_error() {
        let template = template_for(DoorSlot::FIRST, Direction::ToWorkTable).unwrap();
        assert!(matches!(template.render(None), Err(DoorPanelError::TemplateError(_))));
    }

    #[test]
    fn storage_program_renders_verbatim() {
        let template = template_for(DoorSlot::LAST, Direction::ToStorage).unwrap();
        assert_eq!(template.render(Some(GripParameters::new(64, 20))).unwrap(), template.source());
        assert_eq!(template.render(None).unwrap(), template.source());
    }

    #[test]
    fn template_missing_a_placeholder_is_rejected() {
        let broken = MotionProgramTemplate {
            slot: DoorSlot::FIRST,
            direction: Direction::ToWorkTable,
            source: "rg_grip({{GRIP_WIDTH}}, 10)\n",
        };
        assert!(broken.render(Some(GripParameters::new(47, 10))).is_err());
    }
}
