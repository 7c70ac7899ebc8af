// ---------------------------------------------------------------------------
// LevelRecord – every category array of one context, in file order
// ---------------------------------------------------------------------------

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use super::entity_types::*;

/// Bundle written to `level_<N>.dat`.
///
/// bitcode encodes fields in declaration order, so this order is the file
/// layout: reordering fields requires a `LEVEL_SCHEMA_VERSION` bump.
/// `world_inventory_items` and `world_pickups` always start with a padding
/// record that carries no data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct LevelRecord {
    pub world_inventory_items: Vec<WorldItemSnapshot>,
    pub world_pickups: Vec<PickupSnapshot>,
    pub triggers: Vec<TriggerSnapshot>,
    pub activatables: Vec<ActivatableSnapshot>,
    pub notes: Vec<NoteSnapshot>,
    pub diaries: Vec<DiarySnapshot>,
    pub journals: Vec<JournalSnapshot>,
    pub doors: Vec<DoorSnapshot>,
    pub generic_objects: Vec<GenericSnapshot>,
    pub drawers: Vec<DrawerSnapshot>,
}

impl LevelRecord {
    /// Indented JSON rendering for inspecting a level file by hand.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Number of real (non-padding) records across all categories.
    pub fn record_count(&self) -> usize {
        self.world_inventory_items.len().saturating_sub(1)
            + self.world_pickups.len().saturating_sub(1)
            + self.triggers.len()
            + self.activatables.len()
            + self.notes.len()
            + self.diaries.len()
            + self.journals.len()
            + self.doors.len()
            + self.generic_objects.len()
            + self.drawers.len()
    }
}
