// ---------------------------------------------------------------------------
// Per-entity snapshots: one flat shape per category
// ---------------------------------------------------------------------------

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use bevy::prelude::{Quat, Transform, Vec3};

/// Position and orientation of a world-placed entity. Scale is not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct TransformSnapshot {
    pub position: [f32; 3],
    pub rotation: [f32; 4],
}

impl Default for TransformSnapshot {
    fn default() -> Self {
        Self::from(&Transform::IDENTITY)
    }
}

impl From<&Transform> for TransformSnapshot {
    fn from(t: &Transform) -> Self {
        Self {
            position: t.translation.to_array(),
            rotation: t.rotation.to_array(),
        }
    }
}

impl TransformSnapshot {
    pub fn to_transform(&self) -> Transform {
        Transform::from_translation(Vec3::from_array(self.position))
            .with_rotation(Quat::from_array(self.rotation))
    }
}

/// A world-placed inventory item. `kind` is an `ItemKind` code from
/// `save_codec`; 0 only appears in the padding record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct WorldItemSnapshot {
    pub kind: u8,
    pub transform: TransformSnapshot,
}

/// A world-placed pickup, identified by its scrubbed base name, which is
/// also its prefab path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct PickupSnapshot {
    pub base_name: String,
    pub transform: TransformSnapshot,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct TriggerSnapshot {
    pub name: String,
    pub armed: bool,
    pub tripped: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct ActivatableSnapshot {
    pub name: String,
    pub fired_once: bool,
    pub toggled_on: bool,
    pub hint: String,
}

/// Shared by doors and drawers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SwingSnapshot {
    pub name: String,
    /// `SwingState` code from `save_codec`.
    pub state: u8,
    pub hint: String,
    pub travel: [f32; 3],
    pub locked_inside: bool,
    pub locked_outside: bool,
}

pub type DoorSnapshot = SwingSnapshot;
pub type DrawerSnapshot = SwingSnapshot;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct NoteSnapshot {
    pub name: String,
    pub collected: bool,
}

/// Covers both diary variants; names are unique across them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct DiarySnapshot {
    pub name: String,
    pub played: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct JournalSnapshot {
    pub name: String,
    pub read: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct GenericSnapshot {
    pub name: String,
    pub int_slot: i32,
    pub float_slot: f32,
    pub flag: bool,
}
