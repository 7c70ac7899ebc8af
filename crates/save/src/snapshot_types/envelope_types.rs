// ---------------------------------------------------------------------------
// Singleton envelopes: core, player, inventory, options
// ---------------------------------------------------------------------------

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use scene::{ContextId, UserOptions};

/// `CoreSnapshot::last_context` value meaning "no saved game".
pub const NO_SAVE_SENTINEL: i64 = -1;

/// Index of the context the last manual save was taken in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct CoreSnapshot {
    pub last_context: i64,
}

impl Default for CoreSnapshot {
    fn default() -> Self {
        Self::no_save()
    }
}

impl CoreSnapshot {
    pub fn no_save() -> Self {
        Self {
            last_context: NO_SAVE_SENTINEL,
        }
    }

    pub fn at(context: ContextId) -> Self {
        Self {
            last_context: i64::from(context.0),
        }
    }

    /// `None` for the sentinel or any value that is not a valid index.
    pub fn saved_context(&self) -> Option<ContextId> {
        u32::try_from(self.last_context).ok().map(ContextId)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct PlayerSnapshot {
    pub position: [f32; 3],
    pub rotation: [f32; 4],
    pub look_focus: [f32; 3],
    pub crouched: bool,
    pub docked: bool,
    pub dock_target: String,
    /// min yaw, max yaw, min pitch, max pitch (degrees).
    pub look_limits: [f32; 4],
    pub pending_focus: Option<[f32; 3]>,
    pub pending_position: Option<[f32; 3]>,
}

/// What the player has in hand. Only orientation is kept; the held object is
/// re-spawned at the player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub enum HeldObjectSnapshot {
    #[default]
    Empty,
    Pickup {
        base_name: String,
        rotation: [f32; 4],
    },
    InventoryItem {
        kind: u8,
        rotation: [f32; 4],
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct StackSnapshot {
    pub kind: u8,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct NoteEntrySnapshot {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct AudioLogEntrySnapshot {
    pub name: String,
}

/// List order is display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct InventorySnapshot {
    pub held: HeldObjectSnapshot,
    pub stacks: Vec<StackSnapshot>,
    pub notes: Vec<NoteEntrySnapshot>,
    pub audio_logs: Vec<AudioLogEntrySnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct OptionsSnapshot {
    pub master_volume: f32,
    pub music_volume: f32,
    pub effects_volume: f32,
    pub mouse_sensitivity: f32,
    pub invert_y: bool,
    pub field_of_view: f32,
    pub subtitles: bool,
}

impl Default for OptionsSnapshot {
    fn default() -> Self {
        Self::from(&UserOptions::default())
    }
}

impl From<&UserOptions> for OptionsSnapshot {
    fn from(o: &UserOptions) -> Self {
        Self {
            master_volume: o.master_volume,
            music_volume: o.music_volume,
            effects_volume: o.effects_volume,
            mouse_sensitivity: o.mouse_sensitivity,
            invert_y: o.invert_y,
            field_of_view: o.field_of_view,
            subtitles: o.subtitles,
        }
    }
}

impl From<&OptionsSnapshot> for UserOptions {
    fn from(s: &OptionsSnapshot) -> Self {
        Self {
            master_volume: s.master_volume,
            music_volume: s.music_volume,
            effects_volume: s.effects_volume,
            mouse_sensitivity: s.mouse_sensitivity,
            invert_y: s.invert_y,
            field_of_view: s.field_of_view,
            subtitles: s.subtitles,
        }
    }
}
