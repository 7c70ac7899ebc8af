// ---------------------------------------------------------------------------
// items – Item kinds and world-placed item markers
// ---------------------------------------------------------------------------

use bevy::prelude::*;

/// Every item type that can sit in the inventory or lie in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemKind {
    Keycard,
    Crowbar,
    Flashlight,
    Battery,
    Medkit,
    Fuse,
    ValveWheel,
    Cassette,
    Lighter,
    Lockpick,
    Gasoline,
    Film,
}

impl ItemKind {
    pub const ALL: [ItemKind; 12] = [
        ItemKind::Keycard,
        ItemKind::Crowbar,
        ItemKind::Flashlight,
        ItemKind::Battery,
        ItemKind::Medkit,
        ItemKind::Fuse,
        ItemKind::ValveWheel,
        ItemKind::Cassette,
        ItemKind::Lighter,
        ItemKind::Lockpick,
        ItemKind::Gasoline,
        ItemKind::Film,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Keycard => "KEYCARD",
            ItemKind::Crowbar => "CROWBAR",
            ItemKind::Flashlight => "FLASHLIGHT",
            ItemKind::Battery => "BATTERY",
            ItemKind::Medkit => "MEDKIT",
            ItemKind::Fuse => "FUSE",
            ItemKind::ValveWheel => "VALVE_WHEEL",
            ItemKind::Cassette => "CASSETTE",
            ItemKind::Lighter => "LIGHTER",
            ItemKind::Lockpick => "LOCKPICK",
            ItemKind::Gasoline => "GASOLINE",
            ItemKind::Film => "FILM",
        }
    }

    /// Whether several of this kind collapse into one inventory stack.
    pub fn is_stackable(self) -> bool {
        matches!(
            self,
            ItemKind::Battery | ItemKind::Medkit | ItemKind::Fuse | ItemKind::Film
        )
    }
}

/// A loose physics prop the player can carry. Its identity is its scrubbed
/// name, which doubles as the prefab to recreate it from.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct WorldPickup;

/// An inventory item lying in the world, waiting to be picked up.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldInventoryItem {
    pub kind: ItemKind,
}

/// Clones are named `base (n)` or `base(Clone)`; everything from this
/// delimiter on is dropped to get the base name.
pub const CLONE_DELIMITER: char = '(';

/// Strips the clone suffix from an entity name.
pub fn scrub_name(name: &str) -> &str {
    match name.find(CLONE_DELIMITER) {
        Some(at) => name[..at].trim_end(),
        None => name.trim_end(),
    }
}
