// ---------------------------------------------------------------------------
// item_registry – Item kind -> reconstructable resource path
// ---------------------------------------------------------------------------

use std::collections::HashMap;

use bevy::prelude::*;
use scene::ItemKind;

/// Fixed table the default registry is built from. Every entry must have a
/// matching prefab in the host's `PrefabLibrary`.
pub const ITEM_RESOURCE_TABLE: &[(ItemKind, &str)] = &[
    (ItemKind::Keycard, "items/keycard"),
    (ItemKind::Crowbar, "items/crowbar"),
    (ItemKind::Flashlight, "items/flashlight"),
    (ItemKind::Battery, "items/battery"),
    (ItemKind::Medkit, "items/medkit"),
    (ItemKind::Fuse, "items/fuse"),
    (ItemKind::ValveWheel, "items/valve_wheel"),
    (ItemKind::Cassette, "items/cassette"),
    (ItemKind::Lighter, "items/lighter"),
    (ItemKind::Lockpick, "items/lockpick"),
    (ItemKind::Gasoline, "items/gasoline"),
    (ItemKind::Film, "items/film"),
];

/// Read-only after startup.
#[derive(Resource, Debug, Clone)]
pub struct ItemRegistry {
    paths: HashMap<ItemKind, &'static str>,
}

impl Default for ItemRegistry {
    fn default() -> Self {
        Self::from_table(ITEM_RESOURCE_TABLE)
    }
}

impl ItemRegistry {
    /// Later entries win when a kind appears twice.
    pub fn from_table(table: &[(ItemKind, &'static str)]) -> Self {
        Self {
            paths: table.iter().copied().collect(),
        }
    }

    pub fn resource_path_for(&self, kind: ItemKind) -> Option<&'static str> {
        self.paths.get(&kind).copied()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
