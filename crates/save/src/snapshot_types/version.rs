// ---------------------------------------------------------------------------
// Record schema versions
// ---------------------------------------------------------------------------

use crate::record_io::{RecordKind, SaveRecord};

use super::envelope_types::{CoreSnapshot, InventorySnapshot, OptionsSnapshot, PlayerSnapshot};
use super::level_record::LevelRecord;

/// v1 = sentinel-or-index core record
pub const CORE_SCHEMA_VERSION: u32 = 1;
/// v1 = pose, look focus, crouch, dock target + look limits + pending targets
pub const PLAYER_SCHEMA_VERSION: u32 = 1;
/// v1 = held descriptor, stacks, notes, audio logs
pub const INVENTORY_SCHEMA_VERSION: u32 = 1;
/// v1 = ten category arrays in `LevelRecord` field order
pub const LEVEL_SCHEMA_VERSION: u32 = 1;
/// v1 = volumes, sensitivity, invert-y, fov, subtitles
pub const OPTIONS_SCHEMA_VERSION: u32 = 1;

impl SaveRecord for CoreSnapshot {
    const KIND: RecordKind = RecordKind::Core;
    const SCHEMA_VERSION: u32 = CORE_SCHEMA_VERSION;
}

impl SaveRecord for PlayerSnapshot {
    const KIND: RecordKind = RecordKind::Player;
    const SCHEMA_VERSION: u32 = PLAYER_SCHEMA_VERSION;
}

impl SaveRecord for InventorySnapshot {
    const KIND: RecordKind = RecordKind::Inventory;
    const SCHEMA_VERSION: u32 = INVENTORY_SCHEMA_VERSION;
}

impl SaveRecord for LevelRecord {
    const KIND: RecordKind = RecordKind::Level;
    const SCHEMA_VERSION: u32 = LEVEL_SCHEMA_VERSION;
}

impl SaveRecord for OptionsSnapshot {
    const KIND: RecordKind = RecordKind::Options;
    const SCHEMA_VERSION: u32 = OPTIONS_SCHEMA_VERSION;
}
