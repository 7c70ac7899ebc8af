// ---------------------------------------------------------------------------
// save_codec – Stable u8 codes for enums stored in snapshots
// ---------------------------------------------------------------------------
//
// Codes are part of the file format: never renumber, only append.

use scene::{ItemKind, SwingState};

pub fn item_kind_to_u8(k: ItemKind) -> u8 {
    match k {
        ItemKind::Keycard => 1,
        ItemKind::Crowbar => 2,
        ItemKind::Flashlight => 3,
        ItemKind::Battery => 4,
        ItemKind::Medkit => 5,
        ItemKind::Fuse => 6,
        ItemKind::ValveWheel => 7,
        ItemKind::Cassette => 8,
        ItemKind::Lighter => 9,
        ItemKind::Lockpick => 10,
        ItemKind::Gasoline => 11,
        ItemKind::Film => 12,
    }
}

/// `None` for 0 (padding) and for codes written by a newer build.
pub fn u8_to_item_kind(v: u8) -> Option<ItemKind> {
    match v {
        1 => Some(ItemKind::Keycard),
        2 => Some(ItemKind::Crowbar),
        3 => Some(ItemKind::Flashlight),
        4 => Some(ItemKind::Battery),
        5 => Some(ItemKind::Medkit),
        6 => Some(ItemKind::Fuse),
        7 => Some(ItemKind::ValveWheel),
        8 => Some(ItemKind::Cassette),
        9 => Some(ItemKind::Lighter),
        10 => Some(ItemKind::Lockpick),
        11 => Some(ItemKind::Gasoline),
        12 => Some(ItemKind::Film),
        _ => None,
    }
}

pub fn swing_state_to_u8(s: SwingState) -> u8 {
    match s {
        SwingState::Closed => 0,
        SwingState::Open => 1,
        SwingState::Opening => 2,
        SwingState::Closing => 3,
        SwingState::Ajar => 4,
    }
}

pub fn u8_to_swing_state(v: u8) -> SwingState {
    match v {
        1 => SwingState::Open,
        2 => SwingState::Opening,
        3 => SwingState::Closing,
        4 => SwingState::Ajar,
        _ => SwingState::Closed,
    }
}
