//! World-state persistence.
//!
//! Snapshots the loaded context (interactive entities, world-placed items),
//! the player and the inventory into a two-tier file layout, and rebuilds
//! that state after a context change or an explicit load. Requests go in as
//! `PersistenceRequest` events (or through the `Persistence` system param);
//! outcomes come back as `PersistenceFinished`.

mod atomic_write;
pub mod collector;
pub mod coordinator;
mod crash_recovery;
mod file_header;
pub mod item_registry;
pub mod layout;
mod options_io;
mod persistence_plugin;
pub mod record_io;
mod save_codec;
mod save_error;
pub mod snapshot_types;

#[cfg(test)]
mod test_harness;

pub use coordinator::{
    OperationState, PersistenceConfig, PersistenceCoordinator, PersistenceFinished,
    PersistenceRequest, SubPhase,
};
pub use crash_recovery::CrashRecoveryState;
pub use item_registry::{ItemRegistry, ITEM_RESOURCE_TABLE};
pub use layout::{SaveLayout, Tier};
pub use options_io::{load_options, save_options};
pub use persistence_plugin::{Persistence, PersistencePlugin, PersistenceSet};
pub use save_codec::{item_kind_to_u8, swing_state_to_u8, u8_to_item_kind, u8_to_swing_state};
pub use save_error::SaveError;
