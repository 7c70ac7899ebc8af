// ---------------------------------------------------------------------------
// collector – Gather live entity state into snapshots and write it back
// ---------------------------------------------------------------------------
//
// Stateless: every routine takes the world and returns values. Two restore
// strategies exist. Match-in-place categories keep the authored entities and
// overwrite their state by name; instantiate categories throw the live
// entities away and spawn fresh ones from the prefab library.

mod inventory_stage;
mod level;
mod match_in_place;
mod name_index;
mod player_stage;
mod report;
mod world_items;

pub use inventory_stage::{clear_inventory, gather_inventory, restore_inventory};
pub use level::{gather_level, restore_level, RestoreOptions};
pub use match_in_place::{gather_matched, restore_matched, MatchInPlace};
pub use name_index::NameIndex;
pub use player_stage::{gather_player, reposition_at_entrance, restore_player};
pub use report::{LevelRestoreReport, RestoreReport};
pub use world_items::{
    clear_world_items, gather_pickups, gather_world_items, held_entity, restore_pickups,
    restore_world_items,
};
