// ---------------------------------------------------------------------------
// level – Whole-context gather and the fixed restore order
// ---------------------------------------------------------------------------

use bevy::prelude::*;

use scene::{Activatable, AttachedNote, AudioDiary, Door, Drawer, GenericState, Journal, TriggerZone};

use crate::snapshot_types::LevelRecord;

use super::match_in_place::{gather_matched, restore_matched};
use super::report::LevelRestoreReport;
use super::world_items::{gather_pickups, gather_world_items, restore_pickups, restore_world_items};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreOptions {
    /// Leave the held object alive while world-placed items are replaced.
    pub preserve_held: bool,
}

pub fn gather_level(world: &mut World) -> LevelRecord {
    LevelRecord {
        world_inventory_items: gather_world_items(world),
        world_pickups: gather_pickups(world),
        triggers: gather_matched::<TriggerZone>(world),
        activatables: gather_matched::<Activatable>(world),
        notes: gather_matched::<AttachedNote>(world),
        diaries: gather_matched::<AudioDiary>(world),
        journals: gather_matched::<Journal>(world),
        doors: gather_matched::<Door>(world),
        generic_objects: gather_matched::<GenericState>(world),
        drawers: gather_matched::<Drawer>(world),
    }
}

/// Writes `record` back onto the loaded context.
///
/// Order matters: world-placed items are re-instantiated with their
/// attachments in authoring state, so notes, diaries and journals must be
/// applied after them. Player and inventory are restored by the caller,
/// after this returns.
pub fn restore_level(world: &mut World, record: &LevelRecord, options: RestoreOptions) -> LevelRestoreReport {
    let categories = vec![
        restore_matched::<TriggerZone>(world, &record.triggers),
        restore_matched::<Activatable>(world, &record.activatables),
        restore_matched::<Door>(world, &record.doors),
        restore_matched::<Drawer>(world, &record.drawers),
        restore_matched::<GenericState>(world, &record.generic_objects),
        restore_world_items(world, &record.world_inventory_items, options.preserve_held),
        restore_pickups(world, &record.world_pickups, options.preserve_held),
        restore_matched::<AttachedNote>(world, &record.notes),
        restore_matched::<AudioDiary>(world, &record.diaries),
        restore_matched::<Journal>(world, &record.journals),
    ];

    let report = LevelRestoreReport { categories };
    if report.is_clean() {
        debug!("Restored {} records", report.total_applied());
    } else {
        warn!(
            "Restored {} records ({} missing, {} failed)",
            report.total_applied(),
            report.total_missed(),
            report.total_failed()
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item_registry::ItemRegistry;
    use scene::{Inventory, PrefabLibrary, SwingState, WorldPickup};

    fn build_authored(world: &mut World) {
        world.spawn((Name::new("T1"), TriggerZone::default()));
        world.spawn((Name::new("D1"), Door::default()));
        world.spawn((Name::new("J1"), Journal::default()));
        let note = world.spawn((Name::new("crate_note"), AttachedNote::default())).id();
        world
            .spawn((Name::new("crate (1)"), WorldPickup, Transform::from_xyz(2.0, 0.0, 0.0)))
            .add_child(note);
    }

    fn world_with_prefabs() -> World {
        let mut world = World::new();
        world.init_resource::<Inventory>();
        world.init_resource::<ItemRegistry>();
        let mut library = PrefabLibrary::default();
        library.register("crate", |world: &mut World, t: Transform| {
            let note = world.spawn((Name::new("crate_note"), AttachedNote::default())).id();
            let mut root = world.spawn((Name::new("crate"), t));
            root.add_child(note);
            root.id()
        });
        world.insert_resource(library);
        world
    }

    fn note_collected(world: &mut World) -> Vec<bool> {
        let mut query = world.query::<&AttachedNote>();
        query.iter(world).map(|n| n.collected).collect()
    }

    #[test]
    fn test_unmodified_roundtrip_is_noop() {
        let mut world = world_with_prefabs();
        build_authored(&mut world);

        let before = gather_level(&mut world);
        let report = restore_level(&mut world, &before, RestoreOptions::default());
        let after = gather_level(&mut world);

        assert!(report.is_clean(), "{report:?}");
        assert_eq!(before, after);
    }

    #[test]
    fn test_attached_note_state_survives_reinstantiation() {
        let mut world = world_with_prefabs();
        build_authored(&mut world);
        {
            let mut query = world.query::<&mut AttachedNote>();
            for mut note in query.iter_mut(&mut world) {
                note.collected = true;
            }
        }
        let saved = gather_level(&mut world);

        // Fresh load of the context: everything back to authoring defaults.
        let mut world = world_with_prefabs();
        build_authored(&mut world);
        assert_eq!(note_collected(&mut world), vec![false]);

        let report = restore_level(&mut world, &saved, RestoreOptions::default());

        assert_eq!(report.category("world_pickup").map(|r| r.applied), Some(1));
        assert_eq!(note_collected(&mut world), vec![true]);
    }

    #[test]
    fn test_restore_overwrites_authored_defaults() {
        let mut world = world_with_prefabs();
        build_authored(&mut world);
        {
            let mut doors = world.query::<&mut Door>();
            doors.single_mut(&mut world).0.state = SwingState::Open;
        }
        let saved = gather_level(&mut world);

        let mut world = world_with_prefabs();
        build_authored(&mut world);
        restore_level(&mut world, &saved, RestoreOptions::default());

        let mut doors = world.query::<&Door>();
        assert_eq!(doors.single(&world).0.state, SwingState::Open);
    }

    #[test]
    fn test_empty_record_gathers_padding_only() {
        let mut world = world_with_prefabs();
        let record = gather_level(&mut world);
        assert_eq!(record.world_inventory_items.len(), 1);
        assert_eq!(record.world_pickups.len(), 1);
        assert!(record.triggers.is_empty());
        assert!(record.doors.is_empty());
        assert_eq!(record.record_count(), 0);
    }
}
