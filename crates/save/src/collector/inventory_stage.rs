use bevy::hierarchy::DespawnRecursiveExt;
use bevy::prelude::*;

use scene::{
    scrub_name, spawn_prefab, ContextScoped, Inventory, ItemStack, Player, WorldInventoryItem,
    WorldPickup,
};

use crate::item_registry::ItemRegistry;
use crate::save_codec::{item_kind_to_u8, u8_to_item_kind};
use crate::snapshot_types::*;

use super::report::RestoreReport;
use super::world_items::held_entity;

fn describe_held(world: &World, held: Entity) -> HeldObjectSnapshot {
    let Ok(entity) = world.get_entity(held) else {
        return HeldObjectSnapshot::Empty;
    };
    let rotation = entity
        .get::<Transform>()
        .map_or(Quat::IDENTITY, |t| t.rotation)
        .to_array();

    if let Some(item) = entity.get::<WorldInventoryItem>() {
        return HeldObjectSnapshot::InventoryItem {
            kind: item_kind_to_u8(item.kind),
            rotation,
        };
    }
    match entity.get::<Name>() {
        Some(name) if entity.contains::<WorldPickup>() => HeldObjectSnapshot::Pickup {
            base_name: scrub_name(name.as_str()).to_string(),
            rotation,
        },
        _ => HeldObjectSnapshot::Empty,
    }
}

pub fn gather_inventory(world: &mut World) -> InventorySnapshot {
    let held = match held_entity(world) {
        Some(entity) => describe_held(world, entity),
        None => HeldObjectSnapshot::Empty,
    };
    let Some(inventory) = world.get_resource::<Inventory>() else {
        return InventorySnapshot::default();
    };

    InventorySnapshot {
        held,
        stacks: inventory
            .stacks
            .iter()
            .map(|s| StackSnapshot {
                kind: item_kind_to_u8(s.kind),
                count: s.count,
            })
            .collect(),
        notes: inventory
            .notes
            .iter()
            .map(|name| NoteEntrySnapshot { name: name.clone() })
            .collect(),
        audio_logs: inventory
            .audio_logs
            .iter()
            .map(|name| AudioLogEntrySnapshot { name: name.clone() })
            .collect(),
    }
}

fn despawn_held(world: &mut World) {
    if let Some(held) = held_entity(world) {
        world.entity_mut(held).despawn_recursive();
    }
}

fn player_translation(world: &mut World) -> Vec3 {
    let mut query = world.query_filtered::<&Transform, With<Player>>();
    query
        .iter(world)
        .next()
        .map_or(Vec3::ZERO, |t| t.translation)
}

fn spawn_held(world: &mut World, held: &HeldObjectSnapshot) -> Result<Option<Entity>, String> {
    let (path, rotation, kind) = match held {
        HeldObjectSnapshot::Empty => return Ok(None),
        HeldObjectSnapshot::Pickup { base_name, rotation } => (base_name.clone(), *rotation, None),
        HeldObjectSnapshot::InventoryItem { kind, rotation } => {
            let kind = u8_to_item_kind(*kind)
                .ok_or_else(|| format!("unknown held item code {kind}"))?;
            let path = world
                .get_resource::<ItemRegistry>()
                .and_then(|registry| registry.resource_path_for(kind))
                .ok_or_else(|| format!("no resource path for held {}", kind.as_str()))?;
            (path.to_string(), *rotation, Some(kind))
        }
    };

    let at = Transform::from_translation(player_translation(world))
        .with_rotation(Quat::from_array(rotation));
    let entity = spawn_prefab(world, &path, at)
        .ok_or_else(|| format!("failed to instantiate held object '{path}'"))?;

    let mut spawned = world.entity_mut(entity);
    spawned.insert(ContextScoped);
    match kind {
        Some(kind) => spawned.insert(WorldInventoryItem { kind }),
        None => spawned.insert(WorldPickup),
    };
    Ok(Some(entity))
}

/// Replaces the live inventory with `snapshot`, re-spawning the held object
/// at the player.
pub fn restore_inventory(world: &mut World, snapshot: &InventorySnapshot) -> RestoreReport {
    let mut report = RestoreReport::new("inventory");
    despawn_held(world);

    let mut stacks = Vec::with_capacity(snapshot.stacks.len());
    for stack in &snapshot.stacks {
        match u8_to_item_kind(stack.kind) {
            Some(kind) => {
                stacks.push(ItemStack { kind, count: stack.count });
                report.applied += 1;
            }
            None => {
                error!("Unknown item kind code {} in saved inventory", stack.kind);
                report.failed += 1;
            }
        }
    }

    let held = match spawn_held(world, &snapshot.held) {
        Ok(held) => held,
        Err(e) => {
            error!("Held object not restored: {e}");
            report.failed += 1;
            None
        }
    };

    let mut inventory = world.get_resource_or_insert_with(Inventory::default);
    inventory.held = held;
    inventory.stacks = stacks;
    inventory.notes = snapshot.notes.iter().map(|n| n.name.clone()).collect();
    inventory.audio_logs = snapshot.audio_logs.iter().map(|a| a.name.clone()).collect();
    report
}

/// Empties the inventory and despawns whatever was held.
pub fn clear_inventory(world: &mut World) {
    despawn_held(world);
    if let Some(mut inventory) = world.get_resource_mut::<Inventory>() {
        inventory.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene::{ItemKind, PrefabLibrary};

    fn world_with_player() -> World {
        let mut world = World::new();
        world.init_resource::<Inventory>();
        world.init_resource::<ItemRegistry>();
        let mut library = PrefabLibrary::default();
        library.register("items/keycard", |world: &mut World, t: Transform| {
            world.spawn((Name::new("keycard"), t)).id()
        });
        world.insert_resource(library);
        world.spawn((Player, Transform::from_xyz(1.0, 2.0, 3.0)));
        world
    }

    #[test]
    fn test_inventory_lists_keep_order() {
        let mut world = world_with_player();
        {
            let mut inventory = world.resource_mut::<Inventory>();
            inventory.add_item(ItemKind::Fuse, 2);
            inventory.add_item(ItemKind::Crowbar, 1);
            inventory.add_note("basement");
            inventory.add_note("attic");
            inventory.add_audio_log("tape_a");
        }

        let snapshot = gather_inventory(&mut world);
        clear_inventory(&mut world);
        assert!(world.resource::<Inventory>().stacks.is_empty());

        let report = restore_inventory(&mut world, &snapshot);
        assert!(report.is_clean());
        let inventory = world.resource::<Inventory>();
        assert_eq!(inventory.count_of(ItemKind::Fuse), 2);
        assert_eq!(inventory.stacks[1].kind, ItemKind::Crowbar);
        assert_eq!(inventory.notes, vec!["basement".to_string(), "attic".to_string()]);
        assert_eq!(inventory.audio_logs, vec!["tape_a".to_string()]);
    }

    #[test]
    fn test_held_item_respawns_at_player() {
        let mut world = world_with_player();
        let held = world
            .spawn((WorldInventoryItem { kind: ItemKind::Keycard }, Transform::IDENTITY))
            .id();
        world.resource_mut::<Inventory>().held = Some(held);

        let snapshot = gather_inventory(&mut world);
        assert!(matches!(snapshot.held, HeldObjectSnapshot::InventoryItem { .. }));

        restore_inventory(&mut world, &snapshot);

        assert!(world.get_entity(held).is_err());
        let new_held = world.resource::<Inventory>().held.unwrap();
        assert_ne!(new_held, held);
        assert_eq!(
            world.get::<Transform>(new_held).unwrap().translation,
            Vec3::new(1.0, 2.0, 3.0)
        );
        assert_eq!(
            world.get::<WorldInventoryItem>(new_held).map(|i| i.kind),
            Some(ItemKind::Keycard)
        );
    }

    #[test]
    fn test_unknown_held_pickup_is_dropped_not_fatal() {
        let mut world = world_with_player();
        let snapshot = InventorySnapshot {
            held: HeldObjectSnapshot::Pickup {
                base_name: "no_such_prefab".into(),
                rotation: [0.0, 0.0, 0.0, 1.0],
            },
            notes: vec![NoteEntrySnapshot { name: "kept".into() }],
            ..Default::default()
        };

        let report = restore_inventory(&mut world, &snapshot);
        assert_eq!(report.failed, 1);
        let inventory = world.resource::<Inventory>();
        assert_eq!(inventory.held, None);
        assert_eq!(inventory.notes, vec!["kept".to_string()]);
    }

    #[test]
    fn test_clear_inventory_despawns_held() {
        let mut world = world_with_player();
        let held = world.spawn((WorldPickup, Name::new("crate"))).id();
        world.resource_mut::<Inventory>().held = Some(held);

        clear_inventory(&mut world);

        assert!(world.get_entity(held).is_err());
        assert_eq!(world.resource::<Inventory>().held, None);
    }
}
