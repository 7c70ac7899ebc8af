// ---------------------------------------------------------------------------
// world_items – Instantiate categories: loose pickups and inventory items
// ---------------------------------------------------------------------------
//
// Both arrays start with a padding record so they are never empty on disk.
// Restore skips index 0 unconditionally.

use std::cmp::Ordering;

use bevy::hierarchy::DespawnRecursiveExt;
use bevy::prelude::*;

use scene::{scrub_name, spawn_prefab, ContextScoped, Inventory, WorldInventoryItem, WorldPickup};

use crate::item_registry::ItemRegistry;
use crate::save_codec::{item_kind_to_u8, u8_to_item_kind};
use crate::snapshot_types::{PickupSnapshot, TransformSnapshot, WorldItemSnapshot};

use super::report::RestoreReport;

/// The entity in the player's hands, if it still exists.
pub fn held_entity(world: &World) -> Option<Entity> {
    world
        .get_resource::<Inventory>()
        .and_then(|inventory| inventory.held)
        .filter(|entity| world.get_entity(*entity).is_ok())
}

/// Orders by position so files do not depend on entity allocation order,
/// which changes every time a category is re-instantiated.
fn cmp_position(a: &TransformSnapshot, b: &TransformSnapshot) -> Ordering {
    a.position
        .iter()
        .zip(b.position.iter())
        .map(|(x, y)| x.total_cmp(y))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

pub fn gather_world_items(world: &mut World) -> Vec<WorldItemSnapshot> {
    let held = held_entity(world);
    let mut query = world.query::<(Entity, &WorldInventoryItem, &Transform)>();
    let mut live: Vec<WorldItemSnapshot> = query
        .iter(world)
        .filter(|(entity, _, _)| Some(*entity) != held)
        .map(|(_, item, transform)| WorldItemSnapshot {
            kind: item_kind_to_u8(item.kind),
            transform: TransformSnapshot::from(transform),
        })
        .collect();
    live.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| cmp_position(&a.transform, &b.transform)));

    std::iter::once(WorldItemSnapshot::default()).chain(live).collect()
}

pub fn gather_pickups(world: &mut World) -> Vec<PickupSnapshot> {
    let held = held_entity(world);
    let mut query = world.query_filtered::<(Entity, &Name, &Transform), With<WorldPickup>>();
    let mut live: Vec<PickupSnapshot> = query
        .iter(world)
        .filter(|(entity, _, _)| Some(*entity) != held)
        .map(|(_, name, transform)| PickupSnapshot {
            base_name: scrub_name(name.as_str()).to_string(),
            transform: TransformSnapshot::from(transform),
        })
        .collect();
    live.sort_by(|a, b| {
        a.base_name
            .cmp(&b.base_name)
            .then_with(|| cmp_position(&a.transform, &b.transform))
    });

    std::iter::once(PickupSnapshot::default()).chain(live).collect()
}

fn despawn_category<C: Component>(world: &mut World, keep: Option<Entity>) -> usize {
    let mut query = world.query_filtered::<Entity, With<C>>();
    let doomed: Vec<Entity> = query
        .iter(world)
        .filter(|entity| Some(*entity) != keep)
        .collect();

    let mut removed = 0;
    for entity in doomed {
        if world.get_entity(entity).is_ok() {
            world.entity_mut(entity).despawn_recursive();
            removed += 1;
        }
    }
    removed
}

/// Despawns every world-placed pickup and inventory item except `keep`.
pub fn clear_world_items(world: &mut World, keep: Option<Entity>) -> usize {
    despawn_category::<WorldInventoryItem>(world, keep) + despawn_category::<WorldPickup>(world, keep)
}

fn keep_if(preserve_held: bool, world: &World) -> Option<Entity> {
    if preserve_held {
        held_entity(world)
    } else {
        None
    }
}

pub fn restore_world_items(
    world: &mut World,
    snapshots: &[WorldItemSnapshot],
    preserve_held: bool,
) -> RestoreReport {
    let keep = keep_if(preserve_held, world);
    despawn_category::<WorldInventoryItem>(world, keep);

    let mut report = RestoreReport::new("world_inventory_item");
    for snapshot in snapshots.iter().skip(1) {
        let Some(kind) = u8_to_item_kind(snapshot.kind) else {
            error!("Unknown item kind code {}, skipping world item", snapshot.kind);
            report.failed += 1;
            continue;
        };
        let Some(path) = world
            .get_resource::<ItemRegistry>()
            .and_then(|registry| registry.resource_path_for(kind))
        else {
            error!("No resource path registered for {}, skipping world item", kind.as_str());
            report.failed += 1;
            continue;
        };

        match spawn_prefab(world, path, snapshot.transform.to_transform()) {
            Some(entity) => {
                world
                    .entity_mut(entity)
                    .insert((ContextScoped, WorldInventoryItem { kind }));
                report.applied += 1;
            }
            None => {
                error!("Failed to instantiate '{path}' for {}", kind.as_str());
                report.failed += 1;
            }
        }
    }
    report
}

pub fn restore_pickups(
    world: &mut World,
    snapshots: &[PickupSnapshot],
    preserve_held: bool,
) -> RestoreReport {
    let keep = keep_if(preserve_held, world);
    despawn_category::<WorldPickup>(world, keep);

    let mut report = RestoreReport::new("world_pickup");
    for snapshot in snapshots.iter().skip(1) {
        let path = snapshot.base_name.as_str();
        let spawned = if path.is_empty() {
            None
        } else {
            spawn_prefab(world, path, snapshot.transform.to_transform())
        };

        match spawned {
            Some(entity) => {
                world.entity_mut(entity).insert((ContextScoped, WorldPickup));
                report.applied += 1;
            }
            None => {
                error!("Failed to instantiate pickup '{path}'");
                report.failed += 1;
            }
        }
    }
    report
}
