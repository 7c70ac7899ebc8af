use bevy::prelude::*;

use scene::{ContextEntrance, ContextId, LookLimits, Player, PlayerDock, PlayerLook};

use crate::snapshot_types::PlayerSnapshot;

fn player_entity(world: &mut World) -> Option<Entity> {
    let mut query = world.query_filtered::<Entity, With<Player>>();
    query.iter(world).next()
}

fn limits_to_array(l: &LookLimits) -> [f32; 4] {
    [l.min_yaw, l.max_yaw, l.min_pitch, l.max_pitch]
}

fn array_to_limits(a: [f32; 4]) -> LookLimits {
    LookLimits {
        min_yaw: a[0],
        max_yaw: a[1],
        min_pitch: a[2],
        max_pitch: a[3],
    }
}

/// `None` when no player entity exists.
pub fn gather_player(world: &mut World) -> Option<PlayerSnapshot> {
    let mut query =
        world.query_filtered::<(&Transform, Option<&PlayerLook>, Option<&PlayerDock>), With<Player>>();
    let (transform, look, dock) = query.iter(world).next()?;

    let look = look.copied().unwrap_or_default();
    let dock = dock.cloned().unwrap_or_default();
    if dock.in_transition {
        warn!("Saving player mid dock transition; pending dock targets may be stale");
    }

    Some(PlayerSnapshot {
        position: transform.translation.to_array(),
        rotation: transform.rotation.to_array(),
        look_focus: look.focus.to_array(),
        crouched: look.crouched,
        docked: dock.docked,
        dock_target: dock.target,
        look_limits: limits_to_array(&dock.look_limits),
        pending_focus: dock.pending_focus.map(|v| v.to_array()),
        pending_position: dock.pending_position.map(|v| v.to_array()),
    })
}

/// Returns `false` when there is no player to restore onto.
pub fn restore_player(world: &mut World, snapshot: &PlayerSnapshot) -> bool {
    let Some(player) = player_entity(world) else {
        warn!("No player entity, saved player state not applied");
        return false;
    };

    let mut entity = world.entity_mut(player);
    let scale = entity.get::<Transform>().map_or(Vec3::ONE, |t| t.scale);
    entity.insert((
        Transform {
            translation: Vec3::from_array(snapshot.position),
            rotation: Quat::from_array(snapshot.rotation),
            scale,
        },
        PlayerLook {
            focus: Vec3::from_array(snapshot.look_focus),
            crouched: snapshot.crouched,
        },
        PlayerDock {
            docked: snapshot.docked,
            target: snapshot.dock_target.clone(),
            look_limits: array_to_limits(snapshot.look_limits),
            pending_focus: snapshot.pending_focus.map(Vec3::from_array),
            pending_position: snapshot.pending_position.map(Vec3::from_array),
            in_transition: false,
        },
    ));
    true
}

/// Moves the player onto the entrance of the freshly loaded context that
/// leads back to `departed`. Returns `false` when no such entrance exists.
pub fn reposition_at_entrance(world: &mut World, departed: ContextId) -> bool {
    let mut entrances = world.query::<(&ContextEntrance, &Transform)>();
    let arrival = entrances
        .iter(world)
        .find(|(entrance, _)| entrance.from == departed)
        .map(|(_, transform)| *transform);

    let Some(arrival) = arrival else {
        warn!("No entrance from context {departed}, leaving player where it is");
        return false;
    };
    let Some(player) = player_entity(world) else {
        return false;
    };

    if let Some(mut transform) = world.get_mut::<Transform>(player) {
        transform.translation = arrival.translation;
        transform.rotation = arrival.rotation;
    }
    true
}
