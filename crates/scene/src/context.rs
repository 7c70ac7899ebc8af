// ---------------------------------------------------------------------------
// context – Context identity, the load boundary and the interaction gate
// ---------------------------------------------------------------------------

use std::fmt;

use bevy::hierarchy::DespawnRecursiveExt;
use bevy::prelude::*;

/// Index of one loadable unit of the world (a level).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ContextId(pub u32);

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The context whose entities currently populate the world, if any.
///
/// Cleared while a context is unloaded and set again by the loader once the
/// next context has been built.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ActiveContext {
    pub current: Option<ContextId>,
}

/// Marks an entity owned by the currently loaded context. Despawned (with its
/// children) when the context unloads.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct ContextScoped;

/// Arrival point used when the player enters this context from `from`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextEntrance {
    pub from: ContextId,
}

/// Asks the loader to build `context`. Sent after the previous context has
/// been unloaded.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextLoadRequested {
    pub context: ContextId,
}

/// Sent by the loader once every authored entity of `context` exists.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextLoaded {
    pub context: ContextId,
}

/// Global gate over player interaction. Suspended for the whole duration of
/// a save/load so nothing mutates entities while they are gathered or restored.
#[derive(Resource, Debug, Default)]
pub struct InteractionGate {
    suspended: bool,
}

impl InteractionGate {
    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    pub fn resume(&mut self) {
        self.suspended = false;
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }
}

/// Run condition for gameplay systems that mutate persisted entities.
pub fn interaction_enabled(gate: Res<InteractionGate>) -> bool {
    !gate.is_suspended()
}

/// Despawns every `ContextScoped` entity except `keep`, returning how many
/// roots were removed. Children go with their parent.
pub fn despawn_context_entities(world: &mut World, keep: Option<Entity>) -> usize {
    let mut query = world.query_filtered::<Entity, With<ContextScoped>>();
    let doomed: Vec<Entity> = query
        .iter(world)
        .filter(|entity| Some(*entity) != keep)
        .collect();

    let mut removed = 0;
    for entity in doomed {
        // A scoped child may already be gone with its parent.
        if world.get_entity(entity).is_ok() {
            world.entity_mut(entity).despawn_recursive();
            removed += 1;
        }
    }

    if let Some(mut active) = world.get_resource_mut::<ActiveContext>() {
        active.current = None;
    }
    removed
}
