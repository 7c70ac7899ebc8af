// ---------------------------------------------------------------------------
// prefabs – Resource path -> spawn function
// ---------------------------------------------------------------------------

use std::collections::HashMap;

use bevy::prelude::*;

/// Spawns one instance of a prefab at the given transform and returns the
/// root entity.
pub type PrefabFn = Box<dyn Fn(&mut World, Transform) -> Entity + Send + Sync>;

/// Everything that can be materialized from scratch, keyed by resource path.
#[derive(Resource, Default)]
pub struct PrefabLibrary {
    spawners: HashMap<String, PrefabFn>,
}

impl PrefabLibrary {
    pub fn register<F>(&mut self, path: impl Into<String>, spawn: F)
    where
        F: Fn(&mut World, Transform) -> Entity + Send + Sync + 'static,
    {
        self.spawners.insert(path.into(), Box::new(spawn));
    }

    pub fn len(&self) -> usize {
        self.spawners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spawners.is_empty()
    }

    pub fn spawn(&self, world: &mut World, path: &str, transform: Transform) -> Option<Entity> {
        self.spawners.get(path).map(|spawn| spawn(world, transform))
    }
}

/// Spawns `path` from the world's `PrefabLibrary`. `None` when the library
/// is missing or has no such prefab.
pub fn spawn_prefab(world: &mut World, path: &str, transform: Transform) -> Option<Entity> {
    if !world.contains_resource::<PrefabLibrary>() {
        return None;
    }
    world.resource_scope(|world, library: Mut<PrefabLibrary>| {
        library.spawn(world, path, transform)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_registered_prefab() {
        let mut world = World::new();
        let mut library = PrefabLibrary::default();
        library.register("props/crate", |world: &mut World, transform: Transform| {
            world.spawn((Name::new("crate"), transform)).id()
        });
        world.insert_resource(library);

        let at = Transform::from_xyz(1.0, 2.0, 3.0);
        let entity = spawn_prefab(&mut world, "props/crate", at).expect("prefab exists");

        assert_eq!(world.get::<Transform>(entity), Some(&at));
        assert_eq!(world.get::<Name>(entity).map(|n| n.as_str()), Some("crate"));
    }

    #[test]
    fn test_unknown_prefab_is_none() {
        let mut world = World::new();
        world.init_resource::<PrefabLibrary>();
        assert!(spawn_prefab(&mut world, "props/ghost", Transform::IDENTITY).is_none());
    }

    #[test]
    fn test_missing_library_is_none() {
        let mut world = World::new();
        assert!(spawn_prefab(&mut world, "props/crate", Transform::IDENTITY).is_none());
    }
}
