use std::collections::HashMap;

use bevy::prelude::*;

/// `name -> entity` for every live instance of one category, built once per
/// restore pass.
#[derive(Debug, Default)]
pub struct NameIndex {
    by_name: HashMap<String, Entity>,
}

impl NameIndex {
    /// Duplicate names resolve to the instance with the lowest `Entity`
    /// (generation first, then index); the rest are reported and ignored.
    pub fn build<C: Component>(world: &mut World) -> Self {
        let mut query = world.query_filtered::<(Entity, &Name), With<C>>();
        let mut entries: Vec<(Entity, String)> = query
            .iter(world)
            .map(|(entity, name)| (entity, name.as_str().to_string()))
            .collect();
        entries.sort_by_key(|(entity, _)| *entity);

        let mut by_name = HashMap::with_capacity(entries.len());
        for (entity, name) in entries {
            if by_name.contains_key(&name) {
                warn!(
                    "Duplicate name '{name}' among {} entities; keeping the first",
                    std::any::type_name::<C>()
                );
                continue;
            }
            by_name.insert(name, entity);
        }
        Self { by_name }
    }

    pub fn get(&self, name: &str) -> Option<Entity> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
