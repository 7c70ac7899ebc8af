// ---------------------------------------------------------------------------
// level_catalog – Default context loader
// ---------------------------------------------------------------------------
//
// Answers `ContextLoadRequested` by running the builder registered for the
// context, one frame after the request, then announces `ContextLoaded`.
// Hosts that stream levels from assets can skip the catalog and send
// `ContextLoaded` themselves.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::context::{ActiveContext, ContextId, ContextLoadRequested, ContextLoaded};

/// Spawns the authored (default-state) entities of one context.
pub type LevelBuilder = Box<dyn Fn(&mut World) + Send + Sync>;

#[derive(Resource, Default)]
pub struct LevelCatalog {
    builders: HashMap<ContextId, LevelBuilder>,
}

impl LevelCatalog {
    pub fn register<F>(&mut self, context: ContextId, build: F)
    where
        F: Fn(&mut World) + Send + Sync + 'static,
    {
        self.builders.insert(context, Box::new(build));
    }

    /// Returns `false` when nothing is registered for `context`.
    pub fn build(&self, world: &mut World, context: ContextId) -> bool {
        match self.builders.get(&context) {
            Some(build) => {
                build(world);
                true
            }
            None => false,
        }
    }
}

/// Requests seen but not yet built.
#[derive(Resource, Default)]
pub(crate) struct PendingContextBuilds(Vec<ContextId>);

pub(crate) fn queue_context_builds(
    mut requests: EventReader<ContextLoadRequested>,
    mut pending: ResMut<PendingContextBuilds>,
) {
    pending.0.extend(requests.read().map(|r| r.context));
}

pub(crate) fn build_pending_contexts(world: &mut World) {
    let pending = std::mem::take(&mut world.resource_mut::<PendingContextBuilds>().0);

    for context in pending {
        let built = world.resource_scope(|world, catalog: Mut<LevelCatalog>| {
            catalog.build(world, context)
        });
        if built {
            info!("Context {context} built");
        } else {
            warn!("No level registered for context {context}, loading it empty");
        }

        world.resource_mut::<ActiveContext>().current = Some(context);
        world.send_event(ContextLoaded { context });
    }
}
