//! Live-entity side of the world-state contract.
//!
//! Everything in this crate is what the persistence layer reads from and
//! writes back onto: the category components carried by interactive entities,
//! the persistent player, the inventory, user options, and the boundary through
//! which contexts (levels) are requested and reported as loaded.
//!
//! Gameplay behavior for these entities lives elsewhere; only the state that
//! must survive a context change is modelled here.

use bevy::prelude::*;

pub mod attachments;
pub mod context;
pub mod interactables;
pub mod inventory;
pub mod items;
pub mod level_catalog;
pub mod options;
pub mod player;
pub mod prefabs;

pub use attachments::{AttachedNote, AudioDiary, DiaryVariant, Journal};
pub use context::{
    despawn_context_entities, interaction_enabled, ActiveContext, ContextEntrance, ContextId,
    ContextLoadRequested, ContextLoaded, ContextScoped, InteractionGate,
};
pub use interactables::{Activatable, Door, Drawer, GenericState, Swing, SwingState, TriggerZone};
pub use inventory::{Inventory, ItemStack};
pub use items::{scrub_name, ItemKind, WorldInventoryItem, WorldPickup, CLONE_DELIMITER};
pub use level_catalog::{LevelBuilder, LevelCatalog};
pub use options::UserOptions;
pub use player::{LookLimits, Player, PlayerDock, PlayerLook};
pub use prefabs::{spawn_prefab, PrefabFn, PrefabLibrary};

/// Systems that turn `ContextLoadRequested` into built contexts and
/// `ContextLoaded` events. Anything observing loads should run after this set.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContextLoadSet;

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ContextLoadRequested>()
            .add_event::<ContextLoaded>()
            .init_resource::<ActiveContext>()
            .init_resource::<InteractionGate>()
            .init_resource::<Inventory>()
            .init_resource::<UserOptions>()
            .init_resource::<PrefabLibrary>()
            .init_resource::<LevelCatalog>()
            .init_resource::<level_catalog::PendingContextBuilds>();

        // Builds run before the queue so a request issued this frame
        // completes on the next one, like a real streamed load would.
        app.add_systems(
            Update,
            (
                level_catalog::build_pending_contexts,
                level_catalog::queue_context_builds,
            )
                .chain()
                .in_set(ContextLoadSet),
        );
    }
}
