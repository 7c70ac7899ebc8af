//! # TestWorld: headless integration harness for the persistence layer
//!
//! Wraps a `bevy::app::App` with `MinimalPlugins` + `PersistencePlugin` and
//! three small authored contexts, so tests can drive whole operations frame
//! by frame and inspect the world and the save directory afterwards.

use std::path::PathBuf;
use std::time::Duration;

use bevy::app::App;
use bevy::ecs::event::EventCursor;
use bevy::prelude::*;

use scene::{
    spawn_prefab, Activatable, ActiveContext, AttachedNote, AudioDiary, ContextEntrance, ContextId,
    ContextScoped, Door, Drawer, GenericState, InteractionGate, Inventory, ItemKind, Journal,
    LevelCatalog, Player, PlayerDock, PlayerLook, PrefabLibrary, TriggerZone, WorldInventoryItem,
    WorldPickup,
};

use crate::coordinator::{PersistenceCoordinator, PersistenceFinished, PersistenceRequest};
use crate::item_registry::ITEM_RESOURCE_TABLE;
use crate::layout::SaveLayout;
use crate::persistence_plugin::PersistencePlugin;

pub(crate) const BASE: ContextId = ContextId(0);
pub(crate) const OFFICE: ContextId = ContextId(3);
pub(crate) const YARD: ContextId = ContextId(5);

/// Upper bound on frames one operation may take before the harness gives up.
const MAX_FRAMES: usize = 50;

pub struct TestWorld {
    app: App,
    root: PathBuf,
    cursor: EventCursor<PersistenceFinished>,
    finished: Vec<PersistenceFinished>,
}

impl TestWorld {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Fresh save directory named after the test, nothing loaded yet.
    pub fn new(name: &str) -> Self {
        let root = std::env::temp_dir().join(format!("worldsave_it_{name}"));
        let _ = std::fs::remove_dir_all(&root);
        Self::open(root)
    }

    /// Boots against an existing save directory, as a relaunch would.
    pub fn open(root: PathBuf) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(PersistencePlugin {
            root: root.clone(),
            base_context: BASE,
            ux_min_display: Duration::ZERO,
            compress: true,
        });

        register_prefabs(&mut app.world_mut().resource_mut::<PrefabLibrary>());
        {
            let mut catalog = app.world_mut().resource_mut::<LevelCatalog>();
            catalog.register(BASE, build_base);
            catalog.register(OFFICE, build_office);
            catalog.register(YARD, build_yard);
        }
        app.world_mut().spawn((
            Player,
            Name::new("player"),
            Transform::IDENTITY,
            PlayerLook::default(),
            PlayerDock::default(),
        ));

        // Runs Startup (crash recovery, options).
        app.update();

        let cursor = app
            .world()
            .resource::<Events<PersistenceFinished>>()
            .get_cursor();
        Self {
            app,
            root,
            cursor,
            finished: Vec::new(),
        }
    }

    /// Drops the app and boots a new one on the same save directory.
    pub fn restart(self) -> Self {
        let root = self.root.clone();
        drop(self.app);
        Self::open(root)
    }

    /// Fresh world with `context` already loaded.
    pub fn in_context(name: &str, context: ContextId) -> Self {
        let mut world = Self::new(name);
        world.perform(PersistenceRequest::ChangeContextNoSave(context));
        world
    }

    // -----------------------------------------------------------------------
    // Driving
    // -----------------------------------------------------------------------

    pub fn request(&mut self, request: PersistenceRequest) {
        self.app.world_mut().send_event(request);
    }

    /// One frame. Outcome events are collected so none expire unseen.
    pub fn step(&mut self) {
        self.app.update();
        let events = self.app.world().resource::<Events<PersistenceFinished>>();
        self.finished.extend(self.cursor.read(events).cloned());
    }

    pub fn run_until_idle(&mut self) {
        self.step();
        for _ in 0..MAX_FRAMES {
            if !self.coordinator().is_busy() {
                return;
            }
            self.step();
        }
        panic!(
            "persistence still busy after {MAX_FRAMES} frames (state {:?}, phase {:?})",
            self.coordinator().state(),
            self.coordinator().phase()
        );
    }

    /// Sends `request`, runs it to completion and returns its outcome.
    pub fn perform(&mut self, request: PersistenceRequest) -> PersistenceFinished {
        let seen = self.finished.len();
        self.request(request);
        self.run_until_idle();
        self.finished[seen..]
            .iter()
            .rev()
            .find(|f| f.request == request)
            .cloned()
            .unwrap_or_else(|| panic!("no outcome for {request:?}"))
    }

    pub fn finished(&self) -> &[PersistenceFinished] {
        &self.finished
    }

    pub fn set_ux_min_display(&mut self, min: Duration) {
        self.app
            .world_mut()
            .resource_mut::<PersistenceCoordinator>()
            .set_ux_min_display(min);
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn layout(&self) -> SaveLayout {
        self.coordinator().layout().clone()
    }

    pub fn coordinator(&self) -> &PersistenceCoordinator {
        self.app.world().resource::<PersistenceCoordinator>()
    }

    pub fn world(&self) -> &World {
        self.app.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn active_context(&self) -> Option<ContextId> {
        self.app.world().resource::<ActiveContext>().current
    }

    pub fn gate_suspended(&self) -> bool {
        self.app.world().resource::<InteractionGate>().is_suspended()
    }

    pub fn inventory(&self) -> Inventory {
        self.app.world().resource::<Inventory>().clone()
    }

    pub fn entity_named(&mut self, name: &str) -> Option<Entity> {
        let world = self.app.world_mut();
        let mut query = world.query::<(Entity, &Name)>();
        query
            .iter(world)
            .find(|(_, n)| n.as_str() == name)
            .map(|(entity, _)| entity)
    }

    pub fn component<C: Component + Clone>(&mut self, name: &str) -> Option<C> {
        let entity = self.entity_named(name)?;
        self.app.world().get::<C>(entity).cloned()
    }

    pub fn modify<C: Component>(&mut self, name: &str, f: impl FnOnce(&mut C)) {
        let entity = self
            .entity_named(name)
            .unwrap_or_else(|| panic!("no entity named {name}"));
        let mut component = self
            .app
            .world_mut()
            .get_mut::<C>(entity)
            .unwrap_or_else(|| panic!("{name} has no such component"));
        f(&mut *component);
    }

    pub fn count<C: Component>(&mut self) -> usize {
        let world = self.app.world_mut();
        let mut query = world.query_filtered::<Entity, With<C>>();
        query.iter(world).count()
    }

    pub fn player_translation(&mut self) -> Vec3 {
        let world = self.app.world_mut();
        let mut query = world.query_filtered::<&Transform, With<Player>>();
        query.single(world).translation
    }

    pub fn set_player_translation(&mut self, at: Vec3) {
        let world = self.app.world_mut();
        let mut query = world.query_filtered::<&mut Transform, With<Player>>();
        query.single_mut(world).translation = at;
    }

    pub fn player_rotation(&mut self) -> Quat {
        let world = self.app.world_mut();
        let mut query = world.query_filtered::<&Transform, With<Player>>();
        query.single(world).rotation
    }

    pub fn set_player_rotation(&mut self, rotation: Quat) {
        let world = self.app.world_mut();
        let mut query = world.query_filtered::<&mut Transform, With<Player>>();
        query.single_mut(world).rotation = rotation;
    }

    /// For tests that add their own systems alongside the plugin.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Puts the named entity in the player's hands.
    pub fn hold(&mut self, name: &str) -> Entity {
        let entity = self
            .entity_named(name)
            .unwrap_or_else(|| panic!("no entity named {name}"));
        self.app.world_mut().resource_mut::<Inventory>().held = Some(entity);
        entity
    }

    pub fn world_item_of(&mut self, kind: ItemKind) -> Option<Entity> {
        let world = self.app.world_mut();
        let mut query = world.query::<(Entity, &WorldInventoryItem)>();
        query
            .iter(world)
            .find(|(_, item)| item.kind == kind)
            .map(|(entity, _)| entity)
    }
}

// ---------------------------------------------------------------------------
// Fixture content
// ---------------------------------------------------------------------------

fn register_prefabs(library: &mut PrefabLibrary) {
    for (_, path) in ITEM_RESOURCE_TABLE {
        let path: &'static str = *path;
        let name = path.rsplit('/').next().unwrap_or(path).to_string();
        library.register(path, move |world: &mut World, t: Transform| {
            world.spawn((Name::new(name.clone()), t)).id()
        });
    }
    library.register("crate", |world: &mut World, t: Transform| {
        let note = world
            .spawn((Name::new("crate_note"), AttachedNote::default()))
            .id();
        let mut root = world.spawn((Name::new("crate"), t));
        root.add_child(note);
        root.id()
    });
}

fn scoped(world: &mut World, name: &str, component: impl Component) -> Entity {
    world
        .spawn((Name::new(name.to_string()), component, ContextScoped))
        .id()
}

fn entrance(world: &mut World, from: ContextId, at: Vec3) {
    world.spawn((
        ContextEntrance { from },
        Transform::from_translation(at),
        ContextScoped,
    ));
}

fn world_item(world: &mut World, kind: ItemKind, path: &str, at: Vec3) {
    if let Some(entity) = spawn_prefab(world, path, Transform::from_translation(at)) {
        world
            .entity_mut(entity)
            .insert((WorldInventoryItem { kind }, ContextScoped));
    }
}

fn build_base(world: &mut World) {
    scoped(
        world,
        "bed",
        Activatable {
            hint: "Sleep".into(),
            ..Default::default()
        },
    );
    entrance(world, OFFICE, Vec3::new(1.0, 0.0, 1.0));
}

fn build_office(world: &mut World) {
    scoped(world, "T1", TriggerZone::default());
    scoped(world, "D1", Door::default());
    scoped(world, "cabinet", Drawer::default());
    scoped(
        world,
        "lever",
        Activatable {
            hint: "Pull".into(),
            ..Default::default()
        },
    );
    scoped(world, "valve", GenericState::default());
    scoped(world, "J1", Journal::default());
    scoped(world, "tape_a", AudioDiary::passive());
    scoped(world, "tape_b", AudioDiary::interactive());

    world_item(world, ItemKind::Battery, "items/battery", Vec3::new(2.0, 0.0, 1.0));
    world_item(world, ItemKind::Keycard, "items/keycard", Vec3::new(0.0, 0.0, 4.0));

    if let Some(crate_root) = spawn_prefab(world, "crate", Transform::from_xyz(-2.0, 0.0, 3.0)) {
        world
            .entity_mut(crate_root)
            .insert((Name::new("crate (1)"), WorldPickup, ContextScoped));
    }

    entrance(world, YARD, Vec3::new(10.0, 0.0, 0.0));
    entrance(world, BASE, Vec3::new(0.0, 0.0, -10.0));
}

fn build_yard(world: &mut World) {
    scoped(world, "T5", TriggerZone::default());
    scoped(world, "D5", Door::default());
    entrance(world, OFFICE, Vec3::new(-3.0, 0.0, 8.0));
}
