use std::path::PathBuf;
use std::time::Duration;

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use scene::{ContextId, ContextLoadSet, ContextLoaded, ScenePlugin, UserOptions};

use crate::coordinator::{
    OperationState, PersistenceConfig, PersistenceCoordinator, PersistenceFinished,
    PersistenceRequest,
};
use crate::crash_recovery::{recover_interrupted_writes, CrashRecoveryState};
use crate::item_registry::ItemRegistry;

/// Request intake, load observation and the coordinator driver, in that
/// order. Runs after the scene loader each frame.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PersistenceSet;

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PersistencePlugin {
    pub root: PathBuf,
    pub base_context: ContextId,
    pub ux_min_display: Duration,
    pub compress: bool,
}

impl Default for PersistencePlugin {
    fn default() -> Self {
        let config = PersistenceConfig::default();
        Self {
            root: config.root,
            base_context: config.base_context,
            ux_min_display: config.ux_min_display,
            compress: config.compress,
        }
    }
}

impl PersistencePlugin {
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    fn config(&self) -> PersistenceConfig {
        PersistenceConfig {
            root: self.root.clone(),
            base_context: self.base_context,
            ux_min_display: self.ux_min_display,
            compress: self.compress,
        }
    }
}

impl Plugin for PersistencePlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<ScenePlugin>() {
            app.add_plugins(ScenePlugin);
        }

        app.add_event::<PersistenceRequest>()
            .add_event::<PersistenceFinished>()
            .init_resource::<ItemRegistry>()
            .init_resource::<CrashRecoveryState>()
            .insert_resource(PersistenceCoordinator::new(self.config()));

        app.configure_sets(Update, PersistenceSet.after(ContextLoadSet));

        // Leftover temp files are swept before options are read from disk.
        app.add_systems(
            Startup,
            (recover_interrupted_writes, load_options_at_startup).chain(),
        );
        app.add_systems(
            Update,
            (accept_requests, observe_context_loads, drive_persistence)
                .chain()
                .in_set(PersistenceSet),
        );
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

fn load_options_at_startup(
    coordinator: Res<PersistenceCoordinator>,
    mut options: ResMut<UserOptions>,
) {
    coordinator.load_options(&mut options);
}

/// Options requests are served on the spot; everything else goes to the
/// coordinator, which refuses it while busy.
fn accept_requests(
    mut requests: EventReader<PersistenceRequest>,
    mut coordinator: ResMut<PersistenceCoordinator>,
    mut options: ResMut<UserOptions>,
    mut finished: EventWriter<PersistenceFinished>,
) {
    for request in requests.read().copied() {
        if request.is_options() {
            let outcome = match request {
                PersistenceRequest::SaveOptions => coordinator.save_options(&options),
                _ => coordinator.load_options(&mut options),
            };
            finished.send(outcome);
            continue;
        }
        if let Err(e) = coordinator.submit(request) {
            warn!("Rejected {request:?}: {e}");
            finished.send(PersistenceFinished {
                request,
                errors: vec![e.to_string()],
            });
        }
    }
}

fn observe_context_loads(
    mut loads: EventReader<ContextLoaded>,
    mut coordinator: ResMut<PersistenceCoordinator>,
) {
    for loaded in loads.read() {
        coordinator.note_context_loaded(loaded.context);
    }
}

/// Exclusive: gathers and restores need the whole world.
fn drive_persistence(world: &mut World) {
    let delta = world
        .get_resource::<Time>()
        .map_or(Duration::ZERO, |time| time.delta());
    world.resource_scope(|world, mut coordinator: Mut<PersistenceCoordinator>| {
        coordinator.tick(world, delta);
    });
}

// ---------------------------------------------------------------------------
// System parameter
// ---------------------------------------------------------------------------

/// Request surface for gameplay and UI systems.
#[derive(SystemParam)]
pub struct Persistence<'w> {
    requests: EventWriter<'w, PersistenceRequest>,
    coordinator: Res<'w, PersistenceCoordinator>,
}

impl Persistence<'_> {
    pub fn save(&mut self) {
        self.requests.send(PersistenceRequest::Save);
    }

    /// Check `saved_game_exists` first.
    pub fn load(&mut self) {
        self.requests.send(PersistenceRequest::Load);
    }

    pub fn change_context_and_auto_save(&mut self, target: ContextId) {
        self.requests
            .send(PersistenceRequest::ChangeContextAndAutoSave(target));
    }

    pub fn change_context_no_save(&mut self, target: ContextId) {
        self.requests
            .send(PersistenceRequest::ChangeContextNoSave(target));
    }

    pub fn return_to_base(&mut self) {
        self.requests.send(PersistenceRequest::ReturnToBase);
    }

    pub fn start_new_game(&mut self) {
        self.requests.send(PersistenceRequest::StartNewGame);
    }

    pub fn save_options(&mut self) {
        self.requests.send(PersistenceRequest::SaveOptions);
    }

    pub fn load_options(&mut self) {
        self.requests.send(PersistenceRequest::LoadOptions);
    }

    pub fn saved_game_exists(&self) -> bool {
        self.coordinator.saved_game_exists()
    }

    pub fn is_busy(&self) -> bool {
        self.coordinator.is_busy()
    }

    pub fn state(&self) -> OperationState {
        self.coordinator.state()
    }
}
