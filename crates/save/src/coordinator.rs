// ---------------------------------------------------------------------------
// coordinator – Multi-phase save / unload / load / restore state machine
// ---------------------------------------------------------------------------
//
// One operation is in flight at a time. Each frame `drive_persistence` calls
// `tick`, which advances the current sub-phase once its work is done:
//
//   Save                      Saving -> done
//   Load                      LoadingLastContext -> RestoringContextData
//   ChangeContextAndAutoSave  Saving -> LoadingNextContext -> RestoringContextData
//   ChangeContextNoSave       LoadingNextContext -> RestoringContextData
//   ReturnToBase              LoadingNextContext -> RestoringContextData
//   StartNewGame              runs synchronously on the next idle tick
//
// Every operation then sits in UxWait for the configured minimum display
// time before returning to Idle and resuming interaction.

use std::path::PathBuf;
use std::time::Duration;

use bevy::hierarchy::DespawnRecursiveExt;
use bevy::prelude::*;

use scene::{
    despawn_context_entities, ActiveContext, ContextId, ContextLoadRequested, InteractionGate,
    Inventory, UserOptions,
};

use crate::collector::{
    clear_inventory, clear_world_items, gather_inventory, gather_level, gather_player, held_entity,
    reposition_at_entrance, restore_inventory, restore_level, restore_player, LevelRestoreReport,
    RestoreOptions,
};
use crate::layout::{SaveLayout, Tier};
use crate::options_io::{load_options, save_options};
use crate::save_error::SaveError;

/// Everything callers can ask of the persistence layer.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceRequest {
    Save,
    Load,
    ChangeContextAndAutoSave(ContextId),
    ChangeContextNoSave(ContextId),
    ReturnToBase,
    StartNewGame,
    SaveOptions,
    LoadOptions,
}

impl PersistenceRequest {
    /// Options requests never touch entities and bypass the state machine.
    pub fn is_options(self) -> bool {
        matches!(self, PersistenceRequest::SaveOptions | PersistenceRequest::LoadOptions)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationState {
    #[default]
    Idle,
    Saving,
    Loading,
    ChangingContext,
    ChangingContextNoSave,
    ReturningToBase,
    UxWait,
}

impl OperationState {
    pub fn label(self) -> &'static str {
        match self {
            OperationState::Idle => "Idle",
            OperationState::Saving => "Saving",
            OperationState::Loading => "Loading",
            OperationState::ChangingContext => "ChangingContext",
            OperationState::ChangingContextNoSave => "ChangingContextNoSave",
            OperationState::ReturningToBase => "ReturningToBase",
            OperationState::UxWait => "UxWait",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubPhase {
    Saving,
    LoadingLastContext,
    LoadingNextContext,
    RestoringContextData,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersistenceConfig {
    pub root: PathBuf,
    /// Context `ReturnToBase` loads.
    pub base_context: ContextId,
    /// Minimum time an operation stays visible before interaction resumes.
    pub ux_min_display: Duration,
    pub compress: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("saves"),
            base_context: ContextId(0),
            ux_min_display: Duration::from_millis(750),
            compress: true,
        }
    }
}

/// Sent once per request: when it finishes, or straight away if it was
/// rejected.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct PersistenceFinished {
    pub request: PersistenceRequest,
    pub errors: Vec<String>,
}

impl PersistenceFinished {
    pub fn succeeded(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug)]
struct ActiveOperation {
    request: PersistenceRequest,
    /// Context to load, for operations that load one.
    target: Option<ContextId>,
    /// Context that was loaded when the operation began.
    departed: Option<ContextId>,
    load_requested: bool,
    errors: Vec<String>,
}

impl ActiveOperation {
    fn record(&mut self, what: &str, e: SaveError) {
        error!("{what}: {e}");
        self.errors.push(format!("{what}: {e}"));
    }
}

#[derive(Resource, Debug)]
pub struct PersistenceCoordinator {
    config: PersistenceConfig,
    layout: SaveLayout,
    state: OperationState,
    phase: Option<SubPhase>,
    active: Option<ActiveOperation>,
    pending: Option<PersistenceRequest>,
    loaded: Option<ContextId>,
    ux_elapsed: Duration,
    spinner_frame: u32,
    last_outcome: Option<PersistenceFinished>,
    last_restore: Option<LevelRestoreReport>,
    completed_operations: u64,
}

impl PersistenceCoordinator {
    pub fn new(config: PersistenceConfig) -> Self {
        let layout = SaveLayout::new(config.root.clone(), config.compress);
        Self {
            config,
            layout,
            state: OperationState::Idle,
            phase: None,
            active: None,
            pending: None,
            loaded: None,
            ux_elapsed: Duration::ZERO,
            spinner_frame: 0,
            last_outcome: None,
            last_restore: None,
            completed_operations: 0,
        }
    }

    pub fn config(&self) -> &PersistenceConfig {
        &self.config
    }

    pub fn layout(&self) -> &SaveLayout {
        &self.layout
    }

    pub fn state(&self) -> OperationState {
        self.state
    }

    pub fn phase(&self) -> Option<SubPhase> {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.state != OperationState::Idle || self.pending.is_some()
    }

    /// Advances every tick while an operation is visible. For progress UI.
    pub fn spinner_frame(&self) -> u32 {
        self.spinner_frame
    }

    pub fn last_outcome(&self) -> Option<&PersistenceFinished> {
        self.last_outcome.as_ref()
    }

    /// Report of the most recent level restore, if any operation restored one.
    pub fn last_restore(&self) -> Option<&LevelRestoreReport> {
        self.last_restore.as_ref()
    }

    pub fn completed_operations(&self) -> u64 {
        self.completed_operations
    }

    pub fn saved_game_exists(&self) -> bool {
        self.layout.saved_game_exists()
    }

    pub fn set_ux_min_display(&mut self, min: Duration) {
        self.config.ux_min_display = min;
    }

    /// Queues `request` for the next tick. Rejected while another operation
    /// is in flight; requests are never queued behind each other.
    pub fn submit(&mut self, request: PersistenceRequest) -> Result<(), SaveError> {
        if self.is_busy() {
            let in_flight = match self.state {
                OperationState::Idle => "Pending",
                state => state.label(),
            };
            return Err(SaveError::Busy { in_flight });
        }
        self.pending = Some(request);
        Ok(())
    }

    /// Called for every `ContextLoaded`; unblocks a waiting load phase.
    pub fn note_context_loaded(&mut self, context: ContextId) {
        self.loaded = Some(context);
    }

    pub fn save_options(&self, options: &UserOptions) -> PersistenceFinished {
        let errors = match save_options(&self.layout, options) {
            Ok(()) => Vec::new(),
            Err(e) => {
                error!("Failed to save options: {e}");
                vec![e.to_string()]
            }
        };
        PersistenceFinished {
            request: PersistenceRequest::SaveOptions,
            errors,
        }
    }

    /// Leaves `options` untouched when nothing usable is on disk.
    pub fn load_options(&self, options: &mut UserOptions) -> PersistenceFinished {
        if let Some(loaded) = load_options(&self.layout) {
            *options = loaded;
        }
        PersistenceFinished {
            request: PersistenceRequest::LoadOptions,
            errors: Vec::new(),
        }
    }

    /// Runs an options request against the world's `UserOptions`.
    pub fn serve_options(&self, world: &mut World, request: PersistenceRequest) -> PersistenceFinished {
        match world.get_resource_mut::<UserOptions>() {
            Some(options) if request == PersistenceRequest::SaveOptions => self.save_options(&options),
            Some(mut options) if request == PersistenceRequest::LoadOptions => {
                self.load_options(&mut options)
            }
            Some(_) => PersistenceFinished {
                request,
                errors: vec![format!("{request:?} is not an options request")],
            },
            None => PersistenceFinished {
                request,
                errors: vec!["No UserOptions resource in the world".to_string()],
            },
        }
    }

    pub fn tick(&mut self, world: &mut World, delta: Duration) {
        match self.state {
            OperationState::Idle => {
                if let Some(request) = self.pending.take() {
                    self.begin(world, request);
                }
            }
            OperationState::UxWait => {
                self.spinner_frame = self.spinner_frame.wrapping_add(1);
                self.ux_elapsed += delta;
                if self.ux_elapsed >= self.config.ux_min_display {
                    self.state = OperationState::Idle;
                    if let Some(mut gate) = world.get_resource_mut::<InteractionGate>() {
                        gate.resume();
                    }
                }
            }
            _ => {
                self.spinner_frame = self.spinner_frame.wrapping_add(1);
                self.advance(world);
            }
        }
    }

    fn begin(&mut self, world: &mut World, request: PersistenceRequest) {
        if let Some(mut gate) = world.get_resource_mut::<InteractionGate>() {
            gate.suspend();
        }
        let departed = world.get_resource::<ActiveContext>().and_then(|a| a.current);
        let mut op = ActiveOperation {
            request,
            target: None,
            departed,
            load_requested: false,
            errors: Vec::new(),
        };
        self.spinner_frame = 0;
        info!("Persistence: {request:?} started");

        let (state, phase) = match request {
            PersistenceRequest::Save => (OperationState::Saving, SubPhase::Saving),
            PersistenceRequest::Load => {
                match self.prepare_load() {
                    Ok(target) => op.target = Some(target),
                    Err(e) => {
                        op.record("Load aborted", e);
                        self.active = Some(op);
                        self.state = OperationState::Loading;
                        self.finish(world);
                        return;
                    }
                }
                (OperationState::Loading, SubPhase::LoadingLastContext)
            }
            PersistenceRequest::ChangeContextAndAutoSave(target) => {
                op.target = Some(target);
                (OperationState::ChangingContext, SubPhase::Saving)
            }
            PersistenceRequest::ChangeContextNoSave(target) => {
                op.target = Some(target);
                (OperationState::ChangingContextNoSave, SubPhase::LoadingNextContext)
            }
            PersistenceRequest::ReturnToBase => {
                op.target = Some(self.config.base_context);
                (OperationState::ReturningToBase, SubPhase::LoadingNextContext)
            }
            PersistenceRequest::StartNewGame => {
                if let Err(e) = self.start_new_game(world) {
                    op.record("Start new game", e);
                }
                self.active = Some(op);
                self.finish(world);
                return;
            }
            PersistenceRequest::SaveOptions | PersistenceRequest::LoadOptions => {
                op.errors = self.serve_options(world, request).errors;
                self.active = Some(op);
                self.finish(world);
                return;
            }
        };

        self.active = Some(op);
        self.state = state;
        self.phase = Some(phase);
    }

    /// Reads the saved context and seeds the auto tier from the full tier.
    /// Runs before anything is unloaded so a failure leaves the world as is.
    fn prepare_load(&self) -> Result<ContextId, SaveError> {
        let target = self.layout.saved_context()?;
        let seeded = self.layout.demote()?;
        debug!("Demoted {seeded} level file(s) for load of context {target}");
        Ok(target)
    }

    fn start_new_game(&self, world: &mut World) -> Result<(), SaveError> {
        clear_inventory(world);
        self.layout.write_core(None)?;
        self.layout.clear_levels(Tier::Auto)?;
        self.layout.clear_levels(Tier::Full)?;
        self.layout.remove_player_and_inventory()?;
        Ok(())
    }

    fn advance(&mut self, world: &mut World) {
        let Some(phase) = self.phase else {
            return;
        };
        let Some(mut op) = self.active.take() else {
            return;
        };

        match phase {
            SubPhase::Saving => {
                if self.state == OperationState::Saving {
                    if let Err(e) = self.save_inner(world, op.departed) {
                        op.record("Save failed", e);
                    }
                    self.active = Some(op);
                    self.finish(world);
                    return;
                }
                // Context change: a failed auto write is reported but does
                // not block the transition.
                if op.departed.is_none() {
                    debug!("No context loaded, nothing to auto save");
                } else if let Err(e) = self.write_auto_level(world, op.departed) {
                    op.record("Auto save failed", e);
                }
                self.phase = Some(SubPhase::LoadingNextContext);
            }
            SubPhase::LoadingLastContext | SubPhase::LoadingNextContext => {
                let Some(target) = op.target else {
                    op.record("Context load", SaveError::NoActiveContext);
                    self.active = Some(op);
                    self.finish(world);
                    return;
                };
                if !op.load_requested {
                    self.unload_current(world);
                    self.loaded = None;
                    world.send_event(ContextLoadRequested { context: target });
                    op.load_requested = true;
                    debug!("Requested load of context {target}");
                } else if self.loaded == Some(target) {
                    self.phase = Some(SubPhase::RestoringContextData);
                }
            }
            SubPhase::RestoringContextData => {
                self.restore_context(world, &mut op);
                self.active = Some(op);
                self.finish(world);
                return;
            }
        }
        self.active = Some(op);
    }

    fn write_auto_level(&self, world: &mut World, context: Option<ContextId>) -> Result<(), SaveError> {
        let context = context.ok_or(SaveError::NoActiveContext)?;
        let record = gather_level(world);
        self.layout.write_level(Tier::Auto, context, &record)
    }

    /// Auto level first, then promotion, then the singletons. Core goes last
    /// so it only ever names a context whose files are complete.
    fn save_inner(&self, world: &mut World, context: Option<ContextId>) -> Result<(), SaveError> {
        let context = context.ok_or(SaveError::NoActiveContext)?;
        self.write_auto_level(world, Some(context))?;
        let promoted = self.layout.promote()?;

        match gather_player(world) {
            Some(player) => self.layout.write_player(&player)?,
            None => warn!("No player entity to save"),
        }
        self.layout.write_inventory(&gather_inventory(world))?;
        self.layout.write_core(Some(context))?;

        info!("Saved context {context} ({promoted} level file(s) promoted)");
        Ok(())
    }

    fn unload_current(&self, world: &mut World) {
        let keep = match self.state {
            OperationState::Loading => None,
            _ => held_entity(world),
        };
        if keep.is_none() {
            if let Some(held) = held_entity(world) {
                world.entity_mut(held).despawn_recursive();
            }
        }
        if self.state == OperationState::ChangingContextNoSave {
            clear_world_items(world, keep);
        }
        let removed = despawn_context_entities(world, keep);
        debug!("Unloaded {removed} context entities");
    }

    fn restore_context(&mut self, world: &mut World, op: &mut ActiveOperation) {
        let Some(target) = op.target else {
            return;
        };

        match self.state {
            OperationState::Loading => {
                self.restore_level_from_auto(world, target, false, op);
                match self.layout.read_player() {
                    Ok(player) => {
                        restore_player(world, &player);
                    }
                    Err(e) if e.is_not_found() => warn!("Saved game has no player file"),
                    Err(e) => op.record("Player restore", e),
                }
                match self.layout.read_inventory() {
                    Ok(inventory) => {
                        restore_inventory(world, &inventory);
                    }
                    Err(e) if e.is_not_found() => {
                        warn!("Saved game has no inventory file");
                        clear_inventory(world);
                    }
                    Err(e) => op.record("Inventory restore", e),
                }
            }
            OperationState::ChangingContext | OperationState::ChangingContextNoSave => {
                self.restore_level_from_auto(world, target, true, op);
                if let Some(departed) = op.departed {
                    reposition_at_entrance(world, departed);
                }
            }
            OperationState::ReturningToBase => {
                if let Some(held) = held_entity(world) {
                    world.entity_mut(held).despawn_recursive();
                }
                if let Some(mut inventory) = world.get_resource_mut::<Inventory>() {
                    inventory.held = None;
                }
                clear_world_items(world, None);
            }
            _ => {}
        }
    }

    fn restore_level_from_auto(
        &mut self,
        world: &mut World,
        target: ContextId,
        preserve_held: bool,
        op: &mut ActiveOperation,
    ) {
        match self.layout.read_level(Tier::Auto, target) {
            Ok(Some(record)) => {
                let report = restore_level(world, &record, RestoreOptions { preserve_held });
                self.last_restore = Some(report);
            }
            Ok(None) => debug!("No saved state for context {target}, keeping authored defaults"),
            Err(e) => op.record("Level restore", e),
        }
    }

    fn finish(&mut self, world: &mut World) {
        let Some(op) = self.active.take() else {
            return;
        };
        let outcome = PersistenceFinished {
            request: op.request,
            errors: op.errors,
        };
        if outcome.succeeded() {
            info!("Persistence: {:?} finished", outcome.request);
        } else {
            error!(
                "Persistence: {:?} finished with {} error(s)",
                outcome.request,
                outcome.errors.len()
            );
        }

        world.send_event(outcome.clone());
        self.last_outcome = Some(outcome);
        self.completed_operations += 1;
        self.phase = None;
        self.state = OperationState::UxWait;
        self.ux_elapsed = Duration::ZERO;
    }
}
