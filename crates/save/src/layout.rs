// ---------------------------------------------------------------------------
// layout – Two-tier file layout, promotion and demotion
// ---------------------------------------------------------------------------
//
//   <root>/auto/level_<N>.dat   per-context snapshots, written on every change
//   <root>/full/level_<N>.dat   durable copies, refreshed on manual save
//   <root>/full/core.dat        last manually saved context, or the sentinel
//   <root>/full/player.dat
//   <root>/full/inventory.dat
//   <root>/options.dat          outside both tiers

use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use scene::ContextId;

use crate::atomic_write::atomic_copy;
use crate::record_io::{read_record, write_record};
use crate::save_error::SaveError;
use crate::snapshot_types::{CoreSnapshot, InventorySnapshot, LevelRecord, OptionsSnapshot, PlayerSnapshot};

pub const AUTO_DIR: &str = "auto";
pub const FULL_DIR: &str = "full";
pub const LEVEL_PREFIX: &str = "level_";
pub const DAT_EXTENSION: &str = "dat";
pub const CORE_FILE: &str = "core.dat";
pub const PLAYER_FILE: &str = "player.dat";
pub const INVENTORY_FILE: &str = "inventory.dat";
pub const OPTIONS_FILE: &str = "options.dat";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Auto,
    Full,
}

impl Tier {
    fn dir_name(self) -> &'static str {
        match self {
            Tier::Auto => AUTO_DIR,
            Tier::Full => FULL_DIR,
        }
    }
}

/// Parses `level_<N>.dat`.
fn parse_level_file(file_name: &str) -> Option<ContextId> {
    let stem = file_name.strip_suffix(".dat")?;
    let index = stem.strip_prefix(LEVEL_PREFIX)?;
    index.parse().ok().map(ContextId)
}

/// Treats a missing file as success.
fn remove_if_present(path: &Path) -> Result<bool, SaveError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Paths and file operations under one save root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveLayout {
    pub root: PathBuf,
    pub compress: bool,
}

impl SaveLayout {
    pub fn new(root: impl Into<PathBuf>, compress: bool) -> Self {
        Self {
            root: root.into(),
            compress,
        }
    }

    pub fn tier_dir(&self, tier: Tier) -> PathBuf {
        self.root.join(tier.dir_name())
    }

    pub fn level_path(&self, tier: Tier, context: ContextId) -> PathBuf {
        self.tier_dir(tier)
            .join(format!("{LEVEL_PREFIX}{}.{DAT_EXTENSION}", context.0))
    }

    pub fn core_path(&self) -> PathBuf {
        self.tier_dir(Tier::Full).join(CORE_FILE)
    }

    pub fn player_path(&self) -> PathBuf {
        self.tier_dir(Tier::Full).join(PLAYER_FILE)
    }

    pub fn inventory_path(&self) -> PathBuf {
        self.tier_dir(Tier::Full).join(INVENTORY_FILE)
    }

    pub fn options_path(&self) -> PathBuf {
        self.root.join(OPTIONS_FILE)
    }

    /// Contexts with a level file in `tier`, ascending. A missing tier
    /// directory has no levels.
    pub fn list_levels(&self, tier: Tier) -> Result<Vec<ContextId>, SaveError> {
        let entries = match fs::read_dir(self.tier_dir(tier)) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut contexts = Vec::new();
        for entry in entries {
            let entry = entry?;
            if let Some(context) = entry.file_name().to_str().and_then(parse_level_file) {
                contexts.push(context);
            }
        }
        contexts.sort();
        Ok(contexts)
    }

    pub fn write_level(&self, tier: Tier, context: ContextId, record: &LevelRecord) -> Result<(), SaveError> {
        write_record(&self.level_path(tier, context), record, self.compress)
    }

    /// `Ok(None)` when the context has never been written to `tier`.
    pub fn read_level(&self, tier: Tier, context: ContextId) -> Result<Option<LevelRecord>, SaveError> {
        match read_record(&self.level_path(tier, context)) {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Copies every auto level file over its full counterpart, including
    /// contexts not visited since the last save.
    pub fn promote(&self) -> Result<usize, SaveError> {
        let contexts = self.list_levels(Tier::Auto)?;
        for context in &contexts {
            atomic_copy(
                &self.level_path(Tier::Auto, *context),
                &self.level_path(Tier::Full, *context),
            )?;
        }
        Ok(contexts.len())
    }

    /// Seeds auto from the full tier, then removes auto levels the full tier
    /// does not have. A failed copy returns before anything is removed, so
    /// the auto tier is never left emptier than it started.
    pub fn demote(&self) -> Result<usize, SaveError> {
        let contexts = self.list_levels(Tier::Full)?;
        for context in &contexts {
            atomic_copy(
                &self.level_path(Tier::Full, *context),
                &self.level_path(Tier::Auto, *context),
            )?;
        }
        for stale in self.list_levels(Tier::Auto)? {
            if !contexts.contains(&stale) {
                remove_if_present(&self.level_path(Tier::Auto, stale))?;
            }
        }
        Ok(contexts.len())
    }

    pub fn clear_levels(&self, tier: Tier) -> Result<usize, SaveError> {
        let mut removed = 0;
        for context in self.list_levels(tier)? {
            if remove_if_present(&self.level_path(tier, context))? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// `None` writes the "no saved game" sentinel.
    pub fn write_core(&self, last_context: Option<ContextId>) -> Result<(), SaveError> {
        let core = last_context.map_or_else(CoreSnapshot::no_save, CoreSnapshot::at);
        write_record(&self.core_path(), &core, self.compress)
    }

    pub fn read_core(&self) -> Result<CoreSnapshot, SaveError> {
        read_record(&self.core_path())
    }

    /// The context of the last manual save. A missing core file or the
    /// sentinel both mean `NoSavedGame`.
    pub fn saved_context(&self) -> Result<ContextId, SaveError> {
        match self.read_core() {
            Ok(core) => core.saved_context().ok_or(SaveError::NoSavedGame),
            Err(e) if e.is_not_found() => Err(SaveError::NoSavedGame),
            Err(e) => Err(e),
        }
    }

    /// True only if the core file decodes and holds a real context index.
    pub fn saved_game_exists(&self) -> bool {
        match self.saved_context() {
            Ok(_) => true,
            Err(SaveError::NoSavedGame) => false,
            Err(e) => {
                warn!("Core save file unreadable, treating as no saved game: {e}");
                false
            }
        }
    }

    pub fn write_player(&self, player: &PlayerSnapshot) -> Result<(), SaveError> {
        write_record(&self.player_path(), player, self.compress)
    }

    pub fn read_player(&self) -> Result<PlayerSnapshot, SaveError> {
        read_record(&self.player_path())
    }

    pub fn write_inventory(&self, inventory: &InventorySnapshot) -> Result<(), SaveError> {
        write_record(&self.inventory_path(), inventory, self.compress)
    }

    pub fn read_inventory(&self) -> Result<InventorySnapshot, SaveError> {
        read_record(&self.inventory_path())
    }

    pub fn write_options(&self, options: &OptionsSnapshot) -> Result<(), SaveError> {
        write_record(&self.options_path(), options, self.compress)
    }

    pub fn read_options(&self) -> Result<OptionsSnapshot, SaveError> {
        read_record(&self.options_path())
    }

    pub fn remove_player_and_inventory(&self) -> Result<(), SaveError> {
        remove_if_present(&self.player_path())?;
        remove_if_present(&self.inventory_path())?;
        Ok(())
    }
}
