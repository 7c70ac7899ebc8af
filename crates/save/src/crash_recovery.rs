//! Startup sweep for interrupted writes.
//!
//! Every save file goes through `atomic_write`, so a crash mid-write leaves a
//! `.tmp` file next to an intact previous version. On startup those leftovers
//! are removed from the save root and both tiers, and every remaining record
//! file is checked against its header checksum so a damaged file is reported
//! before anything tries to load it.

use std::path::{Path, PathBuf};

use bevy::prelude::*;

use crate::atomic_write::TMP_SUFFIX;
use crate::coordinator::PersistenceCoordinator;
use crate::file_header::unwrap_header;
use crate::layout::{SaveLayout, Tier, DAT_EXTENSION};

// =============================================================================
// Resources
// =============================================================================

/// Result of the startup sweep.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct CrashRecoveryState {
    /// Whether any `.tmp` leftovers were found.
    pub detected: bool,
    pub tmp_files_cleaned: usize,
    /// Record files whose header or checksum no longer validates.
    pub corrupted_files: Vec<PathBuf>,
}

// =============================================================================
// Core Logic
// =============================================================================

fn scan_dirs(layout: &SaveLayout) -> [PathBuf; 3] {
    [
        layout.root.clone(),
        layout.tier_dir(Tier::Auto),
        layout.tier_dir(Tier::Full),
    ]
}

fn files_with_suffix(dir: &Path, suffix: &str) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut found: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.ends_with(suffix))
        })
        .collect();
    found.sort();
    found
}

/// `.tmp` leftovers under the save root and both tier directories.
pub(crate) fn find_tmp_files(layout: &SaveLayout) -> Vec<PathBuf> {
    scan_dirs(layout)
        .iter()
        .flat_map(|dir| files_with_suffix(dir, TMP_SUFFIX))
        .collect()
}

/// Removes all `.tmp` files from the list, logging each removal.
///
/// Returns the number of files successfully removed.
pub(crate) fn clean_tmp_files(tmp_files: &[PathBuf]) -> usize {
    let mut cleaned = 0;
    for path in tmp_files {
        match std::fs::remove_file(path) {
            Ok(()) => {
                info!("Crash recovery: cleaned up tmp file: {}", path.display());
                cleaned += 1;
            }
            Err(e) => {
                warn!(
                    "Crash recovery: failed to remove tmp file {}: {}",
                    path.display(),
                    e
                );
            }
        }
    }
    cleaned
}

/// True if the file exists and its header and checksum validate.
pub(crate) fn validate_record_file(path: &Path) -> bool {
    match std::fs::read(path) {
        Ok(bytes) => unwrap_header(&bytes).is_ok(),
        Err(_) => false,
    }
}

pub(crate) fn perform_crash_recovery_scan(layout: &SaveLayout) -> CrashRecoveryState {
    let tmp_files = find_tmp_files(layout);
    let detected = !tmp_files.is_empty();
    let tmp_files_cleaned = clean_tmp_files(&tmp_files);
    if detected {
        info!(
            "Crash recovery: removed {tmp_files_cleaned} of {} interrupted write(s)",
            tmp_files.len()
        );
    }

    let dat_suffix = format!(".{DAT_EXTENSION}");
    let corrupted_files: Vec<PathBuf> = scan_dirs(layout)
        .iter()
        .flat_map(|dir| files_with_suffix(dir, &dat_suffix))
        .filter(|path| !validate_record_file(path))
        .collect();
    for path in &corrupted_files {
        warn!("Crash recovery: {} fails validation", path.display());
    }

    CrashRecoveryState {
        detected,
        tmp_files_cleaned,
        corrupted_files,
    }
}

// =============================================================================
// Bevy Systems
// =============================================================================

pub(crate) fn recover_interrupted_writes(
    mut commands: Commands,
    coordinator: Res<PersistenceCoordinator>,
) {
    let state = perform_crash_recovery_scan(coordinator.layout());
    commands.insert_resource(state);
}
