//! Crash-safe file replacement.
//!
//! Every save file is written to `{path}.tmp`, flushed with `sync_all()`,
//! then renamed over the final path, so an interrupted write can never leave
//! a half-written level or core file behind. Tier promotion/demotion copies go
//! through the same path. Leftover `.tmp` files are swept on startup by
//! `crash_recovery`.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Suffix appended to the final path while a write is in progress.
pub const TMP_SUFFIX: &str = ".tmp";

/// `level_3.dat` -> `level_3.dat.tmp`
pub fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(TMP_SUFFIX);
    PathBuf::from(name)
}

fn ensure_parent(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Atomically replaces the contents of `path` with `data`.
pub fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    ensure_parent(path)?;
    let tmp_path = tmp_path_for(path);

    let mut file = File::create(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&tmp_path, path)
}

/// Atomically replaces `to` with a byte-for-byte copy of `from`.
pub fn atomic_copy(from: &Path, to: &Path) -> std::io::Result<u64> {
    ensure_parent(to)?;
    let tmp_path = tmp_path_for(to);

    let copied = fs::copy(from, &tmp_path)?;
    File::open(&tmp_path)?.sync_all()?;
    fs::rename(&tmp_path, to)?;

    Ok(copied)
}
