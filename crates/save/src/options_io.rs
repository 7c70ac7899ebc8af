// ---------------------------------------------------------------------------
// options_io – User preferences, stored outside both save tiers
// ---------------------------------------------------------------------------

use bevy::prelude::*;
use scene::UserOptions;

use crate::layout::SaveLayout;
use crate::save_error::SaveError;
use crate::snapshot_types::OptionsSnapshot;

pub fn save_options(layout: &SaveLayout, options: &UserOptions) -> Result<(), SaveError> {
    layout.write_options(&OptionsSnapshot::from(options))
}

/// `None` when there is nothing usable on disk; callers keep their current
/// (default) options in that case.
pub fn load_options(layout: &SaveLayout) -> Option<UserOptions> {
    match layout.read_options() {
        Ok(snapshot) => Some(UserOptions::from(&snapshot)),
        Err(e) if e.is_not_found() => {
            debug!("No options file at {}", layout.options_path().display());
            None
        }
        Err(e) => {
            warn!("Ignoring unreadable options file: {e}");
            None
        }
    }
}
