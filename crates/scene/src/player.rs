// ---------------------------------------------------------------------------
// player – The persistent actor
// ---------------------------------------------------------------------------
//
// The player entity is not context scoped: it survives every context change
// and is repositioned rather than respawned.

use bevy::prelude::*;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Where the camera looks and how the body is posed.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerLook {
    pub focus: Vec3,
    pub crouched: bool,
}

/// Yaw/pitch window (degrees) the camera is clamped to while docked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookLimits {
    pub min_yaw: f32,
    pub max_yaw: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
}

impl Default for LookLimits {
    fn default() -> Self {
        Self {
            min_yaw: -180.0,
            max_yaw: 180.0,
            min_pitch: -89.0,
            max_pitch: 89.0,
        }
    }
}

/// Docking pins the player to an object (a bed, a ladder, a terminal).
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct PlayerDock {
    pub docked: bool,
    /// Name of the entity the player is docked to. Empty when free.
    pub target: String,
    pub look_limits: LookLimits,
    pub pending_focus: Option<Vec3>,
    pub pending_position: Option<Vec3>,
    /// Set while easing into or out of a dock. Saving in this window is a
    /// caller bug: the pending targets are not stable yet.
    pub in_transition: bool,
}
