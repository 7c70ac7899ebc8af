use bevy::prelude::*;

/// User preferences. Persisted outside both save tiers so a new game or a
/// load never touches them.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct UserOptions {
    pub master_volume: f32,
    pub music_volume: f32,
    pub effects_volume: f32,
    pub mouse_sensitivity: f32,
    pub invert_y: bool,
    /// Vertical field of view in degrees.
    pub field_of_view: f32,
    pub subtitles: bool,
}

impl Default for UserOptions {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            music_volume: 0.8,
            effects_volume: 1.0,
            mouse_sensitivity: 1.0,
            invert_y: false,
            field_of_view: 70.0,
            subtitles: true,
        }
    }
}
