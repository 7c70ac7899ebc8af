// ---------------------------------------------------------------------------
// interactables – Category components restored in place by name
// ---------------------------------------------------------------------------

use bevy::prelude::*;

/// A volume that fires once something crosses it.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct TriggerZone {
    pub armed: bool,
    pub tripped: bool,
}

/// Anything the player can use: levers, switches, buttons.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct Activatable {
    pub fired_once: bool,
    pub toggled_on: bool,
    /// Interaction prompt currently shown for this entity.
    pub hint: String,
}

/// Discrete position of a hinged or sliding part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwingState {
    #[default]
    Closed,
    Open,
    Opening,
    Closing,
    Ajar,
}

/// Shared state of doors and drawers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Swing {
    pub state: SwingState,
    pub hint: String,
    /// Partial swing angle or slide offset for `Ajar`/in-motion states.
    pub travel: Vec3,
    pub locked_inside: bool,
    pub locked_outside: bool,
}

impl Swing {
    pub fn is_locked(&self) -> bool {
        self.locked_inside || self.locked_outside
    }
}

#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct Door(pub Swing);

#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct Drawer(pub Swing);

/// Catch-all for ad hoc state that does not warrant its own category.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct GenericState {
    pub int_slot: i32,
    pub float_slot: f32,
    pub flag: bool,
}
