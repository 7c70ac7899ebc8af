//! Readables and recordings. These are often spawned as children of a host
//! entity (a crate, a desk) and are recreated with default state whenever the
//! host is, which is why they are restored after world-placed items.

use bevy::prelude::*;

#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct AttachedNote {
    pub collected: bool,
}

/// The two diary flavours share one identity space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiaryVariant {
    /// Plays when the player walks past.
    #[default]
    Passive,
    /// Plays when the player uses it.
    Interactive,
}

#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct AudioDiary {
    pub variant: DiaryVariant,
    pub played: bool,
}

impl AudioDiary {
    pub fn passive() -> Self {
        Self {
            variant: DiaryVariant::Passive,
            played: false,
        }
    }

    pub fn interactive() -> Self {
        Self {
            variant: DiaryVariant::Interactive,
            played: false,
        }
    }
}

#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct Journal {
    pub read: bool,
}
