use bevy::prelude::*;

use crate::items::ItemKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemStack {
    pub kind: ItemKind,
    pub count: u32,
}

/// The player's carried state. Lists keep insertion order, which is also
/// the order the inventory screen shows them in.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct Inventory {
    /// The world entity currently held in the player's hands, if any.
    pub held: Option<Entity>,
    pub stacks: Vec<ItemStack>,
    pub notes: Vec<String>,
    pub audio_logs: Vec<String>,
}

impl Inventory {
    /// Adds `count` of `kind`, merging into an existing stack when the kind
    /// stacks.
    pub fn add_item(&mut self, kind: ItemKind, count: u32) {
        if kind.is_stackable() {
            if let Some(stack) = self.stacks.iter_mut().find(|s| s.kind == kind) {
                stack.count += count;
                return;
            }
        }
        self.stacks.push(ItemStack { kind, count });
    }

    pub fn add_note(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.notes.contains(&name) {
            self.notes.push(name);
        }
    }

    pub fn add_audio_log(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.audio_logs.contains(&name) {
            self.audio_logs.push(name);
        }
    }

    pub fn count_of(&self, kind: ItemKind) -> u32 {
        self.stacks
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| s.count)
            .sum()
    }

    /// Forgets everything, including the held reference. Despawning the
    /// held entity is the caller's job.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
