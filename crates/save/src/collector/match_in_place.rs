// ---------------------------------------------------------------------------
// match_in_place – Categories restored onto the authored entities by name
// ---------------------------------------------------------------------------

use bevy::prelude::*;

use scene::{Activatable, AttachedNote, AudioDiary, Door, Drawer, GenericState, Journal, Swing, TriggerZone};

use crate::save_codec::{swing_state_to_u8, u8_to_swing_state};
use crate::snapshot_types::*;

use super::name_index::NameIndex;
use super::report::RestoreReport;

/// A category component whose state can be captured into, and overwritten
/// from, a named snapshot.
pub trait MatchInPlace: Component + Sized {
    type Snapshot: Clone;
    /// Label used in logs and restore reports.
    const CATEGORY: &'static str;

    fn capture(&self, name: &str) -> Self::Snapshot;
    fn snapshot_name(snapshot: &Self::Snapshot) -> &str;
    fn apply(&mut self, snapshot: &Self::Snapshot);
}

/// Snapshots of every live instance of `C`, sorted by name.
pub fn gather_matched<C: MatchInPlace>(world: &mut World) -> Vec<C::Snapshot> {
    let mut query = world.query::<(&Name, &C)>();
    let mut snapshots: Vec<C::Snapshot> = query
        .iter(world)
        .map(|(name, component)| component.capture(name.as_str()))
        .collect();
    snapshots.sort_by(|a, b| C::snapshot_name(a).cmp(C::snapshot_name(b)));
    snapshots
}

/// Applies each snapshot to the live `C` of the same name. Misses are logged
/// and reported, never fatal.
pub fn restore_matched<C: MatchInPlace>(world: &mut World, snapshots: &[C::Snapshot]) -> RestoreReport {
    let index = NameIndex::build::<C>(world);
    let mut report = RestoreReport::new(C::CATEGORY);

    for snapshot in snapshots {
        let name = C::snapshot_name(snapshot);
        let live = index
            .get(name)
            .and_then(|entity| world.get_mut::<C>(entity));
        match live {
            Some(mut component) => {
                component.apply(snapshot);
                report.applied += 1;
            }
            None => {
                warn!("No live {} named '{name}', skipping its saved state", C::CATEGORY);
                report.missed.push(name.to_string());
            }
        }
    }
    report
}

impl MatchInPlace for TriggerZone {
    type Snapshot = TriggerSnapshot;
    const CATEGORY: &'static str = "trigger";

    fn capture(&self, name: &str) -> TriggerSnapshot {
        TriggerSnapshot {
            name: name.to_string(),
            armed: self.armed,
            tripped: self.tripped,
        }
    }

    fn snapshot_name(s: &TriggerSnapshot) -> &str {
        &s.name
    }

    fn apply(&mut self, s: &TriggerSnapshot) {
        self.armed = s.armed;
        self.tripped = s.tripped;
    }
}

impl MatchInPlace for Activatable {
    type Snapshot = ActivatableSnapshot;
    const CATEGORY: &'static str = "activatable";

    fn capture(&self, name: &str) -> ActivatableSnapshot {
        ActivatableSnapshot {
            name: name.to_string(),
            fired_once: self.fired_once,
            toggled_on: self.toggled_on,
            hint: self.hint.clone(),
        }
    }

    fn snapshot_name(s: &ActivatableSnapshot) -> &str {
        &s.name
    }

    fn apply(&mut self, s: &ActivatableSnapshot) {
        self.fired_once = s.fired_once;
        self.toggled_on = s.toggled_on;
        self.hint.clone_from(&s.hint);
    }
}

fn capture_swing(swing: &Swing, name: &str) -> SwingSnapshot {
    SwingSnapshot {
        name: name.to_string(),
        state: swing_state_to_u8(swing.state),
        hint: swing.hint.clone(),
        travel: swing.travel.to_array(),
        locked_inside: swing.locked_inside,
        locked_outside: swing.locked_outside,
    }
}

fn apply_swing(swing: &mut Swing, s: &SwingSnapshot) {
    swing.state = u8_to_swing_state(s.state);
    swing.hint.clone_from(&s.hint);
    swing.travel = Vec3::from_array(s.travel);
    swing.locked_inside = s.locked_inside;
    swing.locked_outside = s.locked_outside;
}

impl MatchInPlace for Door {
    type Snapshot = DoorSnapshot;
    const CATEGORY: &'static str = "door";

    fn capture(&self, name: &str) -> DoorSnapshot {
        capture_swing(&self.0, name)
    }

    fn snapshot_name(s: &DoorSnapshot) -> &str {
        &s.name
    }

    fn apply(&mut self, s: &DoorSnapshot) {
        apply_swing(&mut self.0, s);
    }
}

impl MatchInPlace for Drawer {
    type Snapshot = DrawerSnapshot;
    const CATEGORY: &'static str = "drawer";

    fn capture(&self, name: &str) -> DrawerSnapshot {
        capture_swing(&self.0, name)
    }

    fn snapshot_name(s: &DrawerSnapshot) -> &str {
        &s.name
    }

    fn apply(&mut self, s: &DrawerSnapshot) {
        apply_swing(&mut self.0, s);
    }
}

impl MatchInPlace for GenericState {
    type Snapshot = GenericSnapshot;
    const CATEGORY: &'static str = "generic";

    fn capture(&self, name: &str) -> GenericSnapshot {
        GenericSnapshot {
            name: name.to_string(),
            int_slot: self.int_slot,
            float_slot: self.float_slot,
            flag: self.flag,
        }
    }

    fn snapshot_name(s: &GenericSnapshot) -> &str {
        &s.name
    }

    fn apply(&mut self, s: &GenericSnapshot) {
        self.int_slot = s.int_slot;
        self.float_slot = s.float_slot;
        self.flag = s.flag;
    }
}

impl MatchInPlace for AttachedNote {
    type Snapshot = NoteSnapshot;
    const CATEGORY: &'static str = "note";

    fn capture(&self, name: &str) -> NoteSnapshot {
        NoteSnapshot {
            name: name.to_string(),
            collected: self.collected,
        }
    }

    fn snapshot_name(s: &NoteSnapshot) -> &str {
        &s.name
    }

    fn apply(&mut self, s: &NoteSnapshot) {
        self.collected = s.collected;
    }
}

// Both diary variants share this impl, so their names share one index.
impl MatchInPlace for AudioDiary {
    type Snapshot = DiarySnapshot;
    const CATEGORY: &'static str = "diary";

    fn capture(&self, name: &str) -> DiarySnapshot {
        DiarySnapshot {
            name: name.to_string(),
            played: self.played,
        }
    }

    fn snapshot_name(s: &DiarySnapshot) -> &str {
        &s.name
    }

    fn apply(&mut self, s: &DiarySnapshot) {
        self.played = s.played;
    }
}

impl MatchInPlace for Journal {
    type Snapshot = JournalSnapshot;
    const CATEGORY: &'static str = "journal";

    fn capture(&self, name: &str) -> JournalSnapshot {
        JournalSnapshot {
            name: name.to_string(),
            read: self.read,
        }
    }

    fn snapshot_name(s: &JournalSnapshot) -> &str {
        &s.name
    }

    fn apply(&mut self, s: &JournalSnapshot) {
        self.read = s.read;
    }
}
