use crate::{
    event::{KeyEvent, OutputAction},
    keycode::{Keycode, LayerId, ModifierSet},
    keymap::{DualRoleKey, KeyId},
    timer::{self, Timestamp},
};

/// The two ways a dual-role key press can end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Tap,
    Hold,
}

/// A dual-role key that was pressed but is not yet known to be a tap or a hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingChord {
    pub key: KeyId,
    pub binding: DualRoleKey,
    pub press_time: Timestamp,
    /// `None` while undecided
    pub resolution: Option<Resolution>,
    /// the press held back until the key is decided, replayed right after
    pub interrupted_by: Option<KeyEvent>,
}

impl PendingChord {
    pub fn new(key: KeyId, binding: DualRoleKey, press_time: Timestamp) -> Self {
        Self {
            key,
            binding,
            press_time,
            resolution: None,
            interrupted_by: None,
        }
    }

    pub fn elapsed(&self, now: Timestamp) -> u32 {
        timer::elapsed(self.press_time, now)
    }

    pub fn timed_out(&self, now: Timestamp, tapping_term: u32) -> bool {
        timer::expired(self.press_time, now, tapping_term)
    }

    /// Will hold back the interrupting press, only the first one is kept.
    pub fn interrupt(&mut self, event: KeyEvent) {
        if self.interrupted_by.is_none() {
            self.interrupted_by = Some(event);
        }
    }
}

/// What a key that is down after its resolution has registered,
/// and therefore has to unregister on release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Held {
    Key(Keycode),
    Modifier(ModifierSet),
    Layer(LayerId),
}

impl Held {
    pub(super) fn release_action(self) -> OutputAction {
        match self {
            Held::Key(keycode) => OutputAction::Release(keycode),
            Held::Modifier(mods) => OutputAction::ReleaseModifier(mods),
            Held::Layer(layer) => OutputAction::ReleaseLayerSwitch(layer),
        }
    }
}
