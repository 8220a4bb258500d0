//! Typing streak detection.
//!
//! While the user types fast, rolling over a dual-role key onto the next key is
//! far more likely part of a word than a chord, so the key resolves as a tap.
use crate::{
    config::ResolverConfig,
    definitions,
    keycode::{Keycode, ModifierSet},
    keymap::DualRoleKey,
    timer::{self, Timestamp},
};

/// The user hooks of the streak detection.
pub trait StreakPolicy {
    /// The streak window of the given dual-role key, `0` disables the
    /// streak for the key.
    fn chord_timeout(&self, key: &DualRoleKey, config: &ResolverConfig) -> u32;

    /// Checks if typing the keycode keeps a running streak alive.
    /// `active_mods` are the modifiers held down by resolved holds.
    fn continues_streak(&self, keycode: Keycode, active_mods: ModifierSet) -> bool;
}

/// Modifiers that turn the next keys into shortcuts rather then text
const SHORTCUT_MODS: ModifierSet = ModifierSet::from_bits(
    ModifierSet::LCTL.bits()
        | ModifierSet::RCTL.bits()
        | ModifierSet::LGUI.bits()
        | ModifierSet::RGUI.bits()
        | ModifierSet::LALT.bits(),
);

/// The streak policy of the keymap:
/// - layer-tap keys never take part in a streak
/// - shift mod-tap keys use the base window
/// - all other mod-tap keys use the extended window
/// - letters and common punctuation continue a streak, unless a shortcut modifier is held
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStreakPolicy;

impl StreakPolicy for DefaultStreakPolicy {
    fn chord_timeout(&self, key: &DualRoleKey, config: &ResolverConfig) -> u32 {
        if key.is_layer_tap() {
            0
        } else if key.is_shift_mod_tap() {
            config.streak_timeout
        } else {
            config.streak_timeout_extended
        }
    }

    fn continues_streak(&self, keycode: Keycode, active_mods: ModifierSet) -> bool {
        // shift and AltGr still type text
        if active_mods.intersects(SHORTCUT_MODS) {
            return false;
        }
        keycode.is_letter() || definitions::streak::PUNCTUATION.contains(&keycode)
    }
}

/// The rolling typing streak.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreakState {
    pub last_resolved_time: Option<Timestamp>,
    pub active: bool,
}

impl StreakState {
    /// Will record a resolution at the given time.
    pub fn record(&mut self, time: Timestamp, continues: bool) {
        self.last_resolved_time = Some(time);
        self.active = continues;
    }

    pub fn reset(&mut self) {
        self.active = false;
    }

    /// Checks if a dual-role key pressed at `press_time` is inside the streak,
    /// a streak that is older then `timeout` ends here.
    pub fn applies(&mut self, press_time: Timestamp, timeout: u32) -> bool {
        if timeout == 0 || !self.active {
            return false;
        }
        match self.last_resolved_time {
            Some(last) if timer::elapsed(last, press_time) < timeout => true,
            _ => {
                self.reset();
                false
            }
        }
    }

    /// Ends the streak once no key could continue it anymore.
    pub fn expire(&mut self, now: Timestamp, longest_timeout: u32) {
        if let Some(last) = self.last_resolved_time {
            if self.active && timer::expired(last, now, longest_timeout) {
                log::trace!("streak expired at {}", now);
                self.reset();
            }
        }
    }
}
