//! Combos: a set of keys pressed together acts as one more key.
//!
//! Presses of member keys are held back until either every member of a combo
//! is down (the combo key is pressed), or it is clear that no combo can follow.
//! In the latter case the held back presses go on as single keys, in order.
//! The combo key is released with the first released member.
use std::{iter, mem};

use crate::{
    event::KeyEvent,
    keymap::{KeyId, Keymap},
    timer::{self, Timestamp},
    KeymapError,
};

/// A set of member keys standing in for the key position `key`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Combo {
    key: KeyId,
    /// sorted and without duplicates
    members: Vec<KeyId>,
}

impl Combo {
    /// Will build the combo, it needs at least two distinct members and
    /// cannot contain its own key.
    pub fn new(key: KeyId, members: &[KeyId]) -> Result<Self, KeymapError> {
        let mut sorted = members.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.len() < 2 || sorted.len() != members.len() || sorted.binary_search(&key).is_ok() {
            return Err(KeymapError::InvalidCombo(key));
        }
        Ok(Self {
            key,
            members: sorted,
        })
    }

    pub fn key(&self) -> KeyId {
        self.key
    }

    pub fn members(&self) -> &[KeyId] {
        &self.members
    }

    pub fn contains(&self, key: KeyId) -> bool {
        self.members.binary_search(&key).is_ok()
    }

    /// Checks if the distinct keys are exactly the members.
    fn is_completed_by(&self, keys: &[KeyId]) -> bool {
        self.members.len() == keys.len() && keys.iter().all(|key| self.contains(*key))
    }

    /// Checks if more presses could still complete the combo.
    fn is_started_by(&self, keys: &[KeyId]) -> bool {
        self.members.len() > keys.len() && keys.iter().all(|key| self.contains(*key))
    }
}

/// What happened to a press of a physical key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComboPress {
    /// not a member key and nothing held back
    Pass,
    /// held back until the combo completes or fails
    Buffered,
    /// the press completed a combo, the combo key is pressed instead
    Fired(KeyEvent),
    /// the presses go on as single keys, in order
    Flushed(Vec<KeyEvent>),
}

/// What happened to a release of a physical key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComboRelease {
    Pass,
    /// a member of a combo that was already released
    Swallowed,
    /// the first member of a held combo went up, the combo key is released
    Released(KeyEvent),
    /// the key was held back, its press has to go on before the release
    Flushed(Vec<KeyEvent>),
}

#[derive(Debug, Clone)]
struct HeldCombo {
    key: KeyId,
    /// members that are still down
    down: Vec<KeyId>,
    released: bool,
}

/// The running combo detection of a resolver.
#[derive(Debug, Clone, Default)]
pub struct ComboState {
    buffer: Vec<KeyEvent>,
    held: Vec<HeldCombo>,
}

impl ComboState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if the physical key is down as part of a combo.
    pub fn is_down(&self, key: KeyId) -> bool {
        self.buffer.iter().any(|event| event.key == key)
            || self.held.iter().any(|combo| combo.down.contains(&key))
    }

    pub fn on_press(&mut self, keymap: &Keymap, event: KeyEvent) -> ComboPress {
        if !keymap.is_combo_member(event.key) {
            if self.buffer.is_empty() {
                return ComboPress::Pass;
            }
            let mut flushed = mem::take(&mut self.buffer);
            flushed.push(event);
            return ComboPress::Flushed(flushed);
        }

        let keys: Vec<KeyId> = self
            .buffer
            .iter()
            .map(|buffered| buffered.key)
            .chain(iter::once(event.key))
            .collect();

        let combos = keymap.combos();
        if let Some(combo) = combos.iter().find(|combo| combo.is_completed_by(&keys)) {
            let key = combo.key();
            log::debug!("combo {} fired by key {}", key, event.key);
            self.buffer.clear();
            self.held.push(HeldCombo {
                key,
                down: keys,
                released: false,
            });
            return ComboPress::Fired(KeyEvent::press(key, event.time));
        }

        if combos.iter().any(|combo| combo.is_started_by(&keys)) {
            self.buffer.push(event);
            return ComboPress::Buffered;
        }

        // the press is a member itself, so it may start another combo
        let flushed = mem::take(&mut self.buffer);
        self.buffer.push(event);
        ComboPress::Flushed(flushed)
    }

    pub fn on_release(&mut self, event: KeyEvent) -> ComboRelease {
        if self.buffer.iter().any(|buffered| buffered.key == event.key) {
            return ComboRelease::Flushed(mem::take(&mut self.buffer));
        }

        let index = match self
            .held
            .iter()
            .position(|combo| combo.down.contains(&event.key))
        {
            Some(index) => index,
            None => return ComboRelease::Pass,
        };

        let combo = &mut self.held[index];
        combo.down.retain(|key| *key != event.key);
        let step = if combo.released {
            ComboRelease::Swallowed
        } else {
            combo.released = true;
            ComboRelease::Released(KeyEvent::release(combo.key, event.time))
        };
        if combo.down.is_empty() {
            self.held.remove(index);
        }
        step
    }

    /// Will give up on the held back presses once the combo term passed
    /// after the first of them.
    pub fn on_tick(&mut self, now: Timestamp, combo_term: u32) -> Option<Vec<KeyEvent>> {
        match self.buffer.first() {
            Some(first) if timer::expired(first.time, now, combo_term) => {
                log::trace!("combo term passed at {}", now);
                Some(mem::take(&mut self.buffer))
            }
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.held.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{definitions::timing::COMBO_TERM, keycode::Keycode, keymap::Binding};

    const Q: KeyId = 0;
    const W: KeyId = 1;
    const E: KeyId = 2;
    const X: KeyId = 3;
    const TAB: KeyId = 20;
    const ESC: KeyId = 21;

    fn keymap() -> Keymap {
        let mut keymap = Keymap::new();
        keymap
            .bind_combo(TAB, &[W, Q], Binding::Plain(Keycode::TAB))
            .and_then(|keymap| keymap.bind_combo(ESC, &[Q, W, E], Binding::Plain(Keycode::ESCAPE)))
            .expect("valid combos");
        keymap
    }

    #[test]
    fn test_invalid_combos() {
        assert_eq!(Err(KeymapError::InvalidCombo(TAB)), Combo::new(TAB, &[Q]));
        assert_eq!(Err(KeymapError::InvalidCombo(TAB)), Combo::new(TAB, &[Q, Q]));
        assert_eq!(Err(KeymapError::InvalidCombo(TAB)), Combo::new(TAB, &[Q, TAB]));

        let combo = Combo::new(TAB, &[W, Q]).expect("valid combo");
        assert_eq!(&[Q, W], combo.members());
        assert_eq!(TAB, combo.key());
    }

    #[test]
    fn test_fires_when_all_members_are_down() {
        let mut keymap = Keymap::new();
        keymap
            .bind_combo(TAB, &[Q, W], Binding::Plain(Keycode::TAB))
            .expect("valid combo");
        let mut state = ComboState::new();

        assert_eq!(ComboPress::Buffered, state.on_press(&keymap, KeyEvent::press(Q, 0)));
        assert!(state.is_down(Q));
        assert_eq!(
            ComboPress::Fired(KeyEvent::press(TAB, 20)),
            state.on_press(&keymap, KeyEvent::press(W, 20))
        );
        assert!(state.is_down(Q));

        assert_eq!(
            ComboRelease::Released(KeyEvent::release(TAB, 90)),
            state.on_release(KeyEvent::release(W, 90))
        );
        assert_eq!(ComboRelease::Swallowed, state.on_release(KeyEvent::release(Q, 100)));
        assert!(!state.is_down(Q));
        assert_eq!(ComboRelease::Pass, state.on_release(KeyEvent::release(Q, 110)));
    }

    #[test]
    fn test_longer_combo_waits() {
        let keymap = keymap();
        let mut state = ComboState::new();

        // Q + W could still become Q + W + E, but Q + W is complete first
        state.on_press(&keymap, KeyEvent::press(Q, 0));
        assert_eq!(
            ComboPress::Fired(KeyEvent::press(TAB, 10)),
            state.on_press(&keymap, KeyEvent::press(W, 10))
        );

        let mut state = ComboState::new();
        state.on_press(&keymap, KeyEvent::press(E, 0));
        assert_eq!(ComboPress::Buffered, state.on_press(&keymap, KeyEvent::press(Q, 10)));
        assert_eq!(
            ComboPress::Fired(KeyEvent::press(ESC, 20)),
            state.on_press(&keymap, KeyEvent::press(W, 20))
        );
    }

    #[test]
    fn test_other_key_flushes() {
        let keymap = keymap();
        let mut state = ComboState::new();

        assert_eq!(ComboPress::Pass, state.on_press(&keymap, KeyEvent::press(X, 0)));

        state.on_press(&keymap, KeyEvent::press(Q, 10));
        assert_eq!(
            ComboPress::Flushed(vec![KeyEvent::press(Q, 10), KeyEvent::press(X, 20)]),
            state.on_press(&keymap, KeyEvent::press(X, 20))
        );
        assert!(!state.is_down(Q));
    }

    #[test]
    fn test_release_flushes() {
        let keymap = keymap();
        let mut state = ComboState::new();

        state.on_press(&keymap, KeyEvent::press(Q, 0));
        assert_eq!(
            ComboRelease::Flushed(vec![KeyEvent::press(Q, 0)]),
            state.on_release(KeyEvent::release(Q, 30))
        );
        assert!(!state.is_down(Q));
    }

    #[test]
    fn test_term_flushes() {
        let keymap = keymap();
        let mut state = ComboState::new();

        state.on_press(&keymap, KeyEvent::press(W, 100));
        assert_eq!(None, state.on_tick(100 + COMBO_TERM - 1, COMBO_TERM));
        assert_eq!(
            Some(vec![KeyEvent::press(W, 100)]),
            state.on_tick(100 + COMBO_TERM, COMBO_TERM)
        );
        assert_eq!(None, state.on_tick(100 + COMBO_TERM, COMBO_TERM));
    }
}
