//! The chord resolver, deciding for every dual-role key press if it is a tap or a hold.
//!
//! The resolver is driven from the firmware's main loop: every scanned key
//! event goes through [`Resolver::on_key_event`], the housekeeping loop calls
//! [`Resolver::on_tick`] so that a pending key times out even without any
//! further event. Both return the actions for the keycode dispatch layer.
//!
//! Physical events pass the combo detection first, what comes out of it
//! (single keys or combo keys) is resolved the same way.
//!
//! Another key pressed during a pending key decides it as a hold. Inside a
//! typing streak the press is held back instead: released before the pending
//! key it was a nested tap and the pending key is a hold, otherwise the keys
//! were rolled and the pending key is a tap.
mod chord;
mod streak;

pub use chord::{PendingChord, Resolution};
pub use streak::{DefaultStreakPolicy, StreakPolicy, StreakState};

use hashbrown::HashMap;

use chord::Held;

use crate::{
    combo::{ComboPress, ComboRelease, ComboState},
    config::ResolverConfig,
    dance::DanceState,
    event::{Actions, KeyEvent, OutputAction, Phase},
    keycode::{Keycode, ModifierSet},
    keymap::{Binding, HoldAction, KeyId, Keymap},
    timer::Timestamp,
    ConfigError,
};

/// The Resolver struct represents the full input state between two
/// scan cycles, it is owned by the main loop and passed by mutable
/// reference into each call.
pub struct Resolver<P = DefaultStreakPolicy>
where
    P: StreakPolicy,
{
    keymap: Keymap,
    config: ResolverConfig,
    policy: P,
    /// At most a single dual-role key is undecided, as any other press decides it.
    pending: Option<PendingChord>,
    /// Keys that are down and already resolved.
    held: HashMap<KeyId, Held>,
    /// Dance keys that are counting or still held after finishing.
    dances: HashMap<KeyId, DanceState>,
    combos: ComboState,
    streak: StreakState,
}

impl Resolver<DefaultStreakPolicy> {
    /// Will create a resolver with the default timing and streak policy.
    pub fn new(keymap: Keymap) -> Self {
        Self::build(keymap, ResolverConfig::default(), DefaultStreakPolicy)
    }

    pub fn with_config(keymap: Keymap, config: ResolverConfig) -> Result<Self, ConfigError> {
        Self::with_policy(keymap, config, DefaultStreakPolicy)
    }
}

impl<P> Resolver<P>
where
    P: StreakPolicy,
{
    pub fn with_policy(keymap: Keymap, config: ResolverConfig, policy: P) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(keymap, config, policy))
    }

    fn build(keymap: Keymap, config: ResolverConfig, policy: P) -> Self {
        Self {
            keymap,
            config,
            policy,
            pending: None,
            held: HashMap::new(),
            dances: HashMap::new(),
            combos: ComboState::new(),
            streak: StreakState::default(),
        }
    }

    pub fn streak(&self) -> &StreakState {
        &self.streak
    }

    pub fn pending(&self) -> Option<&PendingChord> {
        self.pending.as_ref()
    }

    pub fn is_pending(&self, key: KeyId) -> bool {
        matches!(self.pending, Some(chord) if chord.key == key)
    }

    /// The modifiers currently held down by resolved holds.
    pub fn active_modifiers(&self) -> ModifierSet {
        self.held
            .values()
            .fold(ModifierSet::NONE, |mods, held| match held {
                Held::Modifier(held) => mods | *held,
                _ => mods,
            })
    }

    /// Will handle a single physical key event, events have to be given in
    /// the order they were scanned.
    pub fn on_key_event(&mut self, event: KeyEvent) -> Actions {
        let mut out = Actions::default();
        match event.phase {
            Phase::Pressed => self.combo_press(event, &mut out),
            Phase::Released => self.combo_release(event, &mut out),
        }
        out
    }

    /// Will run the time based part of the resolution, called from the
    /// housekeeping loop.
    pub fn on_tick(&mut self, now: Timestamp) -> Actions {
        let mut out = Actions::default();

        if let Some(events) = self.combos.on_tick(now, self.config.combo_term) {
            for event in events {
                self.press(event, &mut out);
            }
        }

        let tapping_term = self.config.tapping_term;
        if let Some(chord) = self.pending {
            if chord.timed_out(now, tapping_term) {
                self.pending = None;
                // a held back press means the keys were rolled
                let resolution = match chord.interrupted_by {
                    Some(_) => Resolution::Tap,
                    None => Resolution::Hold,
                };
                self.settle_and_replay(chord, resolution, now, &mut out);
            }
        }

        self.dances
            .retain(|_, dance| !dance.on_tick(now, tapping_term, &mut out));

        self.streak
            .expire(now, self.config.longest_streak_timeout());
        out
    }

    /// Will bring the resolver back into its power-on state, everything
    /// still registered is released.
    pub fn reset(&mut self) -> Actions {
        let mut out = Actions::default();
        self.pending = None;
        self.combos.reset();
        for (_, dance) in self.dances.iter_mut() {
            dance.on_release(&mut out);
        }
        self.dances.clear();
        for (_, held) in self.held.drain() {
            out.push(held.release_action());
        }
        self.streak = StreakState::default();
        out
    }

    fn is_down(&self, key: KeyId) -> bool {
        self.is_pending(key)
            || self.is_held_back(key)
            || self.held.contains_key(&key)
            || self.dances.get(&key).map_or(false, DanceState::is_pressed)
            || self.combos.is_down(key)
    }

    /// Checks if the press of the key waits on the pending key.
    fn is_held_back(&self, key: KeyId) -> bool {
        matches!(
            self.pending.and_then(|chord| chord.interrupted_by),
            Some(event) if event.key == key
        )
    }

    fn combo_press(&mut self, event: KeyEvent, out: &mut Actions) {
        if self.is_down(event.key) {
            log::trace!("key {} is already down, ignoring the press", event.key);
            return;
        }

        match self.combos.on_press(&self.keymap, event) {
            ComboPress::Pass => self.press(event, out),
            ComboPress::Buffered => log::trace!("key {} waits for a combo", event.key),
            ComboPress::Fired(combo) => self.press(combo, out),
            ComboPress::Flushed(events) => {
                for event in events {
                    self.press(event, out);
                }
            }
        }
    }

    fn combo_release(&mut self, event: KeyEvent, out: &mut Actions) {
        match self.combos.on_release(event) {
            ComboRelease::Pass => self.release(event, out),
            ComboRelease::Swallowed => log::trace!("key {} was part of a combo", event.key),
            ComboRelease::Released(combo) => self.release(combo, out),
            ComboRelease::Flushed(events) => {
                for pressed in events {
                    self.press(pressed, out);
                }
                self.release(event, out);
            }
        }
    }

    fn press(&mut self, event: KeyEvent, out: &mut Actions) {
        self.interrupt_dances(event.key, out);

        if let Some(mut chord) = self.pending.take() {
            if chord.interrupted_by.is_some() {
                // a second key rolls over the pending one
                self.settle_and_replay(chord, Resolution::Tap, event.time, out);
                return self.press(event, out);
            }

            chord.interrupt(event);
            if self.in_streak(&chord, event.time) {
                log::trace!("key {} waits on the pending key {}", event.key, chord.key);
                self.pending = Some(chord);
                return;
            }
            self.settle(chord, Resolution::Hold, event.time, out);
        }

        match self.keymap.get(event.key) {
            Some(binding) => {
                let binding = *binding;
                self.begin(event, binding, out);
            }
            None => log::warn!("key {} is not bound, ignoring", event.key),
        }
    }

    fn release(&mut self, event: KeyEvent, out: &mut Actions) {
        let key = event.key;

        if let Some(chord) = self.pending {
            if chord.key == key {
                self.pending = None;
                let resolution = if chord.interrupted_by.is_some() {
                    Resolution::Tap
                } else if chord.timed_out(event.time, self.config.tapping_term) {
                    Resolution::Hold
                } else {
                    Resolution::Tap
                };
                self.settle_and_replay(chord, resolution, event.time, out);
            } else if self.is_held_back(key) {
                // tapped while the pending key was held
                self.pending = None;
                self.settle_and_replay(chord, Resolution::Hold, event.time, out);
                return self.release(event, out);
            }
        }

        if let Some(dance) = self.dances.get_mut(&key) {
            if dance.on_release(out) {
                self.dances.remove(&key);
            }
            return;
        }

        match self.held.remove(&key) {
            Some(held) => out.push(held.release_action()),
            None => log::trace!("release of key {} without a press, ignoring", key),
        }
    }

    /// Will start handling a press that no pending key is waiting on.
    fn begin(&mut self, event: KeyEvent, binding: Binding, out: &mut Actions) {
        match binding {
            Binding::Plain(keycode) => {
                out.push(OutputAction::Emit(keycode));
                self.held.insert(event.key, Held::Key(keycode));
                self.record_tap(keycode, event.time);
            }
            Binding::DualRole(dual) => {
                log::trace!("key {} pending at {}", event.key, event.time);
                self.pending = Some(PendingChord::new(event.key, dual, event.time));
            }
            Binding::Dance(dance) => {
                self.dances
                    .entry(event.key)
                    .or_insert_with(|| DanceState::new(dance))
                    .on_press(event.time, out);
            }
        }
    }

    /// Checks if the pending key rolls inside a typing streak, a key held
    /// past the tapping term is never part of one.
    fn in_streak(&mut self, chord: &PendingChord, now: Timestamp) -> bool {
        if chord.timed_out(now, self.config.tapping_term) {
            return false;
        }

        let timeout = self.policy.chord_timeout(&chord.binding, &self.config);
        self.streak.applies(chord.press_time, timeout)
    }

    /// Will settle the pending key, then replay the press held back on it.
    /// The replayed press takes effect at `now`.
    fn settle_and_replay(&mut self, chord: PendingChord, resolution: Resolution, now: Timestamp, out: &mut Actions) {
        self.settle(chord, resolution, now, out);

        if let Some(held_back) = chord.interrupted_by {
            let event = KeyEvent { time: now, ..held_back };
            match self.keymap.get(event.key) {
                Some(binding) => {
                    let binding = *binding;
                    self.begin(event, binding, out);
                }
                None => log::trace!("held back key {} is not bound", event.key),
            }
        }
    }

    /// Will emit the resolution of the pending key, the key stays registered
    /// until its release.
    fn settle(&mut self, mut chord: PendingChord, resolution: Resolution, now: Timestamp, out: &mut Actions) {
        debug_assert!(chord.resolution.is_none(), "a chord resolves only once");
        chord.resolution = Some(resolution);
        log::debug!(
            "key {} resolved as {:?} after {}ms",
            chord.key,
            resolution,
            chord.elapsed(now)
        );

        match resolution {
            Resolution::Tap => {
                let tap = chord.binding.tap;
                out.push(OutputAction::Emit(tap));
                self.held.insert(chord.key, Held::Key(tap));
                self.record_tap(tap, now);
            }
            Resolution::Hold => {
                let held = match chord.binding.hold {
                    HoldAction::Modifier(mods) => {
                        out.push(OutputAction::EmitModifier(mods));
                        Held::Modifier(mods)
                    }
                    HoldAction::Layer(layer) => {
                        out.push(OutputAction::EmitLayerSwitch(layer));
                        Held::Layer(layer)
                    }
                };
                self.held.insert(chord.key, held);
                // a chord is not typing
                self.streak.reset();
            }
        }
    }

    fn record_tap(&mut self, keycode: Keycode, now: Timestamp) {
        let continues = self.policy.continues_streak(keycode, self.active_modifiers());
        self.streak.record(now, continues);
    }

    /// Any press finishes the dances running on other keys.
    fn interrupt_dances(&mut self, key: KeyId, out: &mut Actions) {
        self.dances
            .retain(|dance_key, dance| *dance_key == key || !dance.interrupt(out));
    }
}
