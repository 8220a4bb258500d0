//! Multi-tap ("dance") keys.
//!
//! A dance key counts its presses within the tapping term and decides what to type
//! once the count is final. The count is final when the tapping term passes after
//! the last press, or when another key is pressed in between (the dance is interrupted).
//! Dance keys never take part in the typing streak.
use crate::{
    definitions::dance::TRIPLE,
    event::{tap_code, Actions, OutputAction},
    keycode::Keycode,
    timer::{self, Timestamp},
};

/// The binding of a dance key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TapDance {
    /// typed on single and double taps
    pub tap: Keycode,
    /// held when the key is tapped once and then held
    pub double_hold: Keycode,
}

impl TapDance {
    pub fn new(tap: Keycode, double_hold: Keycode) -> Self {
        Self { tap, double_hold }
    }
}

/// The final classification of a dance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DanceStep {
    SingleTap,
    SingleHold,
    DoubleTap,
    DoubleHold,
    DoubleSingleTap,
    MoreTaps,
}

impl DanceStep {
    /// Will classify the dance from the press count and the key state
    /// at the moment it finished.
    pub fn classify(count: u8, pressed: bool, interrupted: bool) -> Self {
        match count {
            1 if interrupted || !pressed => DanceStep::SingleTap,
            1 => DanceStep::SingleHold,
            2 if interrupted => DanceStep::DoubleSingleTap,
            2 if pressed => DanceStep::DoubleHold,
            2 => DanceStep::DoubleTap,
            _ => DanceStep::MoreTaps,
        }
    }
}

/// The running state of a single dance key.
#[derive(Debug, Clone)]
pub struct DanceState {
    dance: TapDance,
    count: u8,
    pressed: bool,
    interrupted: bool,
    last_press: Timestamp,
    /// set once the count is final
    step: Option<DanceStep>,
    /// the keycode that has to be unregistered on reset
    registered: Option<Keycode>,
}

impl DanceState {
    pub fn new(dance: TapDance) -> Self {
        Self {
            dance,
            count: 0,
            pressed: false,
            interrupted: false,
            last_press: 0,
            step: None,
            registered: None,
        }
    }

    pub fn count(&self) -> u8 {
        self.count
    }

    pub fn step(&self) -> Option<DanceStep> {
        self.step
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn is_finished(&self) -> bool {
        self.step.is_some()
    }

    /// Registers another press of the dance key.
    pub fn on_press(&mut self, time: Timestamp, out: &mut Actions) {
        if self.is_finished() {
            return;
        }
        self.count = self.count.saturating_add(1);
        self.pressed = true;
        self.last_press = time;

        // a long run of taps types as it goes
        if self.count == TRIPLE {
            for _ in 0..TRIPLE {
                tap_code(out, self.dance.tap);
            }
        } else if self.count > TRIPLE {
            tap_code(out, self.dance.tap);
        }
    }

    /// Returns true once the dance is over and the state can be dropped.
    pub fn on_release(&mut self, out: &mut Actions) -> bool {
        self.pressed = false;
        if self.is_finished() {
            self.reset(out);
            true
        } else {
            false
        }
    }

    /// Another key was pressed while the dance was running.
    /// Returns true once the dance is over and the state can be dropped.
    pub fn interrupt(&mut self, out: &mut Actions) -> bool {
        if !self.is_finished() {
            self.interrupted = true;
            self.finish(out);
        }
        self.settle(out)
    }

    /// Will finish the dance once the tapping term passed after the last press.
    /// Returns true once the dance is over and the state can be dropped.
    pub fn on_tick(&mut self, now: Timestamp, tapping_term: u32, out: &mut Actions) -> bool {
        if !self.is_finished() && timer::expired(self.last_press, now, tapping_term) {
            self.finish(out);
            return self.settle(out);
        }
        false
    }

    fn settle(&mut self, out: &mut Actions) -> bool {
        if self.pressed {
            false
        } else {
            self.reset(out);
            true
        }
    }

    fn finish(&mut self, out: &mut Actions) {
        let step = DanceStep::classify(self.count, self.pressed, self.interrupted);
        log::debug!("dance on {} finished as {:?}", self.dance.tap, step);
        self.step = Some(step);

        let tap = self.dance.tap;
        self.registered = match step {
            DanceStep::SingleTap => Some(tap),
            DanceStep::DoubleTap | DanceStep::DoubleSingleTap => {
                tap_code(out, tap);
                Some(tap)
            }
            DanceStep::DoubleHold => Some(self.dance.double_hold),
            DanceStep::SingleHold | DanceStep::MoreTaps => None,
        };
        if let Some(keycode) = self.registered {
            out.push(OutputAction::Emit(keycode));
        }
    }

    fn reset(&mut self, out: &mut Actions) {
        if let Some(keycode) = self.registered.take() {
            out.push(OutputAction::Release(keycode));
        }
    }
}
