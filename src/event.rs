//! The events going into the resolver and the actions coming out of it.
use tinyvec::TinyVec;

use crate::{
    definitions::actions,
    keycode::{Keycode, LayerId, ModifierSet},
    keymap::KeyId,
    timer::Timestamp,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Pressed,
    Released,
}

/// A single physical key transition as delivered by the matrix scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: KeyId,
    pub phase: Phase,
    pub time: Timestamp,
}

impl KeyEvent {
    pub fn new(key: KeyId, phase: Phase, time: Timestamp) -> Self {
        Self { key, phase, time }
    }

    pub fn press(key: KeyId, time: Timestamp) -> Self {
        Self::new(key, Phase::Pressed, time)
    }

    pub fn release(key: KeyId, time: Timestamp) -> Self {
        Self::new(key, Phase::Released, time)
    }
}

/// What the keycode dispatch layer is asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputAction {
    /// register the keycode
    Emit(Keycode),
    /// register the modifiers
    EmitModifier(ModifierSet),
    /// turn the layer on
    EmitLayerSwitch(LayerId),
    /// unregister the keycode
    Release(Keycode),
    /// unregister the modifiers
    ReleaseModifier(ModifierSet),
    /// turn the layer off
    ReleaseLayerSwitch(LayerId),
}

impl Default for OutputAction {
    /// Only fills the unused inline slots of [`Actions`].
    fn default() -> Self {
        OutputAction::Emit(Keycode::NO)
    }
}

/// The actions produced by a single resolver call, in dispatch order.
pub type Actions = TinyVec<[OutputAction; actions::INLINE]>;

/// Will push a full press and release of the keycode.
pub(crate) fn tap_code(out: &mut Actions, keycode: Keycode) {
    out.push(OutputAction::Emit(keycode));
    out.push(OutputAction::Release(keycode));
}
