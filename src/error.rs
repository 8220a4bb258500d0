use thiserror::Error;

use crate::keymap::KeyId;

#[derive(Error, Debug, PartialEq, Clone)]
pub enum ParseError {
    #[error("Unknown keycode '{0}'.")]
    UnknownKeycode(String),
    #[error("Unknown modifier '{0}'.")]
    UnknownModifier(String),
    #[error("Invalid layer '{0}'.")]
    InvalidLayer(String),
    #[error("Malformed binding expression '{0}'.")]
    Malformed(String),
}

#[derive(Error, Debug, PartialEq, Clone)]
pub enum KeymapError {
    #[error("Key {0} is already bound.")]
    DuplicateKey(KeyId),
    #[error("Invalid binding for key {key}: {source}")]
    Binding {
        key: KeyId,
        #[source]
        source: ParseError,
    },
    #[error("A dual-role key needs a tap keycode, key {0} has none.")]
    MissingTap(KeyId),
    #[error("The combo for key {0} needs at least two distinct member keys other then itself, not used by another combo.")]
    InvalidCombo(KeyId),
}

#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum ConfigError {
    #[error("The tapping term has to be bigger then 0.")]
    ZeroTappingTerm,
    #[error("The streak timeout has to be bigger then 0.")]
    ZeroStreakTimeout,
    #[error("The combo term has to be bigger then 0.")]
    ZeroComboTerm,
    #[error("The extended streak timeout {extended}ms is shorter then the base timeout {base}ms.")]
    ExtendedBelowBase { base: u32, extended: u32 },
    #[error("The streak timeout {0}ms is above the allowed maximum of {}ms.", crate::definitions::timing::STREAK_TIMEOUT_MAX)]
    StreakTooLong(u32),
}
