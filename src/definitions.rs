/// The definitions

/// The timing definitions, all values are in milliseconds
pub mod timing {
    /// The time within which a solo press and release of a dual-role key
    /// is a tap, past it the key is a hold.
    pub const TAPPING_TERM: u32 = 200;

    /// The streak window used for shift mod-tap keys.
    pub const STREAK_TIMEOUT: u32 = 100;

    /// The streak window used for every mod-tap key that does not carry shift.
    pub const STREAK_TIMEOUT_EXTENDED: u32 = 240;

    /// The time within which all members of a combo have to be pressed.
    pub const COMBO_TERM: u32 = 50;

    /// Streak windows above this are rejected by the configuration, as the
    /// resolver would keep guessing taps for keys that were meant as chords.
    pub const STREAK_TIMEOUT_MAX: u32 = 800;
}

/// The definitions needed by the resolver output
pub mod actions {
    /// The amount of actions a single call can produce without
    /// spilling onto the heap.
    /// (resolution + replayed event + release, and a tap dance burst)
    pub const INLINE: usize = 4;
}

/// The definitions for the tap dance keys
pub mod dance {
    /// The press count at which a dance key types its keycode three times.
    pub const TRIPLE: u8 = 3;
}

/// The definitions for the streak policy
pub mod streak {
    use crate::keycode::Keycode;

    /// Keycodes, besides letters, that keep a typing streak alive.
    pub const PUNCTUATION: [Keycode; 8] = [
        Keycode::DOT,
        Keycode::COMMA,
        Keycode::QUOTE,
        Keycode::SPACE,
        Keycode::EXLM,
        Keycode::QUES,
        Keycode::AT,
        Keycode::DLR,
    ];
}
