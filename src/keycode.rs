//! Keycode, modifier and layer identities as the firmware's dispatch layer knows them.
//!
//! Keycodes use the HID usage values, shifted symbols carry the [`Keycode::SHIFTED`]
//! flag on top of the unshifted key they are typed with.
use std::{
    fmt,
    ops::BitOr,
    str::FromStr,
};

use crate::ParseError;

/// The prefix every keycode name carries
const KEYCODE_PREFIX: &str = "KC_";
/// The prefix every modifier name carries
const MODIFIER_PREFIX: &str = "MOD_";

/// A single keycode as sent to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Keycode(u16);

impl Keycode {
    /// The flag marking a keycode that is typed together with shift.
    pub const SHIFTED: u16 = 0x0200;

    pub const NO: Keycode = Keycode(0x00);

    pub const A: Keycode = Keycode(0x04);
    pub const B: Keycode = Keycode(0x05);
    pub const C: Keycode = Keycode(0x06);
    pub const D: Keycode = Keycode(0x07);
    pub const E: Keycode = Keycode(0x08);
    pub const F: Keycode = Keycode(0x09);
    pub const G: Keycode = Keycode(0x0A);
    pub const H: Keycode = Keycode(0x0B);
    pub const I: Keycode = Keycode(0x0C);
    pub const J: Keycode = Keycode(0x0D);
    pub const K: Keycode = Keycode(0x0E);
    pub const L: Keycode = Keycode(0x0F);
    pub const M: Keycode = Keycode(0x10);
    pub const N: Keycode = Keycode(0x11);
    pub const O: Keycode = Keycode(0x12);
    pub const P: Keycode = Keycode(0x13);
    pub const Q: Keycode = Keycode(0x14);
    pub const R: Keycode = Keycode(0x15);
    pub const S: Keycode = Keycode(0x16);
    pub const T: Keycode = Keycode(0x17);
    pub const U: Keycode = Keycode(0x18);
    pub const V: Keycode = Keycode(0x19);
    pub const W: Keycode = Keycode(0x1A);
    pub const X: Keycode = Keycode(0x1B);
    pub const Y: Keycode = Keycode(0x1C);
    pub const Z: Keycode = Keycode(0x1D);

    pub const N1: Keycode = Keycode(0x1E);
    pub const N2: Keycode = Keycode(0x1F);
    pub const N3: Keycode = Keycode(0x20);
    pub const N4: Keycode = Keycode(0x21);
    pub const N5: Keycode = Keycode(0x22);
    pub const N6: Keycode = Keycode(0x23);
    pub const N7: Keycode = Keycode(0x24);
    pub const N8: Keycode = Keycode(0x25);
    pub const N9: Keycode = Keycode(0x26);
    pub const N0: Keycode = Keycode(0x27);

    pub const ENTER: Keycode = Keycode(0x28);
    pub const ESCAPE: Keycode = Keycode(0x29);
    pub const BSPC: Keycode = Keycode(0x2A);
    pub const TAB: Keycode = Keycode(0x2B);
    pub const SPACE: Keycode = Keycode(0x2C);
    pub const MINUS: Keycode = Keycode(0x2D);
    pub const EQUAL: Keycode = Keycode(0x2E);
    pub const LBRC: Keycode = Keycode(0x2F);
    pub const RBRC: Keycode = Keycode(0x30);
    pub const BSLS: Keycode = Keycode(0x31);
    pub const SCLN: Keycode = Keycode(0x33);
    pub const QUOTE: Keycode = Keycode(0x34);
    pub const GRAVE: Keycode = Keycode(0x35);
    pub const COMMA: Keycode = Keycode(0x36);
    pub const DOT: Keycode = Keycode(0x37);
    pub const SLASH: Keycode = Keycode(0x38);

    pub const RIGHT: Keycode = Keycode(0x4F);
    pub const LEFT: Keycode = Keycode(0x50);
    pub const DOWN: Keycode = Keycode(0x51);
    pub const UP: Keycode = Keycode(0x52);

    pub const EXLM: Keycode = Keycode::N1.shifted();
    pub const AT: Keycode = Keycode::N2.shifted();
    pub const HASH: Keycode = Keycode::N3.shifted();
    pub const DLR: Keycode = Keycode::N4.shifted();
    pub const PERC: Keycode = Keycode::N5.shifted();
    pub const CIRC: Keycode = Keycode::N6.shifted();
    pub const AMPR: Keycode = Keycode::N7.shifted();
    pub const ASTR: Keycode = Keycode::N8.shifted();
    pub const LPRN: Keycode = Keycode::N9.shifted();
    pub const RPRN: Keycode = Keycode::N0.shifted();
    pub const UNDS: Keycode = Keycode::MINUS.shifted();
    pub const PLUS: Keycode = Keycode::EQUAL.shifted();
    pub const LCBR: Keycode = Keycode::LBRC.shifted();
    pub const RCBR: Keycode = Keycode::RBRC.shifted();
    pub const PIPE: Keycode = Keycode::BSLS.shifted();
    pub const COLN: Keycode = Keycode::SCLN.shifted();
    pub const DQUO: Keycode = Keycode::QUOTE.shifted();
    pub const TILD: Keycode = Keycode::GRAVE.shifted();
    pub const QUES: Keycode = Keycode::SLASH.shifted();

    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Will return the keycode typed together with shift.
    pub const fn shifted(self) -> Self {
        Self(self.0 | Self::SHIFTED)
    }

    /// Checks if the keycode is one of the plain letters `A-Z`.
    pub fn is_letter(self) -> bool {
        (Self::A.0..=Self::Z.0).contains(&self.0)
    }

    fn is_digit(self) -> bool {
        (Self::N1.0..=Self::N0.0).contains(&self.0)
    }
}

/// The names of all the keycodes that are neither a letter nor a digit.
/// The first name of a keycode is the one used for printing.
const NAMES: &[(&str, Keycode)] = &[
    ("NO", Keycode::NO),
    ("ENTER", Keycode::ENTER),
    ("ENT", Keycode::ENTER),
    ("ESCAPE", Keycode::ESCAPE),
    ("ESC", Keycode::ESCAPE),
    ("BSPC", Keycode::BSPC),
    ("TAB", Keycode::TAB),
    ("SPACE", Keycode::SPACE),
    ("SPC", Keycode::SPACE),
    ("MINUS", Keycode::MINUS),
    ("EQUAL", Keycode::EQUAL),
    ("LBRC", Keycode::LBRC),
    ("RBRC", Keycode::RBRC),
    ("BSLS", Keycode::BSLS),
    ("SCLN", Keycode::SCLN),
    ("QUOTE", Keycode::QUOTE),
    ("QUOT", Keycode::QUOTE),
    ("GRAVE", Keycode::GRAVE),
    ("GRV", Keycode::GRAVE),
    ("COMMA", Keycode::COMMA),
    ("COMM", Keycode::COMMA),
    ("DOT", Keycode::DOT),
    ("SLASH", Keycode::SLASH),
    ("SLSH", Keycode::SLASH),
    ("RIGHT", Keycode::RIGHT),
    ("LEFT", Keycode::LEFT),
    ("DOWN", Keycode::DOWN),
    ("UP", Keycode::UP),
    ("EXLM", Keycode::EXLM),
    ("AT", Keycode::AT),
    ("HASH", Keycode::HASH),
    ("DLR", Keycode::DLR),
    ("PERC", Keycode::PERC),
    ("CIRC", Keycode::CIRC),
    ("AMPR", Keycode::AMPR),
    ("ASTR", Keycode::ASTR),
    ("LPRN", Keycode::LPRN),
    ("RPRN", Keycode::RPRN),
    ("UNDS", Keycode::UNDS),
    ("PLUS", Keycode::PLUS),
    ("LCBR", Keycode::LCBR),
    ("RCBR", Keycode::RCBR),
    ("PIPE", Keycode::PIPE),
    ("COLN", Keycode::COLN),
    ("DQUO", Keycode::DQUO),
    ("TILD", Keycode::TILD),
    ("QUES", Keycode::QUES),
];

impl fmt::Display for Keycode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_letter() {
            let letter = (b'A' + (self.0 - Self::A.0) as u8) as char;
            return write!(f, "{}{}", KEYCODE_PREFIX, letter);
        }
        if self.is_digit() {
            // the digit row starts at 1 and ends with 0
            let digit = (self.0 - Self::N1.0 + 1) % 10;
            return write!(f, "{}{}", KEYCODE_PREFIX, digit);
        }
        match NAMES.iter().find(|(_, code)| code == self) {
            Some((name, _)) => write!(f, "{}{}", KEYCODE_PREFIX, name),
            None => write!(f, "{:#06X}", self.0),
        }
    }
}

impl FromStr for Keycode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || ParseError::UnknownKeycode(s.to_string());
        let name = s.trim().strip_prefix(KEYCODE_PREFIX).ok_or_else(unknown)?;

        let bytes = name.as_bytes();
        if let &[single] = bytes {
            return match single {
                b'A'..=b'Z' => Ok(Self(Self::A.0 + (single - b'A') as u16)),
                b'0' => Ok(Self::N0),
                b'1'..=b'9' => Ok(Self(Self::N1.0 + (single - b'1') as u16)),
                _ => Err(unknown()),
            };
        }

        NAMES
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, code)| *code)
            .ok_or_else(unknown)
    }
}

/// A set of modifiers, stored with the same bit layout as the
/// HID modifier byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModifierSet(u8);

impl ModifierSet {
    pub const NONE: ModifierSet = ModifierSet(0x00);
    pub const LCTL: ModifierSet = ModifierSet(0x01);
    pub const LSFT: ModifierSet = ModifierSet(0x02);
    pub const LALT: ModifierSet = ModifierSet(0x04);
    pub const LGUI: ModifierSet = ModifierSet(0x08);
    pub const RCTL: ModifierSet = ModifierSet(0x10);
    pub const RSFT: ModifierSet = ModifierSet(0x20);
    pub const RALT: ModifierSet = ModifierSet(0x40);
    pub const RGUI: ModifierSet = ModifierSet(0x80);

    /// Ctrl, Shift, Alt and Gui held at once.
    pub const HYPER: ModifierSet = ModifierSet(0x0F);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn contains_shift(self) -> bool {
        self.intersects(Self(Self::LSFT.0 | Self::RSFT.0))
    }
}

const MODIFIER_NAMES: [(&str, ModifierSet); 8] = [
    ("LCTL", ModifierSet::LCTL),
    ("LSFT", ModifierSet::LSFT),
    ("LALT", ModifierSet::LALT),
    ("LGUI", ModifierSet::LGUI),
    ("RCTL", ModifierSet::RCTL),
    ("RSFT", ModifierSet::RSFT),
    ("RALT", ModifierSet::RALT),
    ("RGUI", ModifierSet::RGUI),
];

impl BitOr for ModifierSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Display for ModifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "{}NONE", MODIFIER_PREFIX);
        }
        let mut first = true;
        for (name, modifier) in MODIFIER_NAMES.iter() {
            if self.intersects(*modifier) {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{}{}", MODIFIER_PREFIX, name)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl FromStr for ModifierSet {
    type Err = ParseError;

    /// Parses modifier names joined by `|`, e.g. `MOD_LCTL|MOD_LSFT`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split('|').try_fold(Self::NONE, |set, part| {
            let part = part.trim();
            let name = part
                .strip_prefix(MODIFIER_PREFIX)
                .ok_or_else(|| ParseError::UnknownModifier(part.to_string()))?;
            MODIFIER_NAMES
                .iter()
                .find(|(known, _)| *known == name)
                .map(|(_, modifier)| set | *modifier)
                .ok_or_else(|| ParseError::UnknownModifier(part.to_string()))
        })
    }
}

/// The index of a firmware layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LayerId(pub u8);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
