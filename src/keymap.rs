//! The keymap table, binding every physical key position to what it does.
use std::{convert::TryFrom, fmt, str::FromStr};

use hashbrown::HashMap;

use crate::{
    combo::Combo,
    dance::TapDance,
    keycode::{Keycode, LayerId, ModifierSet},
    KeymapError, ParseError,
};

/// A wrapper type for u16 to make it clear that a physical key position is meant
pub type KeyId = u16;

/// What a dual-role key does while it is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HoldAction {
    Modifier(ModifierSet),
    Layer(LayerId),
}

/// A key that taps a keycode, or does its hold action when held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DualRoleKey {
    pub tap: Keycode,
    pub hold: HoldAction,
}

impl DualRoleKey {
    pub fn mod_tap(mods: ModifierSet, tap: Keycode) -> Self {
        Self {
            tap,
            hold: HoldAction::Modifier(mods),
        }
    }

    pub fn layer_tap(layer: LayerId, tap: Keycode) -> Self {
        Self {
            tap,
            hold: HoldAction::Layer(layer),
        }
    }

    pub fn is_layer_tap(&self) -> bool {
        matches!(self.hold, HoldAction::Layer(_))
    }

    /// Checks if holding the key holds shift (alone or with other modifiers).
    pub fn is_shift_mod_tap(&self) -> bool {
        matches!(self.hold, HoldAction::Modifier(mods) if mods.contains_shift())
    }
}

/// Everything a key position can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    Plain(Keycode),
    DualRole(DualRoleKey),
    Dance(TapDance),
}

/// Single modifier mod-tap shorthands, e.g. `LSFT_T(KC_F)`
const MOD_TAP_SHORTHANDS: [(&str, ModifierSet); 9] = [
    ("LCTL_T", ModifierSet::LCTL),
    ("LSFT_T", ModifierSet::LSFT),
    ("LALT_T", ModifierSet::LALT),
    ("LGUI_T", ModifierSet::LGUI),
    ("RCTL_T", ModifierSet::RCTL),
    ("RSFT_T", ModifierSet::RSFT),
    ("RALT_T", ModifierSet::RALT),
    ("RGUI_T", ModifierSet::RGUI),
    ("ALL_T", ModifierSet::HYPER),
];

/// Splits `NAME(a, b)` into the name and the trimmed arguments.
fn split_call(expr: &str) -> Option<(&str, Vec<&str>)> {
    let open = expr.find('(')?;
    let inner = expr[open + 1..].strip_suffix(')')?;
    let args = inner.split(',').map(str::trim).collect();
    Some((expr[..open].trim(), args))
}

impl FromStr for Binding {
    type Err = ParseError;

    /// Parses a binding the way the firmware's keymap table writes it.
    ///
    /// # Example
    /// ```rust
    /// # use chord::keymap::*;
    /// # use chord::keycode::*;
    /// let binding: Binding = "MT(MOD_LCTL, KC_A)".parse().expect("a valid mod-tap");
    /// assert_eq!(
    ///     Binding::DualRole(DualRoleKey::mod_tap(ModifierSet::LCTL, Keycode::A)),
    ///     binding
    /// );
    /// let binding: Binding = "LT(1,KC_ESCAPE)".parse().expect("a valid layer-tap");
    /// assert_eq!(
    ///     Binding::DualRole(DualRoleKey::layer_tap(LayerId(1), Keycode::ESCAPE)),
    ///     binding
    /// );
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let expr = s.trim();
        let malformed = || ParseError::Malformed(expr.to_string());

        let (name, args) = match split_call(expr) {
            Some(call) => call,
            None if expr.contains('(') || expr.contains(')') => return Err(malformed()),
            None => return Ok(Binding::Plain(expr.parse()?)),
        };

        let key = match (name, args.as_slice()) {
            ("MT", [mods, tap]) => DualRoleKey::mod_tap(mods.parse()?, tap.parse()?),
            ("LT", [layer, tap]) => {
                let layer = layer
                    .parse::<u8>()
                    .map_err(|_| ParseError::InvalidLayer(layer.to_string()))?;
                DualRoleKey::layer_tap(LayerId(layer), tap.parse()?)
            }
            (name, [tap]) => {
                let mods = MOD_TAP_SHORTHANDS
                    .iter()
                    .find(|(known, _)| *known == name)
                    .map(|(_, mods)| *mods)
                    .ok_or_else(malformed)?;
                DualRoleKey::mod_tap(mods, tap.parse()?)
            }
            _ => return Err(malformed()),
        };
        Ok(Binding::DualRole(key))
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Plain(keycode) => write!(f, "{}", keycode),
            Binding::DualRole(DualRoleKey {
                tap,
                hold: HoldAction::Modifier(mods),
            }) => write!(f, "MT({}, {})", mods, tap),
            Binding::DualRole(DualRoleKey {
                tap,
                hold: HoldAction::Layer(layer),
            }) => write!(f, "LT({}, {})", layer, tap),
            Binding::Dance(dance) => write!(f, "TD({}, {})", dance.tap, dance.double_hold),
        }
    }
}

/// Represents the keymap table, each key position has at most one binding.
/// A combo binds a key position that is pressed by its member keys.
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: HashMap<KeyId, Binding>,
    combos: Vec<Combo>,
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Will bind the key position, a position can only be bound once.
    pub fn bind(&mut self, key: KeyId, binding: Binding) -> Result<&mut Self, KeymapError> {
        if let Binding::DualRole(dual) = binding {
            if dual.tap == Keycode::NO {
                return Err(KeymapError::MissingTap(key));
            }
        }
        if self.bindings.contains_key(&key) {
            return Err(KeymapError::DuplicateKey(key));
        }
        self.bindings.insert(key, binding);
        Ok(self)
    }

    /// Will parse the binding expression and bind the key position to it.
    pub fn bind_str(&mut self, key: KeyId, expr: &str) -> Result<&mut Self, KeymapError> {
        let binding = expr
            .parse()
            .map_err(|source| KeymapError::Binding { key, source })?;
        self.bind(key, binding)
    }

    pub fn get(&self, key: KeyId) -> Option<&Binding> {
        self.bindings.get(&key)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Will bind the key position `key` as a combo of the member keys.
    /// The members keep their own bindings for presses that form no combo.
    ///
    /// # Example
    /// ```rust
    /// # use chord::keymap::*;
    /// # use chord::keycode::Keycode;
    /// let mut keymap = Keymap::new();
    /// keymap
    ///     .bind_str(0, "KC_Q")
    ///     .and_then(|keymap| keymap.bind_str(1, "KC_W"))
    ///     .and_then(|keymap| keymap.bind_combo(100, &[0, 1], Binding::Plain(Keycode::TAB)))
    ///     .expect("a valid keymap");
    /// assert!(keymap.is_combo_member(1));
    /// assert_eq!(Some(&Binding::Plain(Keycode::TAB)), keymap.get(100));
    /// ```
    pub fn bind_combo(&mut self, key: KeyId, members: &[KeyId], binding: Binding) -> Result<&mut Self, KeymapError> {
        let combo = Combo::new(key, members)?;
        // the same members can only press one combo key
        if self.combos.iter().any(|known| known.members() == combo.members()) {
            return Err(KeymapError::InvalidCombo(key));
        }
        self.bind(key, binding)?;
        self.combos.push(combo);
        Ok(self)
    }

    pub fn combos(&self) -> &[Combo] {
        &self.combos
    }

    pub fn is_combo_member(&self, key: KeyId) -> bool {
        self.combos.iter().any(|combo| combo.contains(key))
    }
}

impl<'a> TryFrom<&[(KeyId, &'a str)]> for Keymap {
    type Error = KeymapError;

    /// Will build a keymap from `(position, expression)` rows.
    fn try_from(rows: &[(KeyId, &'a str)]) -> Result<Self, Self::Error> {
        let mut keymap = Keymap::new();
        for (key, expr) in rows {
            keymap.bind_str(*key, expr)?;
        }
        Ok(keymap)
    }
}
