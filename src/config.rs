//! The tunable timing of the resolver.
use crate::{definitions::timing, ConfigError};

/// The timing configuration of a resolver, all durations are in milliseconds.
///
/// The defaults are the firmware constants in [`definitions::timing`](crate::definitions::timing).
///
/// # Example
/// ```rust
/// # use chord::config::ResolverConfig;
/// let config = ResolverConfig::default().with_tapping_term(180);
/// assert_eq!(config.tapping_term, 180);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// A solo press released within this is a tap, a key held this long is a hold.
    pub tapping_term: u32,
    /// The streak window of shift mod-tap keys.
    pub streak_timeout: u32,
    /// The streak window of every other mod-tap key.
    pub streak_timeout_extended: u32,
    /// All members of a combo have to be down within this.
    pub combo_term: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            tapping_term: timing::TAPPING_TERM,
            streak_timeout: timing::STREAK_TIMEOUT,
            streak_timeout_extended: timing::STREAK_TIMEOUT_EXTENDED,
            combo_term: timing::COMBO_TERM,
        }
    }
}

impl ResolverConfig {
    pub fn with_tapping_term(mut self, tapping_term: u32) -> Self {
        self.tapping_term = tapping_term;
        self
    }

    pub fn with_streak_timeout(mut self, streak_timeout: u32) -> Self {
        self.streak_timeout = streak_timeout;
        self
    }

    pub fn with_streak_timeout_extended(mut self, streak_timeout_extended: u32) -> Self {
        self.streak_timeout_extended = streak_timeout_extended;
        self
    }

    pub fn with_combo_term(mut self, combo_term: u32) -> Self {
        self.combo_term = combo_term;
        self
    }

    /// The longest window any key can keep a streak alive for.
    pub fn longest_streak_timeout(&self) -> u32 {
        self.streak_timeout.max(self.streak_timeout_extended)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tapping_term == 0 {
            return Err(ConfigError::ZeroTappingTerm);
        }
        if self.streak_timeout == 0 {
            return Err(ConfigError::ZeroStreakTimeout);
        }
        if self.combo_term == 0 {
            return Err(ConfigError::ZeroComboTerm);
        }
        if self.streak_timeout_extended < self.streak_timeout {
            return Err(ConfigError::ExtendedBelowBase {
                base: self.streak_timeout,
                extended: self.streak_timeout_extended,
            });
        }
        if self.streak_timeout_extended > timing::STREAK_TIMEOUT_MAX {
            return Err(ConfigError::StreakTooLong(self.streak_timeout_extended));
        }
        Ok(())
    }
}
