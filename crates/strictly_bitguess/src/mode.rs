//! Game modes: the number range a player picks from.

use derive_getters::Getters;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Widest range a mode may cover: every `u32` fits in 32 bits.
pub const MAX_SUPPORTED_BITS: u32 = u32::BITS;

/// Largest `max_num` a mode may use.
///
/// Ten questions; each card lists 512 numbers, which still scrolls in a
/// terminal and prints in a few pages.
pub const MAX_PLAYABLE_NUM: u32 = 1023;

/// Returns the minimum number of bits that represents every integer in `[1, max_num]`.
///
/// Equivalent to `ceil(log2(max_num + 1))`.
pub fn bits_for(max_num: u32) -> u32 {
    u32::BITS - max_num.leading_zeros()
}

/// A selectable number range.
///
/// `max_bits` is always the minimum bit count covering `max_num`:
/// `2^max_bits > max_num >= 2^(max_bits - 1)`. Deserialized modes go
/// through the same validation as [`GameMode::with_bits`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters, Serialize, Deserialize)]
#[serde(try_from = "RawGameMode")]
pub struct GameMode {
    /// Label shown to the player (e.g. "1 to 50").
    label: String,
    /// Largest number the player may pick.
    max_num: u32,
    /// Number of questions asked per round.
    max_bits: u32,
}

impl GameMode {
    /// Creates a mode, deriving the question count from `max_num`.
    #[instrument(skip(label), fields(label = %label.as_ref()))]
    pub fn new(label: impl AsRef<str>, max_num: u32) -> Result<Self, ModeError> {
        if max_num == 0 {
            return Err(ModeError::ZeroRange);
        }
        if max_num > MAX_PLAYABLE_NUM {
            return Err(ModeError::RangeTooLarge(max_num));
        }
        Ok(Self {
            label: label.as_ref().to_string(),
            max_num,
            max_bits: bits_for(max_num),
        })
    }

    /// Creates a mode with an explicit question count, rejecting counts that
    /// are not exactly the minimum for `max_num`.
    #[instrument(skip(label), fields(label = %label.as_ref()))]
    pub fn with_bits(label: impl AsRef<str>, max_num: u32, max_bits: u32) -> Result<Self, ModeError> {
        if max_bits > MAX_SUPPORTED_BITS {
            return Err(ModeError::TooManyBits(max_bits));
        }
        let mode = Self::new(label, max_num)?;
        let required = mode.max_bits;
        if max_bits < required {
            return Err(ModeError::InsufficientBits {
                max_num,
                max_bits,
                required,
            });
        }
        if max_bits > required {
            return Err(ModeError::ExcessBits {
                max_num,
                max_bits,
                required,
            });
        }
        Ok(mode)
    }

    /// Returns true if `n` is a number the player may pick in this mode.
    pub fn contains(&self, n: u32) -> bool {
        (1..=self.max_num).contains(&n)
    }

    /// Returns true if both modes produce the same cards.
    ///
    /// Labels are ignored: two modes covering the same range share a deck.
    pub fn same_range(&self, other: &GameMode) -> bool {
        self.max_num == other.max_num && self.max_bits == other.max_bits
    }
}

/// Unvalidated serialized form of a [`GameMode`].
#[derive(Deserialize)]
struct RawGameMode {
    label: String,
    max_num: u32,
    #[serde(default)]
    max_bits: Option<u32>,
}

impl TryFrom<RawGameMode> for GameMode {
    type Error = ModeError;

    fn try_from(raw: RawGameMode) -> Result<Self, Self::Error> {
        match raw.max_bits {
            Some(bits) => GameMode::with_bits(raw.label, raw.max_num, bits),
            None => GameMode::new(raw.label, raw.max_num),
        }
    }
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} questions)", self.label, self.max_bits)
    }
}

/// The built-in ranges offered on the start screen.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter, strum::Display,
)]
pub enum Preset {
    /// 1 to 50, six questions.
    #[strum(to_string = "1 to 50")]
    Fifty,
    /// 1 to 100, seven questions.
    #[strum(to_string = "1 to 100")]
    Hundred,
    /// 1 to 511, nine questions.
    #[strum(to_string = "1 to 511")]
    FiveEleven,
}

impl Preset {
    /// Largest number of this preset's range.
    pub fn max_num(self) -> u32 {
        match self {
            Preset::Fifty => 50,
            Preset::Hundred => 100,
            Preset::FiveEleven => 511,
        }
    }

    /// Builds the game mode for this preset.
    pub fn mode(self) -> GameMode {
        let max_num = self.max_num();
        GameMode {
            label: self.to_string(),
            max_num,
            max_bits: bits_for(max_num),
        }
    }

    /// All presets as game modes, in display order.
    #[instrument]
    pub fn modes() -> Vec<GameMode> {
        use strum::IntoEnumIterator;
        Preset::iter().map(Preset::mode).collect()
    }
}

impl From<Preset> for GameMode {
    fn from(preset: Preset) -> Self {
        preset.mode()
    }
}

/// A mode definition that cannot be played.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ModeError {
    /// The range must contain at least the number 1.
    #[display("Range must include at least one number (max_num is 0)")]
    ZeroRange,

    /// Too few questions to tell every number apart.
    #[display("{} bits cannot cover 1..={} ({} required)", max_bits, max_num, required)]
    InsufficientBits {
        /// Requested upper bound.
        max_num: u32,
        /// Requested question count.
        max_bits: u32,
        /// Minimum question count for `max_num`.
        required: u32,
    },

    /// More questions than needed; the trailing cards would be empty.
    #[display("{} bits is more than 1..={} needs ({} required)", max_bits, max_num, required)]
    ExcessBits {
        /// Requested upper bound.
        max_num: u32,
        /// Requested question count.
        max_bits: u32,
        /// Minimum question count for `max_num`.
        required: u32,
    },

    /// Range too wide to show on a card.
    #[display("max_num {} exceeds the playable maximum of {}", _0, MAX_PLAYABLE_NUM)]
    RangeTooLarge(u32),

    /// Question count beyond what a `u32` range can use.
    #[display("{} bits exceeds the supported maximum of {}", _0, MAX_SUPPORTED_BITS)]
    TooManyBits(u32),
}

impl std::error::Error for ModeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_for_boundaries() {
        assert_eq!(bits_for(1), 1);
        assert_eq!(bits_for(2), 2);
        assert_eq!(bits_for(3), 2);
        assert_eq!(bits_for(4), 3);
        assert_eq!(bits_for(50), 6);
        assert_eq!(bits_for(63), 6);
        assert_eq!(bits_for(64), 7);
        assert_eq!(bits_for(100), 7);
        assert_eq!(bits_for(511), 9);
        assert_eq!(bits_for(512), 10);
        assert_eq!(bits_for(u32::MAX), 32);
    }

    #[test]
    fn test_bits_satisfy_power_bounds() {
        for max_num in 1..=2048u32 {
            let bits = bits_for(max_num);
            assert!(1u64 << bits > max_num as u64);
            assert!(max_num as u64 >= 1u64 << (bits - 1));
        }
    }

    #[test]
    fn test_preset_ranges() {
        let modes = Preset::modes();
        let summary: Vec<_> = modes
            .iter()
            .map(|m| (m.label().as_str(), *m.max_num(), *m.max_bits()))
            .collect();
        assert_eq!(
            summary,
            vec![("1 to 50", 50, 6), ("1 to 100", 100, 7), ("1 to 511", 511, 9)]
        );
    }

    #[test]
    fn test_zero_range_rejected() {
        assert_eq!(GameMode::new("empty", 0), Err(ModeError::ZeroRange));
    }

    #[test]
    fn test_with_bits_validation() {
        assert!(GameMode::with_bits("ok", 50, 6).is_ok());
        assert!(matches!(
            GameMode::with_bits("short", 50, 5),
            Err(ModeError::InsufficientBits { required: 6, .. })
        ));
        assert!(matches!(
            GameMode::with_bits("long", 50, 7),
            Err(ModeError::ExcessBits { required: 6, .. })
        ));
        assert_eq!(
            GameMode::with_bits("huge", 50, 40),
            Err(ModeError::TooManyBits(40))
        );
    }

    #[test]
    fn test_oversized_range_rejected() {
        assert!(GameMode::new("top", MAX_PLAYABLE_NUM).is_ok());
        assert_eq!(
            GameMode::new("huge", 4_000_000_000),
            Err(ModeError::RangeTooLarge(4_000_000_000))
        );
        assert_eq!(
            GameMode::with_bits("huge", 4_000_000_000, 32),
            Err(ModeError::RangeTooLarge(4_000_000_000))
        );
    }

    #[test]
    fn test_deserialize_validates() {
        let mode: GameMode =
            serde_json::from_str(r#"{"label":"1 to 50","max_num":50,"max_bits":6}"#).unwrap();
        assert_eq!(mode, Preset::Fifty.mode());

        let derived: GameMode = serde_json::from_str(r#"{"label":"x","max_num":100}"#).unwrap();
        assert_eq!(*derived.max_bits(), 7);

        for bad in [
            r#"{"label":"x","max_num":50,"max_bits":0}"#,
            r#"{"label":"x","max_num":0,"max_bits":1}"#,
            r#"{"label":"x","max_num":4000000000,"max_bits":32}"#,
        ] {
            assert!(serde_json::from_str::<GameMode>(bad).is_err(), "{}", bad);
        }
    }

    #[test]
    fn test_serialized_mode_reloads() {
        let json = serde_json::to_string(&Preset::FiveEleven.mode()).unwrap();
        let back: GameMode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Preset::FiveEleven.mode());
    }

    #[test]
    fn test_same_range_ignores_label() {
        let a = GameMode::new("fifty", 50).unwrap();
        let b = GameMode::new("another fifty", 50).unwrap();
        let c = GameMode::new("hundred", 100).unwrap();
        assert!(a.same_range(&b));
        assert!(!a.same_range(&c));
    }

    #[test]
    fn test_contains() {
        let mode = Preset::Fifty.mode();
        assert!(!mode.contains(0));
        assert!(mode.contains(1));
        assert!(mode.contains(50));
        assert!(!mode.contains(51));
    }
}
