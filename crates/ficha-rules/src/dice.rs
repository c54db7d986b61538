//! Dice used by the tracker: a d20 for initiative and a d10 for checks.
//!
//! Die results are normally typed in by the players. The helpers here roll
//! for anyone who did not, clamp typed results to the die's faces, and
//! reject roll text that is not a number.

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::error::{RulesError, RulesResult};

/// Largest number of sides a die can have; every face fits in an `i32`.
pub const MAX_SIDES: u32 = i32::MAX as u32;

/// A polyhedral die type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Die {
    /// Ten-sided die, rolled for skill checks.
    D10,
    /// Twenty-sided die, rolled for initiative.
    D20,
    /// A die with a custom number of sides.
    Custom(u32),
}

impl Die {
    /// Returns the number of sides on this die.
    pub fn sides(self) -> u32 {
        match self {
            Self::D10 => 10,
            Self::D20 => 20,
            Self::Custom(n) => n.clamp(1, MAX_SIDES),
        }
    }

    /// Parse a die from a string like "d10" or "d20".
    pub fn from_str_tag(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "d10" => Some(Self::D10),
            "d20" => Some(Self::D20),
            other => {
                let num = other.strip_prefix('d')?.parse::<u32>().ok()?;
                if (2..=MAX_SIDES).contains(&num) {
                    Some(Self::Custom(num))
                } else {
                    None
                }
            }
        }
    }

    /// Roll the die once.
    pub fn roll(self, rng: &mut StdRng) -> i32 {
        rng.random_range(1..=self.max_face())
    }

    /// Clamp a typed-in result to the die's faces.
    pub fn clamp(self, value: i32) -> i32 {
        value.clamp(1, self.max_face())
    }

    /// Whether this die has a usable number of sides.
    pub fn is_valid(self) -> bool {
        match self {
            Self::Custom(n) => (2..=MAX_SIDES).contains(&n),
            _ => true,
        }
    }

    fn max_face(self) -> i32 {
        i32::try_from(self.sides()).unwrap_or(i32::MAX)
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::D10 => write!(f, "d10"),
            Self::D20 => write!(f, "d20"),
            Self::Custom(n) => write!(f, "d{n}"),
        }
    }
}

/// Parse a die result typed in by a player.
///
/// Only whole numbers are accepted; the value is not clamped here.
pub fn parse_roll(text: &str) -> RulesResult<i32> {
    text.trim()
        .parse::<i32>()
        .map_err(|_| RulesError::InvalidRoll(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn die_sides() {
        assert_eq!(Die::D10.sides(), 10);
        assert_eq!(Die::D20.sides(), 20);
        assert_eq!(Die::Custom(12).sides(), 12);
    }

    #[test]
    fn die_from_str() {
        assert_eq!(Die::from_str_tag("d20"), Some(Die::D20));
        assert_eq!(Die::from_str_tag(" D10 "), Some(Die::D10));
        assert_eq!(Die::from_str_tag("d12"), Some(Die::Custom(12)));
        assert_eq!(Die::from_str_tag("d1"), None);
        assert_eq!(Die::from_str_tag("foo"), None);
        assert_eq!(Die::from_str_tag("d3000000000"), None);
    }

    #[test]
    fn oversized_custom_die_is_capped() {
        let huge = Die::Custom(3_000_000_000);
        assert!(!huge.is_valid());
        assert_eq!(huge.sides(), MAX_SIDES);
        assert_eq!(huge.clamp(5), 5);
        assert_eq!(huge.clamp(i32::MAX), i32::MAX);
        assert_eq!(Die::Custom(0).clamp(5), 1);
        assert!(Die::Custom(12).is_valid());
        assert!(!Die::Custom(1).is_valid());

        let mut rng = StdRng::seed_from_u64(7);
        assert!(huge.roll(&mut rng) >= 1);
    }

    #[test]
    fn die_display() {
        assert_eq!(Die::D10.to_string(), "d10");
        assert_eq!(Die::Custom(30).to_string(), "d30");
    }

    #[test]
    fn clamp_to_faces() {
        assert_eq!(Die::D10.clamp(0), 1);
        assert_eq!(Die::D10.clamp(-4), 1);
        assert_eq!(Die::D10.clamp(7), 7);
        assert_eq!(Die::D10.clamp(15), 10);
        assert_eq!(Die::D20.clamp(20), 20);
    }

    #[test]
    fn roll_produces_valid_values() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let value = Die::D10.roll(&mut rng);
            assert!((1..=10).contains(&value));
        }
    }

    #[test]
    fn roll_deterministic_with_seed() {
        let mut rng1 = StdRng::seed_from_u64(99);
        let mut rng2 = StdRng::seed_from_u64(99);
        for _ in 0..10 {
            assert_eq!(Die::D20.roll(&mut rng1), Die::D20.roll(&mut rng2));
        }
    }

    #[test]
    fn parse_roll_accepts_numbers() {
        assert_eq!(parse_roll("17").unwrap(), 17);
        assert_eq!(parse_roll(" 3 ").unwrap(), 3);
        assert_eq!(parse_roll("25").unwrap(), 25);
    }

    #[test]
    fn parse_roll_rejects_text() {
        assert!(matches!(parse_roll("abc"), Err(RulesError::InvalidRoll(_))));
        assert!(matches!(parse_roll(""), Err(RulesError::InvalidRoll(_))));
        assert!(matches!(parse_roll("4.5"), Err(RulesError::InvalidRoll(_))));
    }
}
