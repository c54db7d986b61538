//! Numeric house rules for the engine.

use std::path::Path;

use ficha_core::CoreError;
use serde::{Deserialize, Serialize};

use crate::dice::Die;
use crate::error::{RulesError, RulesResult};

/// Configuration for valuation, initiative, and checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Base value of a skill the character does not possess.
    pub untrained_penalty: i32,
    /// Base value of a specialization sub-skill the character does not have.
    pub unfamiliar_penalty: i32,
    /// Initiative bonus for the courage perk.
    pub courage_bonus: i32,
    /// Initiative modifier for the cowardice hindrance (negative).
    pub cowardice_penalty: i32,
    /// Die rolled for skill checks.
    pub check_die: Die,
    /// Die rolled for initiative.
    pub initiative_die: Die,
    /// RNG seed for rolls the players did not type in.
    pub seed: u64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            untrained_penalty: -2,
            unfamiliar_penalty: -2,
            courage_bonus: 10,
            cowardice_penalty: -10,
            check_die: Die::D10,
            initiative_die: Die::D20,
            seed: 42,
        }
    }
}

impl RulesConfig {
    /// Parse a configuration from JSON. Missing fields keep their defaults.
    ///
    /// Dice with fewer than two sides, or more faces than fit in an `i32`,
    /// are rejected.
    pub fn from_json_str(json: &str) -> RulesResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(CoreError::from)?;
        for die in [config.check_die, config.initiative_die] {
            if !die.is_valid() {
                return Err(RulesError::InvalidDie(die.to_string()));
            }
        }
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_path(path: &Path) -> RulesResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the untrained and unfamiliar-specialization penalties.
    pub fn with_penalties(mut self, untrained: i32, unfamiliar: i32) -> Self {
        self.untrained_penalty = untrained;
        self.unfamiliar_penalty = unfamiliar;
        self
    }

    /// Set the courage bonus and cowardice penalty.
    pub fn with_perk_modifiers(mut self, courage: i32, cowardice: i32) -> Self {
        self.courage_bonus = courage;
        self.cowardice_penalty = cowardice;
        self
    }
}
