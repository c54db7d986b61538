//! Error types for the rules engine.
//!
//! Domain gaps (an untrained skill, an unfamiliar specialization) are not
//! errors; they produce penalty values. These variants are input-contract
//! violations the caller has to correct before anything is computed.

use ficha_core::CoreError;

use crate::check::BatchId;

/// Errors that can occur during rules operations.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    /// A specialization category was valued without sub-skill text.
    #[error("specialization '{0}' needs a sub-skill")]
    MissingSubSkill(String),

    /// A check batch was submitted with no selected characters.
    #[error("a check batch needs at least one character")]
    EmptyBatch,

    /// A selection referenced a character outside the roster.
    #[error("unknown character: {0}")]
    UnknownCharacter(String),

    /// A character selected the same batch twice.
    #[error("'{0}' is selected more than once in this batch")]
    DuplicateSelection(String),

    /// A character tried to spend a gambiarra token they already used.
    #[error("'{0}' already used their gambiarra in this encounter")]
    GambiarraAlreadyUsed(String),

    /// A regular check was submitted without a skill.
    #[error("'{0}' has no skill selected")]
    MissingSkill(String),

    /// A skill that the selection's mode does not offer.
    #[error("skill '{skill}' is not available in {mode} mode")]
    SkillNotAllowed {
        /// The rejected skill label.
        skill: String,
        /// The selection's mode.
        mode: String,
    },

    /// A check selection reached the resolver without a die result.
    #[error("'{0}' has no die roll")]
    MissingRoll(String),

    /// Die roll text that is not a whole number.
    #[error("invalid roll: \"{0}\"")]
    InvalidRoll(String),

    /// A configured die with fewer than two or too many sides.
    #[error("invalid die: {0}")]
    InvalidDie(String),

    /// No round with this number exists in the encounter.
    #[error("round {0} not found")]
    UnknownRound(u32),

    /// No batch with this id exists in the round.
    #[error("batch {0} not found")]
    UnknownBatch(BatchId),

    /// No team with this name exists in the encounter.
    #[error("team '{0}' not found")]
    UnknownTeam(String),

    /// An error from the core data model.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience result type for rules operations.
pub type RulesResult<T> = Result<T, RulesError>;
