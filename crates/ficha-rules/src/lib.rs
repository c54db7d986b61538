//! Character build and combat resolution rules engine for Ficha.
//!
//! Turns a character's raw selections into effective skill and attribute
//! values, orders initiative for an encounter, and resolves individual or
//! summed skill-check batches against difficulty thresholds. Every
//! operation takes a [`RuleBook`]: the immutable reference catalog plus the
//! numeric house rules.

pub mod check;
pub mod config;
pub mod dice;
pub mod effects;
pub mod encounter;
pub mod error;
pub mod initiative;
pub mod matcher;
pub mod rulebook;
pub mod validate;
pub mod valuation;

pub use check::{
    BatchConfig, BatchId, BatchRequest, CheckMode, CheckSelection, Combatant, Flavor,
    FlavorPhrases, GambiarraLedger, SkillCheckResult, resolve_batch, selectable_skills,
};
pub use config::RulesConfig;
pub use dice::{Die, parse_roll};
pub use effects::{
    EffectScope, EffectTarget, GlobalSkillEffect, character_effects, resolve_effects,
};
pub use encounter::{Encounter, InitiativeRequest, Round, Team, TestBatch};
pub use error::{RulesError, RulesResult};
pub use initiative::{InitiativeInput, InitiativeResult, compute_order, initiative_cmp, perk_modifier};
pub use rulebook::RuleBook;
pub use validate::{ValidationIssue, validate_catalog, validate_character};
pub use valuation::{
    SheetSummary, SkillLine, attribute_value, sheet_summary, skill_value, skill_value_with,
};
