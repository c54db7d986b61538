//! Resolution of free-text sub-skill names against a character's
//! specializations.
//!
//! Matching ignores case, diacritics, and surrounding whitespace on both
//! the stored key and the query, so "INGLÊS" finds a stored "Inglês".

use std::collections::BTreeMap;

use ficha_core::{SpecializationCategory, Specializations, normalize_name};

use crate::config::RulesConfig;

/// Find a stored sub-skill by normalized name.
///
/// Returns the stored key and its rank, including a rank of 0.
pub fn find_specialization<'a>(
    map: &'a BTreeMap<String, u32>,
    sub_skill: &str,
) -> Option<(&'a str, u32)> {
    let wanted = normalize_name(sub_skill);
    map.iter()
        .find(|(key, _)| normalize_name(key) == wanted)
        .map(|(key, rank)| (key.as_str(), *rank))
}

/// Base value of a sub-skill within a specialization category.
///
/// The stored rank when the character has it, otherwise the unfamiliar
/// specialization penalty.
pub fn resolve(
    category: SpecializationCategory,
    sub_skill: &str,
    specializations: &Specializations,
    config: &RulesConfig,
) -> i32 {
    match find_specialization(specializations.category(category), sub_skill) {
        Some((_, rank)) => rank_value(rank),
        None => config.unfamiliar_penalty,
    }
}

/// A stored rank as a value, saturating at `i32::MAX`.
pub(crate) fn rank_value(rank: u32) -> i32 {
    i32::try_from(rank).unwrap_or(i32::MAX)
}
