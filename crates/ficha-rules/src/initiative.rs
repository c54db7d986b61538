//! Initiative ordering for an encounter round.
//!
//! Each character's base initiative is effective Agility plus effective
//! Perception. The die roll and perk modifiers are added on top, and the
//! whole encounter is sorted into a total order.

use std::cmp::Ordering;

use ficha_core::{Attribute, Character, CharacterId};
use serde::{Deserialize, Serialize};

use crate::rulebook::RuleBook;
use crate::valuation::attribute_value;

/// One character's entry into the initiative calculation.
#[derive(Debug, Clone)]
pub struct InitiativeInput<'a> {
    /// The character.
    pub character: &'a Character,
    /// Display name of the character's team.
    pub team: &'a str,
    /// Initiative die result, as rolled. Not clamped.
    pub roll: i32,
    /// Courage perk toggled on.
    pub courage: bool,
    /// Cowardice hindrance toggled on.
    pub cowardice: bool,
}

/// A character's computed initiative for one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeResult {
    /// The character's ID.
    pub character_id: CharacterId,
    /// Display name.
    pub name: String,
    /// Team display name.
    pub team: String,
    /// Agility plus Perception.
    pub base: i32,
    /// The die roll.
    pub roll: i32,
    /// Sum of perk modifiers.
    pub modifier: i32,
    /// Base plus roll plus modifier.
    pub total: i32,
}

impl std::fmt::Display for InitiativeResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}): {} = {} + {} {:+}",
            self.name, self.team, self.total, self.base, self.roll, self.modifier
        )
    }
}

/// Sum of the perk modifiers that are toggled on.
///
/// Courage and cowardice are not exclusive here; both toggled simply stack.
pub fn perk_modifier(book: &RuleBook, courage: bool, cowardice: bool) -> i32 {
    let config = book.config();
    [
        (courage, config.courage_bonus),
        (cowardice, config.cowardice_penalty),
    ]
    .into_iter()
    .filter(|(on, _)| *on)
    .fold(0, |modifier, (_, value)| modifier.saturating_add(value))
}

/// Compare two results in initiative order.
///
/// Higher total first, then higher base, then name ascending.
pub fn initiative_cmp(a: &InitiativeResult, b: &InitiativeResult) -> Ordering {
    b.total
        .cmp(&a.total)
        .then_with(|| b.base.cmp(&a.base))
        .then_with(|| a.name.cmp(&b.name))
}

/// Compute initiative for every input and sort into turn order.
pub fn compute_order(book: &RuleBook, inputs: &[InitiativeInput<'_>]) -> Vec<InitiativeResult> {
    let mut results: Vec<InitiativeResult> = inputs
        .iter()
        .map(|input| {
            let character = input.character;
            let base = attribute_value(book, character, Attribute::Agility)
                .saturating_add(attribute_value(book, character, Attribute::Perception));
            let modifier = perk_modifier(book, input.courage, input.cowardice);
            let total = base.saturating_add(input.roll).saturating_add(modifier);
            tracing::debug!(name = %character.name, base, roll = input.roll, modifier, total, "initiative");
            InitiativeResult {
                character_id: character.id,
                name: character.name.clone(),
                team: input.team.to_string(),
                base,
                roll: input.roll,
                modifier,
                total,
            }
        })
        .collect();

    // Stable sort: identical keys keep input order.
    results.sort_by(initiative_cmp);
    results
}
