//! Effective skill and attribute values.
//!
//! A skill's value is its base (stored rank, or a penalty when the character
//! lacks it) plus every trait effect that applies to it. An attribute's value
//! is its base score plus every selected advantage and disadvantage that
//! targets it. Both are pure: the same character and query always give the
//! same number.

use ficha_core::{Attribute, Character, SkillCategory, SpecializationCategory, names_match};
use serde::{Deserialize, Serialize};

use crate::effects::{EffectScope, EffectTarget, GlobalSkillEffect, character_effects};
use crate::error::{RulesError, RulesResult};
use crate::matcher::{self, rank_value};
use crate::rulebook::RuleBook;

/// Effective value of a skill, a power, a style, or a specialization
/// sub-skill.
///
/// `label` is a skill name or a specialization category label. Specialization
/// labels need `sub_skill` text; calling without it is an error.
pub fn skill_value(
    book: &RuleBook,
    character: &Character,
    label: &str,
    sub_skill: Option<&str>,
) -> RulesResult<i32> {
    let effects = character_effects(book.catalog(), character);
    skill_value_with(book, character, &effects, label, sub_skill)
}

/// Like [`skill_value`], with trait effects already resolved.
///
/// Lets a caller valuing many skills for one character resolve its effects
/// once.
pub fn skill_value_with(
    book: &RuleBook,
    character: &Character,
    effects: &[GlobalSkillEffect],
    label: &str,
    sub_skill: Option<&str>,
) -> RulesResult<i32> {
    if let Some(category) = SpecializationCategory::from_label(label) {
        let sub_skill = sub_skill
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| RulesError::MissingSubSkill(category.label().to_string()))?;
        return Ok(specialization_value(book, character, effects, category, sub_skill));
    }
    Ok(flat_value(book, character, effects, label))
}

fn specialization_value(
    book: &RuleBook,
    character: &Character,
    effects: &[GlobalSkillEffect],
    category: SpecializationCategory,
    sub_skill: &str,
) -> i32 {
    let base = matcher::resolve(category, sub_skill, &character.specializations, book.config());
    let bonus: i32 = effects
        .iter()
        .filter(|e| e.applies_to_sub_skill(category, sub_skill))
        .map(|e| e.value)
        .fold(0, i32::saturating_add);
    base.saturating_add(bonus)
}

fn flat_value(
    book: &RuleBook,
    character: &Character,
    effects: &[GlobalSkillEffect],
    skill: &str,
) -> i32 {
    let base = match character.flat_rank(skill) {
        Some(rank) if rank > 0 => rank_value(rank),
        _ => match character.power_or_style_rank(skill) {
            // Powers and styles take no trait effects.
            Some(rank) if rank > 0 => return rank_value(rank),
            _ => book.config().untrained_penalty,
        },
    };
    let bonus: i32 = effects
        .iter()
        .filter(|e| e.applies_to_skill(skill))
        .map(|e| e.value)
        .fold(0, i32::saturating_add);
    base.saturating_add(bonus)
}

/// Effective value of an attribute after advantages and disadvantages.
pub fn attribute_value(book: &RuleBook, character: &Character, attribute: Attribute) -> i32 {
    let catalog = book.catalog();
    let advantages = character.advantages.iter().filter_map(|name| {
        let found = catalog.advantage(name);
        if found.is_none() {
            tracing::warn!(advantage = %name, "unknown advantage skipped");
        }
        found
    });
    let disadvantages = character.disadvantages.iter().filter_map(|name| {
        let found = catalog.disadvantage(name);
        if found.is_none() {
            tracing::warn!(disadvantage = %name, "unknown disadvantage skipped");
        }
        found
    });

    advantages
        .chain(disadvantages)
        .filter(|m| m.attribute == attribute)
        .map(|m| m.delta)
        .fold(character.attributes.get(attribute), i32::saturating_add)
}

/// One valued line of a sheet summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillLine {
    /// Category label, e.g. "Social" or "Idiomas".
    pub group: String,
    /// Skill or sub-skill name.
    pub name: String,
    /// Stored rank, if the character has one.
    pub rank: Option<u32>,
    /// Effective value.
    pub value: i32,
}

/// Every effective value on a character's sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetSummary {
    /// Effective attributes in sheet order.
    pub attributes: Vec<(Attribute, i32)>,
    /// All catalogued flat skills, then powers and styles.
    pub skills: Vec<SkillLine>,
    /// Stored specializations, plus sub-skills that only effects grant.
    pub specializations: Vec<SkillLine>,
    /// The trait effects behind the numbers.
    pub effects: Vec<GlobalSkillEffect>,
}

/// Value every attribute and skill on a character's sheet.
pub fn sheet_summary(book: &RuleBook, character: &Character) -> SheetSummary {
    let catalog = book.catalog();
    let effects = character_effects(catalog, character);

    let attributes = Attribute::ALL
        .into_iter()
        .map(|a| (a, attribute_value(book, character, a)))
        .collect();

    let mut skills = Vec::new();
    for category in SkillCategory::ALL {
        for name in catalog.skills(category) {
            skills.push(SkillLine {
                group: category.label().to_string(),
                name: name.clone(),
                rank: character.flat_rank(name).filter(|r| *r > 0),
                value: flat_value(book, character, &effects, name),
            });
        }
    }
    for (group, map) in [("Poderes", &character.skills.powers), ("Estilos", &character.skills.styles)] {
        for (name, rank) in map.iter().filter(|(_, r)| **r > 0) {
            skills.push(SkillLine {
                group: group.to_string(),
                name: name.clone(),
                rank: Some(*rank),
                value: rank_value(*rank),
            });
        }
    }

    let mut specializations = Vec::new();
    for category in SpecializationCategory::ALL {
        let stored = character.specializations.category(category);
        let granted = effects.iter().filter(|e| {
            e.scope == EffectScope::Individual
                && e.target == EffectTarget::Specialization(category)
                && matcher::find_specialization(stored, &e.skill).is_none()
        });
        let names = stored
            .keys()
            .map(String::as_str)
            .chain(granted.map(|e| e.skill.as_str()));
        for name in names {
            let listed = specializations
                .iter()
                .any(|l: &SkillLine| l.group == category.label() && names_match(&l.name, name));
            if listed {
                continue;
            }
            specializations.push(SkillLine {
                group: category.label().to_string(),
                name: name.to_string(),
                rank: matcher::find_specialization(stored, name).map(|(_, r)| r),
                value: specialization_value(book, character, &effects, category, name),
            });
        }
    }

    SheetSummary {
        attributes,
        skills,
        specializations,
        effects,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ficha_core::{
        Archetype, AttributeModifier, Catalog, SkillDelta, SkillLists, TraitDefinition,
    };

    fn synthetic_book() -> RuleBook {
        let catalog = Catalog {
            skills: SkillLists {
                combat: vec!["Briga".to_string()],
                social: vec!["Persuasão".to_string()],
                utility: vec!["Furtividade".to_string()],
                complementary: vec!["Culinária".to_string()],
            },
            peculiarities: vec![
                TraitDefinition {
                    name: "Lábia".to_string(),
                    deltas: vec![SkillDelta {
                        skill: "Persuasão".to_string(),
                        value: 2,
                    }],
                },
                TraitDefinition {
                    name: "Charme".to_string(),
                    deltas: vec![SkillDelta {
                        skill: "Persuasão".to_string(),
                        value: 2,
                    }],
                },
                TraitDefinition {
                    name: "Poliglota".to_string(),
                    deltas: vec![SkillDelta {
                        skill: "Idiomas".to_string(),
                        value: 2,
                    }],
                },
            ],
            advantages: vec![
                AttributeModifier {
                    name: "Ágil".to_string(),
                    attribute: Attribute::Agility,
                    delta: 1,
                },
                AttributeModifier {
                    name: "Felino".to_string(),
                    attribute: Attribute::Agility,
                    delta: 2,
                },
            ],
            disadvantages: vec![AttributeModifier {
                name: "Manco".to_string(),
                attribute: Attribute::Agility,
                delta: -1,
            }],
            ..Catalog::default()
        };
        RuleBook::new(catalog, crate::config::RulesConfig::default())
    }

    #[test]
    fn untrained_skill_is_penalty() {
        let book = synthetic_book();
        let c = Character::new("Ana", Archetype::Human);
        assert_eq!(skill_value(&book, &c, "Briga", None).unwrap(), -2);
        assert_eq!(skill_value(&book, &c, "Voo", None).unwrap(), -2);
    }

    #[test]
    fn extreme_ranks_and_attributes_saturate() {
        let book = synthetic_book();
        let mut c = Character::new("Ana", Archetype::Human);
        c.set_skill(SkillCategory::Social, "Persuasão", u32::MAX);
        c.select_peculiarity("Lábia");
        c.set_power("Sombras", u32::MAX);
        assert_eq!(skill_value(&book, &c, "Persuasão", None).unwrap(), i32::MAX);
        assert_eq!(skill_value(&book, &c, "Sombras", None).unwrap(), i32::MAX);

        c.set_attribute(Attribute::Agility, i32::MAX);
        c.select_advantage("Felino");
        assert_eq!(attribute_value(&book, &c, Attribute::Agility), i32::MAX);

        let mut slow = Character::new("Bia", Archetype::Human);
        slow.set_attribute(Attribute::Agility, i32::MIN);
        slow.select_disadvantage("Manco");
        assert_eq!(attribute_value(&book, &slow, Attribute::Agility), i32::MIN);
    }

    #[test]
    fn rank_zero_counts_as_untrained() {
        let book = synthetic_book();
        let mut c = Character::new("Ana", Archetype::Human);
        c.set_skill(SkillCategory::Combat, "Briga", 0);
        assert_eq!(skill_value(&book, &c, "Briga", None).unwrap(), -2);
    }

    #[test]
    fn possessed_skill_is_rank() {
        let book = synthetic_book();
        let mut c = Character::new("Ana", Archetype::Human);
        c.set_skill(SkillCategory::Combat, "Briga", 3);
        assert_eq!(skill_value(&book, &c, "briga", None).unwrap(), 3);
    }

    #[test]
    fn effects_stack_additively() {
        let book = synthetic_book();
        let mut c = Character::new("Ana", Archetype::Human);
        c.set_skill(SkillCategory::Social, "Persuasão", 1);
        c.select_peculiarity("Lábia");
        c.select_peculiarity("Charme");
        assert_eq!(skill_value(&book, &c, "Persuasão", None).unwrap(), 5);
    }

    #[test]
    fn effects_apply_to_untrained_skill() {
        let book = synthetic_book();
        let mut c = Character::new("Ana", Archetype::Human);
        c.select_peculiarity("Lábia");
        assert_eq!(skill_value(&book, &c, "Persuasão", None).unwrap(), 0);
    }

    #[test]
    fn specialization_needs_sub_skill() {
        let book = synthetic_book();
        let c = Character::new("Ana", Archetype::Human);
        assert!(matches!(
            skill_value(&book, &c, "Idiomas", None),
            Err(RulesError::MissingSubSkill(_))
        ));
        assert!(matches!(
            skill_value(&book, &c, "Idiomas", Some("   ")),
            Err(RulesError::MissingSubSkill(_))
        ));
    }

    #[test]
    fn penalty_and_category_bonus_net_out() {
        let book = synthetic_book();
        let mut c = Character::new("Ana", Archetype::Human);
        c.select_peculiarity("Poliglota");
        assert_eq!(skill_value(&book, &c, "Idiomas", Some("Japonês")).unwrap(), 0);
        c.set_specialization(SpecializationCategory::Languages, "Japonês", 1);
        assert_eq!(skill_value(&book, &c, "Idiomas", Some("japones")).unwrap(), 3);
    }

    #[test]
    fn powers_and_styles_ignore_effects() {
        let book = synthetic_book();
        let mut c = Character::new("Ana", Archetype::Human);
        c.set_power("Persuasão Divina", 2);
        c.set_style("Capoeira", 3);
        assert_eq!(skill_value(&book, &c, "Persuasão Divina", None).unwrap(), 2);
        assert_eq!(skill_value(&book, &c, "Capoeira", None).unwrap(), 3);
        assert_eq!(skill_value(&book, &c, "Kung Fu", None).unwrap(), -2);
    }

    #[test]
    fn attribute_modifiers_are_cumulative() {
        let book = synthetic_book();
        let mut c = Character::new("Ana", Archetype::Human);
        c.set_attribute(Attribute::Agility, 3);
        c.select_advantage("Ágil");
        c.select_advantage("Felino");
        c.select_disadvantage("Manco");
        assert_eq!(attribute_value(&book, &c, Attribute::Agility), 5);
        assert_eq!(attribute_value(&book, &c, Attribute::Strength), 1);
    }

    #[test]
    fn unknown_modifiers_are_ignored() {
        let book = synthetic_book();
        let mut c = Character::new("Ana", Archetype::Human);
        c.select_advantage("Sortudo");
        assert_eq!(attribute_value(&book, &c, Attribute::Agility), 1);
    }

    #[test]
    fn valuation_is_idempotent() {
        let book = RuleBook::standard();
        let mut c = Character::new("Ana", Archetype::Human);
        c.select_peculiarity("Carismático");
        let first = skill_value(&book, &c, "Liderança", None).unwrap();
        let second = skill_value(&book, &c, "Liderança", None).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            attribute_value(&book, &c, Attribute::Charisma),
            attribute_value(&book, &c, Attribute::Charisma)
        );
    }

    #[test]
    fn lineage_sub_skill_bonus_end_to_end() {
        let book = RuleBook::standard();
        let mut c = Character::new("Íris", Archetype::DivineDescendant);
        c.set_lineage("Hermes");
        c.choose_lineage_sub_skill("Condução", "veículos aéreos");

        assert_eq!(
            skill_value(&book, &c, "Condução", Some("veículos aéreos")).unwrap(),
            0
        );
        assert_eq!(
            skill_value(&book, &c, "Condução", Some("veículos terrestres")).unwrap(),
            -2
        );

        c.set_specialization(SpecializationCategory::Driving, "Veículos Aéreos", 2);
        c.set_specialization(SpecializationCategory::Driving, "veículos terrestres", 1);
        assert_eq!(
            skill_value(&book, &c, "Condução", Some("veículos aéreos")).unwrap(),
            4
        );
        assert_eq!(
            skill_value(&book, &c, "Condução", Some("veículos terrestres")).unwrap(),
            1
        );
    }

    #[test]
    fn sheet_summary_lists_everything() {
        let book = RuleBook::standard();
        let mut c = Character::new("Íris", Archetype::DivineDescendant);
        c.set_lineage("Hermes");
        c.choose_lineage_sub_skill("Condução", "Motos");
        c.set_skill(SkillCategory::Utility, "Furtividade", 2);
        c.set_specialization(SpecializationCategory::Languages, "Grego", 2);
        c.set_power("Passo Veloz", 1);

        let summary = sheet_summary(&book, &c);
        assert_eq!(summary.attributes.len(), 8);

        let stealth = summary
            .skills
            .iter()
            .find(|l| l.name == "Furtividade")
            .unwrap();
        assert_eq!(stealth.rank, Some(2));
        assert_eq!(stealth.value, 3);

        assert!(summary.skills.iter().any(|l| l.group == "Poderes" && l.value == 1));

        let motos = summary
            .specializations
            .iter()
            .find(|l| l.name == "Motos")
            .unwrap();
        assert_eq!(motos.rank, None);
        assert_eq!(motos.value, 0);

        let grego = summary
            .specializations
            .iter()
            .find(|l| l.name == "Grego")
            .unwrap();
        assert_eq!(grego.value, 2);
        assert_eq!(summary.effects.len(), 2);
    }

    proptest::proptest! {
        #[test]
        fn attribute_is_base_plus_deltas(
            base in -5i32..10,
            picks in proptest::collection::vec(0usize..3, 0..3),
        ) {
            let book = synthetic_book();
            let mut c = Character::new("Ana", Archetype::Human);
            c.set_attribute(Attribute::Agility, base);
            let mut expected = base;
            for pick in picks {
                let changed = match pick {
                    0 => c.select_advantage("Ágil"),
                    1 => c.select_advantage("Felino"),
                    _ => c.select_disadvantage("Manco"),
                };
                if changed {
                    expected += [1, 2, -1][pick];
                }
            }
            proptest::prop_assert_eq!(attribute_value(&book, &c, Attribute::Agility), expected);
        }

        #[test]
        fn unpossessed_skill_without_effects_is_penalty(name in "[A-Za-z]{3,12}") {
            let book = RuleBook::standard();
            let c = Character::new("Ana", Archetype::Human);
            proptest::prop_assume!(SpecializationCategory::from_label(&name).is_none());
            proptest::prop_assert_eq!(skill_value(&book, &c, &name, None).unwrap(), -2);
        }
    }
}
