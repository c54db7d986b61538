//! Trait effect resolution.
//!
//! Peculiarities, trejeitos, and a divine lineage each grant skill deltas.
//! This module flattens a character's selections into a list of
//! [`GlobalSkillEffect`]s: bonuses to one named skill or to a whole
//! specialization category. The list is derived on demand and never stored;
//! consumers sum every matching effect.

use std::collections::BTreeMap;

use ficha_core::{
    Archetype, Catalog, Character, SkillCategory, SpecializationCategory, names_match,
};
use serde::{Deserialize, Serialize};

/// How widely an effect applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectScope {
    /// Exactly one named skill or sub-skill.
    Individual,
    /// Every sub-skill of one specialization category.
    Category,
}

/// The skill group an effect lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectTarget {
    /// A catalogued flat skill category.
    Skill(SkillCategory),
    /// A specialization category.
    Specialization(SpecializationCategory),
}

/// A derived bonus or penalty produced by a character's traits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSkillEffect {
    /// Individual or category-wide.
    pub scope: EffectScope,
    /// The group the effect belongs to.
    pub target: EffectTarget,
    /// The skill, sub-skill, or category label the effect names.
    pub skill: String,
    /// Signed change.
    pub value: i32,
    /// Which trait produced the effect, for display.
    pub source: String,
}

impl GlobalSkillEffect {
    /// Returns true if this effect applies to the named flat skill.
    pub fn applies_to_skill(&self, skill: &str) -> bool {
        matches!(self.target, EffectTarget::Skill(_))
            && self.scope == EffectScope::Individual
            && names_match(&self.skill, skill)
    }

    /// Returns true if this effect applies to a sub-skill of a category.
    pub fn applies_to_sub_skill(&self, category: SpecializationCategory, sub_skill: &str) -> bool {
        if self.target != EffectTarget::Specialization(category) {
            return false;
        }
        match self.scope {
            EffectScope::Category => true,
            EffectScope::Individual => names_match(&self.skill, sub_skill),
        }
    }
}

/// Flatten trait selections into a list of skill effects.
///
/// Emission order is peculiarities, then trejeitos, then the lineage, each
/// in selection and declaration order. A lineage effect that needs a
/// sub-skill the player has not supplied grants nothing. Names missing
/// from the catalog are skipped.
pub fn resolve_effects(
    catalog: &Catalog,
    peculiarities: &[String],
    trejeitos: &[String],
    lineage: Option<&str>,
    sub_skill_choices: &BTreeMap<String, String>,
) -> Vec<GlobalSkillEffect> {
    let mut effects = Vec::new();

    for name in peculiarities {
        match catalog.peculiarity(name) {
            Some(def) => {
                for delta in &def.deltas {
                    push_classified(catalog, &mut effects, &delta.skill, delta.value, &def.name);
                }
            }
            None => tracing::warn!(peculiarity = %name, "unknown peculiarity skipped"),
        }
    }

    for name in trejeitos {
        match catalog.trejeito(name) {
            Some(def) => {
                for delta in &def.deltas {
                    push_classified(catalog, &mut effects, &delta.skill, delta.value, &def.name);
                }
            }
            None => tracing::warn!(trejeito = %name, "unknown trejeito skipped"),
        }
    }

    if let Some(name) = lineage {
        match catalog.lineage(name) {
            Some(def) => {
                for effect in &def.effects {
                    if !effect.requires_choice {
                        push_classified(catalog, &mut effects, &effect.skill, effect.bonus, &def.name);
                        continue;
                    }
                    let Some(category) = SpecializationCategory::from_label(&effect.skill) else {
                        tracing::warn!(
                            lineage = %def.name,
                            skill = %effect.skill,
                            "sub-skill choice on a non-specialization skill skipped"
                        );
                        continue;
                    };
                    let choice = sub_skill_choices
                        .iter()
                        .find(|(key, _)| names_match(key, &effect.skill))
                        .map(|(_, text)| text.trim())
                        .filter(|text| !text.is_empty());
                    match choice {
                        Some(text) => effects.push(GlobalSkillEffect {
                            scope: EffectScope::Individual,
                            target: EffectTarget::Specialization(category),
                            skill: text.to_string(),
                            value: effect.bonus,
                            source: def.name.clone(),
                        }),
                        None => tracing::warn!(
                            lineage = %def.name,
                            skill = %effect.skill,
                            "lineage bonus awaiting a sub-skill choice"
                        ),
                    }
                }
            }
            None => tracing::warn!(lineage = %name, "unknown lineage skipped"),
        }
    }

    tracing::debug!(count = effects.len(), "resolved trait effects");
    effects
}

/// Effects for a character's own selections.
///
/// The lineage only counts for divine descendants.
pub fn character_effects(catalog: &Catalog, character: &Character) -> Vec<GlobalSkillEffect> {
    let lineage = match character.archetype {
        Archetype::DivineDescendant => character.lineage.as_deref(),
        Archetype::Human | Archetype::Creature => None,
    };
    resolve_effects(
        catalog,
        &character.peculiarities,
        &character.trejeitos,
        lineage,
        &character.lineage_choices,
    )
}

/// Classify a skill name and push an individual or category effect.
fn push_classified(
    catalog: &Catalog,
    effects: &mut Vec<GlobalSkillEffect>,
    skill: &str,
    value: i32,
    source: &str,
) {
    if let Some((category, canonical)) = catalog.skill_category(skill) {
        effects.push(GlobalSkillEffect {
            scope: EffectScope::Individual,
            target: EffectTarget::Skill(category),
            skill: canonical.to_string(),
            value,
            source: source.to_string(),
        });
    } else if let Some(category) = SpecializationCategory::from_label(skill) {
        effects.push(GlobalSkillEffect {
            scope: EffectScope::Category,
            target: EffectTarget::Specialization(category),
            skill: category.label().to_string(),
            value,
            source: source.to_string(),
        });
    } else {
        tracing::warn!(%skill, %source, "effect on an unknown skill skipped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    fn choices(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn peculiarity_individual_and_category() {
        let catalog = Catalog::standard();
        let effects = resolve_effects(
            &catalog,
            &names(&["Atleta Nato"]),
            &[],
            None,
            &BTreeMap::new(),
        );
        assert_eq!(effects.len(), 2);
        assert_eq!(effects[0].scope, EffectScope::Individual);
        assert_eq!(effects[0].target, EffectTarget::Skill(SkillCategory::Utility));
        assert_eq!(effects[0].skill, "Atletismo");
        assert_eq!(effects[0].value, 1);
        assert_eq!(effects[1].scope, EffectScope::Category);
        assert_eq!(
            effects[1].target,
            EffectTarget::Specialization(SpecializationCategory::Sports)
        );
        assert_eq!(effects[1].source, "Atleta Nato");
    }

    #[test]
    fn trejeito_deltas_are_negative() {
        let catalog = Catalog::standard();
        let effects = resolve_effects(
            &catalog,
            &[],
            &names(&["Gago"]),
            None,
            &BTreeMap::new(),
        );
        assert_eq!(effects.len(), 2);
        assert!(effects.iter().all(|e| e.value == -1));
    }

    #[test]
    fn emission_order_peculiarities_trejeitos_lineage() {
        let catalog = Catalog::standard();
        let effects = resolve_effects(
            &catalog,
            &names(&["Poliglota"]),
            &names(&["Distraído"]),
            Some("Hefesto"),
            &BTreeMap::new(),
        );
        let sources: Vec<&str> = effects.iter().map(|e| e.source.as_str()).collect();
        assert_eq!(sources, vec!["Poliglota", "Distraído", "Hefesto"]);
    }

    #[test]
    fn lineage_choice_supplied() {
        let catalog = Catalog::standard();
        let effects = resolve_effects(
            &catalog,
            &[],
            &[],
            Some("Hermes"),
            &choices(&[("Condução", "  veículos aéreos ")]),
        );
        assert_eq!(effects.len(), 2);
        assert_eq!(effects[0].scope, EffectScope::Individual);
        assert_eq!(
            effects[0].target,
            EffectTarget::Specialization(SpecializationCategory::Driving)
        );
        assert_eq!(effects[0].skill, "veículos aéreos");
        assert_eq!(effects[0].value, 2);
        assert_eq!(effects[1].skill, "Furtividade");
    }

    #[test]
    fn lineage_choice_missing_is_dropped() {
        let catalog = Catalog::standard();
        let effects = resolve_effects(&catalog, &[], &[], Some("Hermes"), &BTreeMap::new());
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].skill, "Furtividade");

        let blank = resolve_effects(
            &catalog,
            &[],
            &[],
            Some("Hermes"),
            &choices(&[("Condução", "   ")]),
        );
        assert_eq!(blank.len(), 1);
    }

    #[test]
    fn lineage_without_choice_on_category_is_category_wide() {
        let catalog = Catalog::standard();
        let effects = resolve_effects(&catalog, &[], &[], Some("Hefesto"), &BTreeMap::new());
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].scope, EffectScope::Category);
        assert_eq!(
            effects[0].target,
            EffectTarget::Specialization(SpecializationCategory::Crafts)
        );
    }

    #[test]
    fn unknown_names_are_skipped() {
        let catalog = Catalog::standard();
        let effects = resolve_effects(
            &catalog,
            &names(&["Inexistente"]),
            &names(&["Também Não"]),
            Some("Odin"),
            &BTreeMap::new(),
        );
        assert!(effects.is_empty());
    }

    #[test]
    fn resolution_is_pure() {
        let catalog = Catalog::standard();
        let p = names(&["Carismático", "Poliglota"]);
        let t = names(&["Gago"]);
        let c = choices(&[("Artes", "Música")]);
        let a = resolve_effects(&catalog, &p, &t, Some("Apolo"), &c);
        let b = resolve_effects(&catalog, &p, &t, Some("Apolo"), &c);
        assert_eq!(a, b);
        assert_eq!(catalog, Catalog::standard());
    }

    #[test]
    fn character_lineage_only_for_divine_descendants() {
        let catalog = Catalog::standard();
        let mut human = Character::new("Caio", Archetype::Human);
        human.set_lineage("Ares");
        assert!(character_effects(&catalog, &human).is_empty());

        let mut demigod = Character::new("Dora", Archetype::DivineDescendant);
        demigod.set_lineage("Ares");
        assert_eq!(character_effects(&catalog, &demigod).len(), 2);
    }

    #[test]
    fn applies_to_checks() {
        let individual = GlobalSkillEffect {
            scope: EffectScope::Individual,
            target: EffectTarget::Specialization(SpecializationCategory::Driving),
            skill: "veículos aéreos".to_string(),
            value: 2,
            source: "Hermes".to_string(),
        };
        assert!(individual.applies_to_sub_skill(SpecializationCategory::Driving, "Veiculos Aereos"));
        assert!(!individual.applies_to_sub_skill(SpecializationCategory::Driving, "veículos terrestres"));
        assert!(!individual.applies_to_sub_skill(SpecializationCategory::Sports, "veículos aéreos"));
        assert!(!individual.applies_to_skill("veículos aéreos"));

        let flat = GlobalSkillEffect {
            scope: EffectScope::Individual,
            target: EffectTarget::Skill(SkillCategory::Social),
            skill: "Persuasão".to_string(),
            value: 1,
            source: "Carismático".to_string(),
        };
        assert!(flat.applies_to_skill("persuasao"));
        assert!(!flat.applies_to_skill("Empatia"));
    }
}
