//! Batch resolution.
//!
//! Validation runs over the whole batch before anything is computed, so a
//! rejected batch leaves the gambiarra ledger untouched. Verdicts are
//! assigned only after every total is known, since summed mode needs the
//! batch total.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use ficha_core::{SpecializationCategory, names_match};

use super::{
    BatchRequest, CheckSelection, Combatant, GambiarraLedger, SkillCheckResult, selectable_skills,
    skill_group,
};
use crate::effects::character_effects;
use crate::error::{RulesError, RulesResult};
use crate::rulebook::RuleBook;
use crate::valuation::{attribute_value, skill_value_with};

/// Resolve a check batch.
///
/// Every selection must name a roster character at most once. Regular
/// checks need an allowed skill, sub-skill text for specialization labels,
/// and a roll; gambiarra checks need an unspent token. The ledger is
/// updated only when the whole batch is accepted. When editing, tokens the
/// batch previously consumed are given back first.
pub fn resolve_batch(
    book: &RuleBook,
    roster: &[Combatant<'_>],
    request: &BatchRequest<'_>,
    ledger: &mut GambiarraLedger,
    at: DateTime<Utc>,
) -> RulesResult<Vec<SkillCheckResult>> {
    let entries = validate(book, roster, request, ledger)?;
    let config = request.config;

    let mut results = Vec::with_capacity(entries.len());
    for (selection, combatant) in &entries {
        results.push(compute(book, selection, combatant, config.global_difficulty, at)?);
    }

    let sum = results
        .iter()
        .filter(|r| !r.gambiarra)
        .map(|r| r.total)
        .fold(0, i32::saturating_add);
    let summed_verdict = match config.global_difficulty {
        Some(difficulty) if config.summed => Some(sum >= difficulty),
        _ => None,
    };
    tracing::debug!(batch = %request.id, sum, ?summed_verdict, "batch totals");

    for (index, result) in results.iter_mut().enumerate() {
        result.success = if result.gambiarra {
            Some(true)
        } else if let Some(verdict) = summed_verdict {
            Some(verdict)
        } else if let Some(difficulty) = config.global_difficulty {
            Some(result.total >= difficulty)
        } else {
            result.difficulty.map(|d| result.total >= d)
        };
        result.flavor = result
            .success
            .and_then(|success| config.phrases.pick(success, index));
    }

    if request.editing {
        ledger.release_batch(request.id);
    }
    for (selection, _) in entries.iter().filter(|(s, _)| s.gambiarra) {
        ledger.consume(selection.character_id, request.id);
    }

    Ok(results)
}

fn validate<'s, 'r>(
    book: &RuleBook,
    roster: &[Combatant<'r>],
    request: &BatchRequest<'s>,
    ledger: &GambiarraLedger,
) -> RulesResult<Vec<(&'s CheckSelection, Combatant<'r>)>> {
    if request.selections.is_empty() {
        return Err(RulesError::EmptyBatch);
    }
    let editing = request.editing.then_some(request.id);

    let mut seen = BTreeSet::new();
    let mut entries = Vec::with_capacity(request.selections.len());
    for selection in request.selections {
        let combatant = roster
            .iter()
            .find(|c| c.character.id == selection.character_id)
            .copied()
            .ok_or_else(|| RulesError::UnknownCharacter(selection.character_id.to_string()))?;
        let name = &combatant.character.name;

        if !seen.insert(selection.character_id) {
            return Err(RulesError::DuplicateSelection(name.clone()));
        }

        if selection.gambiarra {
            if !ledger.is_available(selection.character_id, editing) {
                return Err(RulesError::GambiarraAlreadyUsed(name.clone()));
            }
        } else {
            let skill = selection
                .skill
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| RulesError::MissingSkill(name.clone()))?;
            let allowed = selectable_skills(book.catalog(), combatant.character, selection.mode);
            if !allowed.iter().any(|s| names_match(s, skill)) {
                return Err(RulesError::SkillNotAllowed {
                    skill: skill.to_string(),
                    mode: selection.mode.to_string(),
                });
            }
            if let Some(category) = SpecializationCategory::from_label(skill) {
                if selection.sub_skill_text().is_none() {
                    return Err(RulesError::MissingSubSkill(category.label().to_string()));
                }
            }
            if selection.roll.is_none() {
                return Err(RulesError::MissingRoll(name.clone()));
            }
        }
        entries.push((selection, combatant));
    }
    Ok(entries)
}

fn compute(
    book: &RuleBook,
    selection: &CheckSelection,
    combatant: &Combatant<'_>,
    global_difficulty: Option<i32>,
    at: DateTime<Utc>,
) -> RulesResult<SkillCheckResult> {
    let character = combatant.character;
    let mut result = SkillCheckResult {
        character_id: character.id,
        name: character.name.clone(),
        team: combatant.team.to_string(),
        category: "Gambiarra".to_string(),
        skill: selection.display_skill(),
        attribute: selection.attribute,
        skill_value: 0,
        attribute_value: 0,
        roll: 0,
        total: 0,
        at,
        combat: selection.mode.is_combat(),
        difficulty: selection.difficulty,
        global_difficulty,
        success: None,
        flavor: None,
        gambiarra: selection.gambiarra,
        terrain_advantage: selection.mode.terrain_advantage(),
        terrain_disadvantage: selection.mode.terrain_disadvantage(),
    };
    if selection.gambiarra {
        if let Some(skill) = selection.skill.as_deref().filter(|s| !s.trim().is_empty()) {
            result.category = skill_group(book.catalog(), character, skill.trim());
        }
        return Ok(result);
    }

    let skill = selection.skill.as_deref().map(str::trim).unwrap_or_default();
    let roll = selection
        .roll
        .ok_or_else(|| RulesError::MissingRoll(character.name.clone()))?;
    let effects = character_effects(book.catalog(), character);

    result.category = skill_group(book.catalog(), character, skill);
    result.skill_value =
        skill_value_with(book, character, &effects, skill, selection.sub_skill_text())?;
    result.attribute_value = attribute_value(book, character, selection.attribute);
    result.roll = book.config().check_die.clamp(roll);
    result.total = result
        .skill_value
        .saturating_add(result.attribute_value)
        .saturating_add(result.roll);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{BatchConfig, BatchId, CheckMode, FlavorPhrases};
    use ficha_core::{Archetype, Attribute, Character, SkillCategory};

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn fighter(name: &str, strength: i32, briga: u32) -> Character {
        let mut c = Character::new(name, Archetype::Human);
        c.set_attribute(Attribute::Strength, strength);
        c.set_skill(SkillCategory::Combat, "Briga", briga);
        c
    }

    fn brawl(c: &Character, roll: i32) -> CheckSelection {
        CheckSelection::new(c.id, Attribute::Strength)
            .with_mode(CheckMode::combat())
            .with_skill("Briga")
            .with_roll(roll)
    }

    fn run(
        roster: &[Combatant<'_>],
        selections: &[CheckSelection],
        config: &BatchConfig,
        ledger: &mut GambiarraLedger,
    ) -> RulesResult<Vec<SkillCheckResult>> {
        let request = BatchRequest {
            id: BatchId(1),
            selections,
            config,
            editing: false,
        };
        resolve_batch(&RuleBook::standard(), roster, &request, ledger, now())
    }

    /// Three fighters whose totals come out to 5, 7, and 9.
    fn trio() -> [Character; 3] {
        [fighter("Ana", 1, 1), fighter("Bia", 2, 2), fighter("Caio", 3, 3)]
    }

    fn team<'a>(members: &'a [Character]) -> Vec<Combatant<'a>> {
        members
            .iter()
            .map(|character| Combatant {
                character,
                team: "Azul",
            })
            .collect()
    }

    #[test]
    fn total_is_skill_attribute_roll() {
        let ana = fighter("Ana", 3, 2);
        let roster = team(std::slice::from_ref(&ana));
        let results = run(
            &roster,
            &[brawl(&ana, 6)],
            &BatchConfig::new("Luta"),
            &mut GambiarraLedger::new(),
        )
        .unwrap();
        let r = &results[0];
        assert_eq!((r.skill_value, r.attribute_value, r.roll, r.total), (2, 3, 6, 11));
        assert_eq!(r.category, "Combate");
        assert_eq!(r.team, "Azul");
        assert!(r.combat);
        assert_eq!(r.success, None);
        assert_eq!(r.at, now());
    }

    #[test]
    fn extreme_values_saturate() {
        let members = [
            fighter("Gigante", i32::MAX, u32::MAX),
            fighter("Titã", i32::MAX, 1),
        ];
        let roster = team(&members);
        let selections: Vec<_> = members.iter().map(|c| brawl(c, 10)).collect();
        let config = BatchConfig::new("Erguer").with_summed_difficulty(i32::MAX);
        let results = run(&roster, &selections, &config, &mut GambiarraLedger::new()).unwrap();
        assert_eq!(results[0].skill_value, i32::MAX);
        assert!(results.iter().all(|r| r.total == i32::MAX));
        assert!(results.iter().all(|r| r.success == Some(true)));
    }

    #[test]
    fn roll_is_clamped_to_d10() {
        let ana = fighter("Ana", 1, 1);
        let roster = team(std::slice::from_ref(&ana));
        let results = run(
            &roster,
            &[brawl(&ana, 14)],
            &BatchConfig::new("Luta"),
            &mut GambiarraLedger::new(),
        )
        .unwrap();
        assert_eq!(results[0].roll, 10);
        let results = run(
            &roster,
            &[brawl(&ana, 0)],
            &BatchConfig::new("Luta"),
            &mut GambiarraLedger::new(),
        )
        .unwrap();
        assert_eq!(results[0].roll, 1);
    }

    #[test]
    fn summed_difficulty_applies_one_verdict() {
        let members = trio();
        let roster = team(&members);
        let selections: Vec<_> = members.iter().map(|c| brawl(c, 3)).collect();

        let pass = BatchConfig::new("Empurrar").with_summed_difficulty(20);
        let results = run(&roster, &selections, &pass, &mut GambiarraLedger::new()).unwrap();
        let totals: Vec<i32> = results.iter().map(|r| r.total).collect();
        assert_eq!(totals, vec![5, 7, 9]);
        assert!(results.iter().all(|r| r.success == Some(true)));

        let fail = BatchConfig::new("Empurrar").with_summed_difficulty(25);
        let results = run(&roster, &selections, &fail, &mut GambiarraLedger::new()).unwrap();
        assert!(results.iter().all(|r| r.success == Some(false)));
    }

    #[test]
    fn global_difficulty_per_character() {
        let members = trio();
        let roster = team(&members);
        let selections: Vec<_> = members.iter().map(|c| brawl(c, 3)).collect();
        let config = BatchConfig::new("Saltar").with_global_difficulty(7);
        let results = run(&roster, &selections, &config, &mut GambiarraLedger::new()).unwrap();
        let verdicts: Vec<_> = results.iter().map(|r| r.success).collect();
        assert_eq!(verdicts, vec![Some(false), Some(true), Some(true)]);
        assert!(results.iter().all(|r| r.global_difficulty == Some(7)));
    }

    #[test]
    fn global_difficulty_overrides_individual() {
        let ana = fighter("Ana", 1, 1);
        let roster = team(std::slice::from_ref(&ana));
        let config = BatchConfig::new("Saltar").with_global_difficulty(20);
        let results = run(
            &roster,
            &[brawl(&ana, 3).with_difficulty(2)],
            &config,
            &mut GambiarraLedger::new(),
        )
        .unwrap();
        assert_eq!(results[0].success, Some(false));
    }

    #[test]
    fn individual_difficulty_or_no_verdict() {
        let members = trio();
        let roster = team(&members);
        let selections = vec![
            brawl(&members[0], 3).with_difficulty(5),
            brawl(&members[1], 3).with_difficulty(8),
            brawl(&members[2], 3),
        ];
        let results = run(
            &roster,
            &selections,
            &BatchConfig::new("Livre"),
            &mut GambiarraLedger::new(),
        )
        .unwrap();
        let verdicts: Vec<_> = results.iter().map(|r| r.success).collect();
        assert_eq!(verdicts, vec![Some(true), Some(false), None]);
    }

    #[test]
    fn gambiarra_succeeds_and_is_excluded_from_sum() {
        let members = trio();
        let roster = team(&members);
        let selections = vec![
            brawl(&members[0], 3),
            CheckSelection::new(members[1].id, Attribute::Intellect).with_gambiarra(),
            brawl(&members[2], 3),
        ];
        let config = BatchConfig::new("Porta").with_summed_difficulty(15);
        let mut ledger = GambiarraLedger::new();
        let results = run(&roster, &selections, &config, &mut ledger).unwrap();

        // 5 + 9 = 14 < 15.
        assert_eq!(results[0].success, Some(false));
        assert_eq!(results[1].success, Some(true));
        assert_eq!(results[1].total, 0);
        assert_eq!(results[1].category, "Gambiarra");
        assert_eq!(results[2].success, Some(false));
        assert!(!ledger.is_available(members[1].id, None));
    }

    #[test]
    fn gambiarra_once_per_encounter() {
        let ana = fighter("Ana", 1, 1);
        let roster = team(std::slice::from_ref(&ana));
        let mut ledger = GambiarraLedger::new();
        let config = BatchConfig::new("Porta");
        let selection = CheckSelection::new(ana.id, Attribute::Intellect).with_gambiarra();

        run(&roster, std::slice::from_ref(&selection), &config, &mut ledger).unwrap();

        let second = BatchRequest {
            id: BatchId(2),
            selections: std::slice::from_ref(&selection),
            config: &config,
            editing: false,
        };
        let err = resolve_batch(&RuleBook::standard(), &roster, &second, &mut ledger, now());
        assert!(matches!(err, Err(RulesError::GambiarraAlreadyUsed(_))));
    }

    #[test]
    fn editing_reopens_the_batch_token() {
        let ana = fighter("Ana", 1, 1);
        let roster = team(std::slice::from_ref(&ana));
        let mut ledger = GambiarraLedger::new();
        let config = BatchConfig::new("Porta");
        let gambiarra = CheckSelection::new(ana.id, Attribute::Intellect).with_gambiarra();
        run(&roster, std::slice::from_ref(&gambiarra), &config, &mut ledger).unwrap();

        // Replacing batch 1 with a regular check gives the token back.
        let edit = [brawl(&ana, 4)];
        let request = BatchRequest {
            id: BatchId(1),
            selections: &edit,
            config: &config,
            editing: true,
        };
        resolve_batch(&RuleBook::standard(), &roster, &request, &mut ledger, now()).unwrap();
        assert!(ledger.is_available(ana.id, None));

        // Re-spending it in the same batch while editing is fine.
        let request = BatchRequest {
            selections: std::slice::from_ref(&gambiarra),
            ..request
        };
        resolve_batch(&RuleBook::standard(), &roster, &request, &mut ledger, now()).unwrap();
        assert_eq!(ledger.consumed_in(ana.id), Some(BatchId(1)));
    }

    #[test]
    fn rejected_batch_leaves_ledger_alone() {
        let members = trio();
        let roster = team(&members);
        let selections = vec![
            CheckSelection::new(members[0].id, Attribute::Intellect).with_gambiarra(),
            CheckSelection::new(members[1].id, Attribute::Strength),
        ];
        let mut ledger = GambiarraLedger::new();
        let err = run(&roster, &selections, &BatchConfig::new("x"), &mut ledger);
        assert!(matches!(err, Err(RulesError::MissingSkill(_))));
        assert!(ledger.is_available(members[0].id, None));
    }

    #[test]
    fn contract_violations() {
        let ana = fighter("Ana", 1, 1);
        let roster = team(std::slice::from_ref(&ana));
        let config = BatchConfig::new("x");
        let mut ledger = GambiarraLedger::new();

        assert!(matches!(
            run(&roster, &[], &config, &mut ledger),
            Err(RulesError::EmptyBatch)
        ));

        let stranger = Character::new("Zeno", Archetype::Human);
        assert!(matches!(
            run(&roster, &[brawl(&stranger, 3)], &config, &mut ledger),
            Err(RulesError::UnknownCharacter(_))
        ));

        assert!(matches!(
            run(&roster, &[brawl(&ana, 3), brawl(&ana, 4)], &config, &mut ledger),
            Err(RulesError::DuplicateSelection(_))
        ));

        let wrong_mode = CheckSelection::new(ana.id, Attribute::Charisma)
            .with_mode(CheckMode::combat())
            .with_skill("Persuasão")
            .with_roll(3);
        assert!(matches!(
            run(&roster, &[wrong_mode], &config, &mut ledger),
            Err(RulesError::SkillNotAllowed { .. })
        ));

        let no_sub = CheckSelection::new(ana.id, Attribute::Intellect)
            .with_skill("Idiomas")
            .with_roll(3);
        assert!(matches!(
            run(&roster, &[no_sub], &config, &mut ledger),
            Err(RulesError::MissingSubSkill(_))
        ));

        let no_roll = CheckSelection::new(ana.id, Attribute::Strength)
            .with_mode(CheckMode::combat())
            .with_skill("Briga");
        assert!(matches!(
            run(&roster, &[no_roll], &config, &mut ledger),
            Err(RulesError::MissingRoll(_))
        ));
    }

    #[test]
    fn specialization_check_uses_sub_skill() {
        let mut iris = Character::new("Íris", Archetype::DivineDescendant);
        iris.set_lineage("Hermes");
        iris.choose_lineage_sub_skill("Condução", "veículos aéreos");
        iris.set_attribute(Attribute::Agility, 3);
        let roster = team(std::slice::from_ref(&iris));
        let selection = CheckSelection::new(iris.id, Attribute::Agility)
            .with_skill("Condução")
            .with_sub_skill("Veiculos Aereos")
            .with_roll(5);
        let results = run(
            &roster,
            &[selection],
            &BatchConfig::new("Perseguição"),
            &mut GambiarraLedger::new(),
        )
        .unwrap();
        assert_eq!(results[0].skill, "Condução (Veiculos Aereos)");
        assert_eq!(results[0].category, "Condução");
        assert_eq!(results[0].skill_value, 0);
        assert_eq!(results[0].total, 8);
    }

    #[test]
    fn terrain_is_tagged_only() {
        let ana = fighter("Ana", 2, 2);
        let roster = team(std::slice::from_ref(&ana));
        let selection = brawl(&ana, 5).with_mode(CheckMode::Combat {
            terrain_advantage: true,
            terrain_disadvantage: true,
        });
        let results = run(
            &roster,
            &[selection],
            &BatchConfig::new("x"),
            &mut GambiarraLedger::new(),
        )
        .unwrap();
        assert!(results[0].terrain_advantage);
        assert!(results[0].terrain_disadvantage);
        assert_eq!(results[0].total, 9);
    }

    #[test]
    fn flavor_follows_verdict() {
        let members = trio();
        let roster = team(&members);
        let selections: Vec<_> = members.iter().map(|c| brawl(c, 3)).collect();
        let config = BatchConfig::new("x")
            .with_global_difficulty(7)
            .with_phrases(FlavorPhrases {
                success: vec!["Boa!".to_string(), "Mandou bem!".to_string()],
                failure: vec!["Quase.".to_string()],
            });
        let results = run(&roster, &selections, &config, &mut GambiarraLedger::new()).unwrap();
        let flavors: Vec<_> = results
            .iter()
            .map(|r| r.flavor.as_ref().map(|f| (f.text.as_str(), f.on_success)))
            .collect();
        assert_eq!(
            flavors,
            vec![
                Some(("Quase.", false)),
                Some(("Mandou bem!", true)),
                Some(("Boa!", true)),
            ]
        );
    }

    proptest::proptest! {
        #[test]
        fn summed_verdict_is_shared(
            rolls in proptest::collection::vec(1i32..=10, 1..4),
            difficulty in 0i32..40,
        ) {
            let members = trio();
            let roster = team(&members);
            let selections: Vec<_> = members
                .iter()
                .zip(&rolls)
                .map(|(c, roll)| brawl(c, *roll))
                .collect();
            let config = BatchConfig::new("x").with_summed_difficulty(difficulty);
            let results = run(&roster, &selections, &config, &mut GambiarraLedger::new()).unwrap();
            let sum: i32 = results.iter().map(|r| r.total).sum();
            for r in &results {
                proptest::prop_assert_eq!(r.success, Some(sum >= difficulty));
            }
        }
    }
}
