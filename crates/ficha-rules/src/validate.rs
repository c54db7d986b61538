//! Consistency checks for catalogs and character builds.
//!
//! Nothing here blocks valuation; an invalid build still values with its
//! unknown names ignored. The issues are for the caller to show the user.

use std::collections::BTreeSet;

use ficha_core::{
    Archetype, Catalog, Character, SkillCategory, SpecializationCategory, normalize_name,
};

/// A warning or error found during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// What the issue was found on, e.g. "catalog" or a character name.
    pub entity: String,
    /// A human-readable description of the issue.
    pub message: String,
    /// Whether this is an error (true) or a warning (false).
    pub is_error: bool,
}

impl ValidationIssue {
    fn error(entity: &str, message: String) -> Self {
        Self {
            entity: entity.to_string(),
            message,
            is_error: true,
        }
    }

    fn warning(entity: &str, message: String) -> Self {
        Self {
            entity: entity.to_string(),
            message,
            is_error: false,
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = if self.is_error { "error" } else { "warning" };
        write!(f, "{level}: {}: {}", self.entity, self.message)
    }
}

/// Validate reference data.
pub fn validate_catalog(catalog: &Catalog) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let mut skills = BTreeSet::new();
    for category in SkillCategory::ALL {
        let list = catalog.skills(category);
        if list.is_empty() {
            issues.push(ValidationIssue::warning(
                "catalog",
                format!("no {} skills defined", category.label()),
            ));
        }
        for name in list {
            if !skills.insert(normalize_name(name)) {
                issues.push(ValidationIssue::error(
                    "catalog",
                    format!("skill '{name}' is listed more than once"),
                ));
            }
            if SpecializationCategory::from_label(name).is_some() {
                issues.push(ValidationIssue::error(
                    "catalog",
                    format!("skill '{name}' shadows a specialization category"),
                ));
            }
        }
    }

    check_unique(
        "lineage",
        catalog.lineages.iter().map(|l| l.name.as_str()),
        &mut issues,
    );
    check_unique(
        "peculiarity",
        catalog.peculiarities.iter().map(|p| p.name.as_str()),
        &mut issues,
    );
    check_unique(
        "trejeito",
        catalog.trejeitos.iter().map(|t| t.name.as_str()),
        &mut issues,
    );
    check_unique(
        "advantage",
        catalog.advantages.iter().map(|a| a.name.as_str()),
        &mut issues,
    );
    check_unique(
        "disadvantage",
        catalog.disadvantages.iter().map(|d| d.name.as_str()),
        &mut issues,
    );

    for lineage in &catalog.lineages {
        let entity = format!("lineage '{}'", lineage.name);
        for effect in &lineage.effects {
            let is_label = SpecializationCategory::from_label(&effect.skill).is_some();
            if effect.requires_choice && !is_label {
                issues.push(ValidationIssue::error(
                    &entity,
                    format!(
                        "'{}' asks for a sub-skill but is not a specialization category",
                        effect.skill
                    ),
                ));
            } else if !catalog.is_known_skill(&effect.skill) {
                issues.push(ValidationIssue::warning(
                    &entity,
                    format!("bonus to unknown skill '{}'", effect.skill),
                ));
            }
        }
    }

    for (kind, traits) in [
        ("peculiarity", &catalog.peculiarities),
        ("trejeito", &catalog.trejeitos),
    ] {
        for definition in traits {
            let entity = format!("{kind} '{}'", definition.name);
            for delta in &definition.deltas {
                if !catalog.is_known_skill(&delta.skill) {
                    issues.push(ValidationIssue::warning(
                        &entity,
                        format!("delta on unknown skill '{}'", delta.skill),
                    ));
                }
            }
        }
    }

    issues
}

fn check_unique<'a>(
    kind: &str,
    names: impl Iterator<Item = &'a str>,
    issues: &mut Vec<ValidationIssue>,
) {
    let mut seen = BTreeSet::new();
    for name in names {
        if !seen.insert(normalize_name(name)) {
            issues.push(ValidationIssue::error(
                "catalog",
                format!("{kind} '{name}' is defined more than once"),
            ));
        }
    }
}

/// Validate a character build against a catalog.
///
/// Unknown selections are errors. A lineage bonus still waiting for its
/// sub-skill text is a warning: the bonus is simply not granted yet.
pub fn validate_character(catalog: &Catalog, character: &Character) -> Vec<ValidationIssue> {
    let entity = character.name.as_str();
    let mut issues = Vec::new();

    let selections = [
        ("peculiarity", &character.peculiarities),
        ("trejeito", &character.trejeitos),
        ("advantage", &character.advantages),
        ("disadvantage", &character.disadvantages),
    ];
    for (kind, names) in selections {
        for name in names {
            let known = match kind {
                "peculiarity" => catalog.peculiarity(name).is_some(),
                "trejeito" => catalog.trejeito(name).is_some(),
                "advantage" => catalog.advantage(name).is_some(),
                _ => catalog.disadvantage(name).is_some(),
            };
            if !known {
                issues.push(ValidationIssue::error(entity, format!("unknown {kind} '{name}'")));
            }
        }
    }

    for category in SkillCategory::ALL {
        for name in character.skills.category(category).keys() {
            let listed = catalog
                .skill_category(name)
                .is_some_and(|(found, _)| found == category);
            if !listed {
                issues.push(ValidationIssue::warning(
                    entity,
                    format!("'{name}' is not a {} skill", category.label()),
                ));
            }
        }
    }

    match (character.archetype, character.lineage.as_deref()) {
        (Archetype::DivineDescendant, None) => {
            issues.push(ValidationIssue::warning(
                entity,
                "divine descendant without a lineage".to_string(),
            ));
        }
        (Archetype::DivineDescendant, Some(name)) => match catalog.lineage(name) {
            None => issues.push(ValidationIssue::error(entity, format!("unknown lineage '{name}'"))),
            Some(lineage) => {
                for effect in lineage.effects.iter().filter(|e| e.requires_choice) {
                    let chosen = character
                        .lineage_choice(&effect.skill)
                        .is_some_and(|text| !text.trim().is_empty());
                    if !chosen {
                        issues.push(ValidationIssue::warning(
                            entity,
                            format!(
                                "{} bonus to {} is waiting for a sub-skill choice",
                                lineage.name, effect.skill
                            ),
                        ));
                    }
                }
            }
        },
        (archetype, Some(name)) => {
            issues.push(ValidationIssue::warning(
                entity,
                format!("lineage '{name}' has no effect on a {archetype}"),
            ));
        }
        (_, None) => {}
    }

    issues
}
