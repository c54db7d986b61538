//! Immutable reference data the rules engine reads.
//!
//! A [`Catalog`] holds the skill lists per category and the definition
//! tables for lineages, peculiarities, trejeitos, advantages, and
//! disadvantages. It can be loaded from JSON or built with
//! [`Catalog::standard`]; the engine never mutates it.

pub mod standard;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::character::{Attribute, SkillCategory, SpecializationCategory};
use crate::error::{CoreError, CoreResult};
use crate::normalize::names_match;

/// Skill names per flat category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillLists {
    /// Combat skills.
    pub combat: Vec<String>,
    /// Social skills.
    pub social: Vec<String>,
    /// Utility skills.
    pub utility: Vec<String>,
    /// Complementary skills.
    pub complementary: Vec<String>,
}

impl SkillLists {
    /// Skill names for one category.
    pub fn category(&self, category: SkillCategory) -> &[String] {
        match category {
            SkillCategory::Combat => &self.combat,
            SkillCategory::Social => &self.social,
            SkillCategory::Utility => &self.utility,
            SkillCategory::Complementary => &self.complementary,
        }
    }
}

/// One skill grant of a lineage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageEffect {
    /// A catalogued skill name or a specialization category label.
    pub skill: String,
    /// Bonus added to the skill.
    pub bonus: i32,
    /// Whether the player must name a concrete sub-skill for the bonus.
    #[serde(default)]
    pub requires_choice: bool,
}

/// A divine parent and the skills it grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageDefinition {
    /// Name of the divine parent.
    pub name: String,
    /// Skill grants, in declaration order.
    pub effects: Vec<LineageEffect>,
}

/// A signed change to one skill or specialization category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillDelta {
    /// A catalogued skill name or a specialization category label.
    pub skill: String,
    /// Signed change.
    pub value: i32,
}

/// A peculiarity or trejeito: a named list of skill deltas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitDefinition {
    /// Trait name.
    pub name: String,
    /// Skill deltas, in declaration order.
    pub deltas: Vec<SkillDelta>,
}

/// An advantage or disadvantage: a signed change to one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeModifier {
    /// Advantage or disadvantage name.
    pub name: String,
    /// The attribute it changes.
    pub attribute: Attribute,
    /// Signed change.
    pub delta: i32,
}

/// The full set of reference tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    /// Skill names per flat category.
    pub skills: SkillLists,
    /// Divine lineages.
    pub lineages: Vec<LineageDefinition>,
    /// Peculiarities (positive skill deltas).
    pub peculiarities: Vec<TraitDefinition>,
    /// Trejeitos (negative skill deltas).
    pub trejeitos: Vec<TraitDefinition>,
    /// Advantages (attribute bonuses).
    pub advantages: Vec<AttributeModifier>,
    /// Disadvantages (attribute penalties).
    pub disadvantages: Vec<AttributeModifier>,
}

impl Catalog {
    /// Parse a catalog from a JSON document.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a catalog from a JSON file.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Skill names for one flat category.
    pub fn skills(&self, category: SkillCategory) -> &[String] {
        self.skills.category(category)
    }

    /// The flat category a catalogued skill belongs to, with its canonical name.
    pub fn skill_category(&self, name: &str) -> Option<(SkillCategory, &str)> {
        SkillCategory::ALL.into_iter().find_map(|category| {
            self.skills(category)
                .iter()
                .find(|s| names_match(s, name))
                .map(|s| (category, s.as_str()))
        })
    }

    /// Find a lineage by name.
    pub fn lineage(&self, name: &str) -> Option<&LineageDefinition> {
        self.lineages.iter().find(|l| names_match(&l.name, name))
    }

    /// Find a peculiarity by name.
    pub fn peculiarity(&self, name: &str) -> Option<&TraitDefinition> {
        self.peculiarities.iter().find(|t| names_match(&t.name, name))
    }

    /// Find a trejeito by name.
    pub fn trejeito(&self, name: &str) -> Option<&TraitDefinition> {
        self.trejeitos.iter().find(|t| names_match(&t.name, name))
    }

    /// Find an advantage by name.
    pub fn advantage(&self, name: &str) -> Option<&AttributeModifier> {
        self.advantages.iter().find(|m| names_match(&m.name, name))
    }

    /// Find a disadvantage by name.
    pub fn disadvantage(&self, name: &str) -> Option<&AttributeModifier> {
        self.disadvantages.iter().find(|m| names_match(&m.name, name))
    }

    /// Returns true if the name is a catalogued skill or a specialization label.
    pub fn is_known_skill(&self, name: &str) -> bool {
        self.skill_category(name).is_some() || SpecializationCategory::from_label(name).is_some()
    }
}
