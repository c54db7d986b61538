use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::normalize::{names_match, normalize_name};

/// Unique identifier for every character in a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    /// Generate a new random character ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// What kind of being a character is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    /// Child of a divine parent. The only archetype a lineage applies to.
    DivineDescendant,
    /// An ordinary mortal.
    Human,
    /// A monster or other non-human creature.
    Creature,
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DivineDescendant => write!(f, "Semideus"),
            Self::Human => write!(f, "Humano"),
            Self::Creature => write!(f, "Criatura"),
        }
    }
}

/// One of the eight base attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    /// Força.
    Strength,
    /// Agilidade. Half of base initiative.
    Agility,
    /// Vigor.
    Vigor,
    /// Percepção. Half of base initiative.
    Perception,
    /// Intelecto.
    Intellect,
    /// Sabedoria.
    Wisdom,
    /// Carisma.
    Charisma,
    /// Vontade.
    Willpower,
}

impl Attribute {
    /// All attributes in sheet order.
    pub const ALL: [Attribute; 8] = [
        Self::Strength,
        Self::Agility,
        Self::Vigor,
        Self::Perception,
        Self::Intellect,
        Self::Wisdom,
        Self::Charisma,
        Self::Willpower,
    ];

    /// Display label used on the sheet.
    pub fn label(self) -> &'static str {
        match self {
            Self::Strength => "Força",
            Self::Agility => "Agilidade",
            Self::Vigor => "Vigor",
            Self::Perception => "Percepção",
            Self::Intellect => "Intelecto",
            Self::Wisdom => "Sabedoria",
            Self::Charisma => "Carisma",
            Self::Willpower => "Vontade",
        }
    }

    /// Parse an attribute from its sheet label or its snake_case key.
    pub fn from_label(label: &str) -> CoreResult<Self> {
        Self::ALL
            .into_iter()
            .find(|a| names_match(a.label(), label) || names_match(a.key(), label))
            .ok_or_else(|| CoreError::UnknownLabel(label.to_string()))
    }

    fn key(self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Agility => "agility",
            Self::Vigor => "vigor",
            Self::Perception => "perception",
            Self::Intellect => "intellect",
            Self::Wisdom => "wisdom",
            Self::Charisma => "charisma",
            Self::Willpower => "willpower",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The eight base attribute scores.
///
/// Conventionally 1 to 5, but nothing here enforces a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attributes {
    /// Força.
    pub strength: i32,
    /// Agilidade.
    pub agility: i32,
    /// Vigor.
    pub vigor: i32,
    /// Percepção.
    pub perception: i32,
    /// Intelecto.
    pub intellect: i32,
    /// Sabedoria.
    pub wisdom: i32,
    /// Carisma.
    pub charisma: i32,
    /// Vontade.
    pub willpower: i32,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            strength: 1,
            agility: 1,
            vigor: 1,
            perception: 1,
            intellect: 1,
            wisdom: 1,
            charisma: 1,
            willpower: 1,
        }
    }
}

impl Attributes {
    /// Read one attribute score.
    pub fn get(&self, attribute: Attribute) -> i32 {
        match attribute {
            Attribute::Strength => self.strength,
            Attribute::Agility => self.agility,
            Attribute::Vigor => self.vigor,
            Attribute::Perception => self.perception,
            Attribute::Intellect => self.intellect,
            Attribute::Wisdom => self.wisdom,
            Attribute::Charisma => self.charisma,
            Attribute::Willpower => self.willpower,
        }
    }

    /// Overwrite one attribute score.
    pub fn set(&mut self, attribute: Attribute, value: i32) {
        let slot = match attribute {
            Attribute::Strength => &mut self.strength,
            Attribute::Agility => &mut self.agility,
            Attribute::Vigor => &mut self.vigor,
            Attribute::Perception => &mut self.perception,
            Attribute::Intellect => &mut self.intellect,
            Attribute::Wisdom => &mut self.wisdom,
            Attribute::Charisma => &mut self.charisma,
            Attribute::Willpower => &mut self.willpower,
        };
        *slot = value;
    }
}

/// The four catalogued skill lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    /// Combate.
    Combat,
    /// Social.
    Social,
    /// Utilidade.
    Utility,
    /// Complementar.
    Complementary,
}

impl SkillCategory {
    /// All flat categories in sheet order.
    pub const ALL: [SkillCategory; 4] = [
        Self::Combat,
        Self::Social,
        Self::Utility,
        Self::Complementary,
    ];

    /// Display label used on the sheet.
    pub fn label(self) -> &'static str {
        match self {
            Self::Combat => "Combate",
            Self::Social => "Social",
            Self::Utility => "Utilidade",
            Self::Complementary => "Complementar",
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The six specialization groups whose members are free-form sub-skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecializationCategory {
    /// Idiomas.
    Languages,
    /// Artes.
    Arts,
    /// Conhecimento.
    Knowledge,
    /// Condução.
    Driving,
    /// Ofícios.
    Crafts,
    /// Esportes.
    Sports,
}

impl SpecializationCategory {
    /// All specialization categories in sheet order.
    pub const ALL: [SpecializationCategory; 6] = [
        Self::Languages,
        Self::Arts,
        Self::Knowledge,
        Self::Driving,
        Self::Crafts,
        Self::Sports,
    ];

    /// Display label used on the sheet and in trait definitions.
    pub fn label(self) -> &'static str {
        match self {
            Self::Languages => "Idiomas",
            Self::Arts => "Artes",
            Self::Knowledge => "Conhecimento",
            Self::Driving => "Condução",
            Self::Crafts => "Ofícios",
            Self::Sports => "Esportes",
        }
    }

    fn key(self) -> &'static str {
        match self {
            Self::Languages => "languages",
            Self::Arts => "arts",
            Self::Knowledge => "knowledge",
            Self::Driving => "driving",
            Self::Crafts => "crafts",
            Self::Sports => "sports",
        }
    }

    /// Find the category a display label (or snake_case key) names.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| names_match(c.label(), label) || names_match(c.key(), label))
    }
}

impl fmt::Display for SpecializationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Skill ranks by category, plus the powers and combat styles namespaces.
///
/// A rank of 0 means the skill is not possessed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillSheet {
    /// Combat skill ranks.
    pub combat: BTreeMap<String, u32>,
    /// Social skill ranks.
    pub social: BTreeMap<String, u32>,
    /// Utility skill ranks.
    pub utility: BTreeMap<String, u32>,
    /// Complementary skill ranks.
    pub complementary: BTreeMap<String, u32>,
    /// Power ranks.
    pub powers: BTreeMap<String, u32>,
    /// Combat style ranks.
    pub styles: BTreeMap<String, u32>,
}

impl SkillSheet {
    /// Ranks for one flat category.
    pub fn category(&self, category: SkillCategory) -> &BTreeMap<String, u32> {
        match category {
            SkillCategory::Combat => &self.combat,
            SkillCategory::Social => &self.social,
            SkillCategory::Utility => &self.utility,
            SkillCategory::Complementary => &self.complementary,
        }
    }

    /// Mutable ranks for one flat category.
    pub fn category_mut(&mut self, category: SkillCategory) -> &mut BTreeMap<String, u32> {
        match category {
            SkillCategory::Combat => &mut self.combat,
            SkillCategory::Social => &mut self.social,
            SkillCategory::Utility => &mut self.utility,
            SkillCategory::Complementary => &mut self.complementary,
        }
    }
}

/// Free-form sub-skill ranks for each specialization category.
///
/// Keys keep the text the player typed; lookups normalize both sides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Specializations {
    /// Idiomas.
    pub languages: BTreeMap<String, u32>,
    /// Artes.
    pub arts: BTreeMap<String, u32>,
    /// Conhecimento.
    pub knowledge: BTreeMap<String, u32>,
    /// Condução.
    pub driving: BTreeMap<String, u32>,
    /// Ofícios.
    pub crafts: BTreeMap<String, u32>,
    /// Esportes.
    pub sports: BTreeMap<String, u32>,
}

impl Specializations {
    /// Sub-skill ranks for one category.
    pub fn category(&self, category: SpecializationCategory) -> &BTreeMap<String, u32> {
        match category {
            SpecializationCategory::Languages => &self.languages,
            SpecializationCategory::Arts => &self.arts,
            SpecializationCategory::Knowledge => &self.knowledge,
            SpecializationCategory::Driving => &self.driving,
            SpecializationCategory::Crafts => &self.crafts,
            SpecializationCategory::Sports => &self.sports,
        }
    }

    /// Mutable sub-skill ranks for one category.
    pub fn category_mut(
        &mut self,
        category: SpecializationCategory,
    ) -> &mut BTreeMap<String, u32> {
        match category {
            SpecializationCategory::Languages => &mut self.languages,
            SpecializationCategory::Arts => &mut self.arts,
            SpecializationCategory::Knowledge => &mut self.knowledge,
            SpecializationCategory::Driving => &mut self.driving,
            SpecializationCategory::Crafts => &mut self.crafts,
            SpecializationCategory::Sports => &mut self.sports,
        }
    }
}

/// A character's raw build: everything the player selected, nothing derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Unique identifier. Generated when absent from a document.
    #[serde(default)]
    pub id: CharacterId,
    /// Display name.
    pub name: String,
    /// What kind of being this is.
    pub archetype: Archetype,
    /// Base attribute scores.
    #[serde(default)]
    pub attributes: Attributes,
    /// Divine parent, meaningful only for divine descendants.
    #[serde(default)]
    pub lineage: Option<String>,
    /// Skill ranks.
    #[serde(default)]
    pub skills: SkillSheet,
    /// Specialization sub-skill ranks.
    #[serde(default)]
    pub specializations: Specializations,
    /// Selected advantage names.
    #[serde(default)]
    pub advantages: Vec<String>,
    /// Selected disadvantage names.
    #[serde(default)]
    pub disadvantages: Vec<String>,
    /// Selected peculiarity names, in selection order.
    #[serde(default)]
    pub peculiarities: Vec<String>,
    /// Selected trejeito names, in selection order.
    #[serde(default)]
    pub trejeitos: Vec<String>,
    /// Player-chosen sub-skill text, keyed by the lineage effect's skill name.
    #[serde(default)]
    pub lineage_choices: BTreeMap<String, String>,
}

impl Character {
    /// Create a character with default attributes and no selections.
    pub fn new(name: impl Into<String>, archetype: Archetype) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            archetype,
            attributes: Attributes::default(),
            lineage: None,
            skills: SkillSheet::default(),
            specializations: Specializations::default(),
            advantages: Vec::new(),
            disadvantages: Vec::new(),
            peculiarities: Vec::new(),
            trejeitos: Vec::new(),
            lineage_choices: BTreeMap::new(),
        }
    }

    /// Set a base attribute score.
    pub fn set_attribute(&mut self, attribute: Attribute, value: i32) {
        self.attributes.set(attribute, value);
    }

    /// Set the rank of a catalogued skill.
    pub fn set_skill(&mut self, category: SkillCategory, name: impl Into<String>, rank: u32) {
        self.skills.category_mut(category).insert(name.into(), rank);
    }

    /// Set the rank of a power.
    pub fn set_power(&mut self, name: impl Into<String>, rank: u32) {
        self.skills.powers.insert(name.into(), rank);
    }

    /// Set the rank of a combat style.
    pub fn set_style(&mut self, name: impl Into<String>, rank: u32) {
        self.skills.styles.insert(name.into(), rank);
    }

    /// Set the rank of a specialization sub-skill.
    ///
    /// An existing key that normalizes to the same name is replaced, so
    /// "Inglês" and "ingles" never coexist.
    pub fn set_specialization(
        &mut self,
        category: SpecializationCategory,
        name: impl Into<String>,
        rank: u32,
    ) {
        let name = name.into();
        let map = self.specializations.category_mut(category);
        map.retain(|key, _| !names_match(key, &name));
        map.insert(name, rank);
    }

    /// Select the divine parent.
    pub fn set_lineage(&mut self, lineage: impl Into<String>) {
        self.lineage = Some(lineage.into());
    }

    /// Record the sub-skill the player chose for a lineage effect.
    pub fn choose_lineage_sub_skill(
        &mut self,
        effect_skill: impl Into<String>,
        sub_skill: impl Into<String>,
    ) {
        let effect_skill = effect_skill.into();
        self.lineage_choices
            .retain(|key, _| !names_match(key, &effect_skill));
        self.lineage_choices.insert(effect_skill, sub_skill.into());
    }

    /// The sub-skill text chosen for a lineage effect, if any.
    pub fn lineage_choice(&self, effect_skill: &str) -> Option<&str> {
        self.lineage_choices
            .iter()
            .find(|(key, _)| names_match(key, effect_skill))
            .map(|(_, v)| v.as_str())
    }

    /// Select a peculiarity. Returns false if it was already selected.
    pub fn select_peculiarity(&mut self, name: impl Into<String>) -> bool {
        push_unique(&mut self.peculiarities, name.into())
    }

    /// Select a trejeito. Returns false if it was already selected.
    pub fn select_trejeito(&mut self, name: impl Into<String>) -> bool {
        push_unique(&mut self.trejeitos, name.into())
    }

    /// Select an advantage. Returns false if it was already selected.
    pub fn select_advantage(&mut self, name: impl Into<String>) -> bool {
        push_unique(&mut self.advantages, name.into())
    }

    /// Select a disadvantage. Returns false if it was already selected.
    pub fn select_disadvantage(&mut self, name: impl Into<String>) -> bool {
        push_unique(&mut self.disadvantages, name.into())
    }

    /// Rank of a skill in one of the four catalogued categories.
    pub fn flat_rank(&self, name: &str) -> Option<u32> {
        SkillCategory::ALL
            .into_iter()
            .find_map(|c| find_rank(self.skills.category(c), name))
    }

    /// Rank of a power or combat style.
    pub fn power_or_style_rank(&self, name: &str) -> Option<u32> {
        find_rank(&self.skills.powers, name).or_else(|| find_rank(&self.skills.styles, name))
    }
}

/// Look up a rank by normalized name.
fn find_rank(map: &BTreeMap<String, u32>, name: &str) -> Option<u32> {
    let wanted = normalize_name(name);
    map.iter()
        .find(|(key, _)| normalize_name(key) == wanted)
        .map(|(_, rank)| *rank)
}

fn push_unique(list: &mut Vec<String>, name: String) -> bool {
    if list.iter().any(|n| names_match(n, &name)) {
        return false;
    }
    list.push(name);
    true
}
