//! Skill checks: selections, batch configuration, and results.
//!
//! A batch groups one check per selected character. Each check is skill
//! value plus attribute value plus a d10, compared against the batch's
//! global difficulty, summed or per character, or against the character's
//! own difficulty. A gambiarra skips the arithmetic and succeeds outright,
//! at most once per character per encounter.

pub mod ledger;
pub mod resolver;

pub use ledger::GambiarraLedger;
pub use resolver::resolve_batch;

use chrono::{DateTime, Utc};
use ficha_core::{
    Attribute, Catalog, Character, CharacterId, SkillCategory, SpecializationCategory, names_match,
};
use serde::{Deserialize, Serialize};

/// Identifies a test batch within an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BatchId(pub u32);

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether a check is rolled in combat, and the terrain tags if so.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckMode {
    /// A combat check. Terrain flags are recorded, never applied as numbers.
    Combat {
        /// The character holds favorable terrain.
        #[serde(default)]
        terrain_advantage: bool,
        /// The character is on unfavorable terrain.
        #[serde(default)]
        terrain_disadvantage: bool,
    },
    /// Any check outside combat.
    #[default]
    NonCombat,
}

impl CheckMode {
    /// A combat check with no terrain tags.
    pub fn combat() -> Self {
        Self::Combat {
            terrain_advantage: false,
            terrain_disadvantage: false,
        }
    }

    /// Returns true for combat checks.
    pub fn is_combat(self) -> bool {
        matches!(self, Self::Combat { .. })
    }

    /// The terrain advantage tag (always false outside combat).
    pub fn terrain_advantage(self) -> bool {
        matches!(self, Self::Combat { terrain_advantage: true, .. })
    }

    /// The terrain disadvantage tag (always false outside combat).
    pub fn terrain_disadvantage(self) -> bool {
        matches!(self, Self::Combat { terrain_disadvantage: true, .. })
    }
}

impl std::fmt::Display for CheckMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_combat() {
            write!(f, "combat")
        } else {
            write!(f, "non-combat")
        }
    }
}

/// One character's row in a check batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSelection {
    /// The character rolling.
    pub character_id: CharacterId,
    /// Combat or not.
    #[serde(default)]
    pub mode: CheckMode,
    /// Skill name or specialization category label.
    #[serde(default)]
    pub skill: Option<String>,
    /// Sub-skill text for a specialization category.
    #[serde(default)]
    pub sub_skill: Option<String>,
    /// Attribute added to the check.
    pub attribute: Attribute,
    /// The d10 result. Clamped to 1..=10 when resolved.
    #[serde(default)]
    pub roll: Option<i32>,
    /// This character's own difficulty.
    #[serde(default)]
    pub difficulty: Option<i32>,
    /// Spend the character's gambiarra on this check.
    #[serde(default)]
    pub gambiarra: bool,
}

impl CheckSelection {
    /// A non-combat selection with no skill chosen yet.
    pub fn new(character_id: CharacterId, attribute: Attribute) -> Self {
        Self {
            character_id,
            mode: CheckMode::NonCombat,
            skill: None,
            sub_skill: None,
            attribute,
            roll: None,
            difficulty: None,
            gambiarra: false,
        }
    }

    /// Set the mode.
    pub fn with_mode(mut self, mode: CheckMode) -> Self {
        self.set_mode(mode);
        self
    }

    /// Set the skill.
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skill = Some(skill.into());
        self
    }

    /// Set the sub-skill text.
    pub fn with_sub_skill(mut self, sub_skill: impl Into<String>) -> Self {
        self.sub_skill = Some(sub_skill.into());
        self
    }

    /// Set the die roll.
    pub fn with_roll(mut self, roll: i32) -> Self {
        self.roll = Some(roll);
        self
    }

    /// Set the individual difficulty.
    pub fn with_difficulty(mut self, difficulty: i32) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Flag the check as a gambiarra.
    pub fn with_gambiarra(mut self) -> Self {
        self.gambiarra = true;
        self
    }

    /// Change the mode.
    ///
    /// Switching between combat and non-combat clears the chosen skill and
    /// sub-skill, since the two modes offer different skills. Changing only
    /// the terrain tags keeps them.
    pub fn set_mode(&mut self, mode: CheckMode) {
        if self.mode.is_combat() != mode.is_combat() {
            self.skill = None;
            self.sub_skill = None;
        }
        self.mode = mode;
    }

    /// The non-blank sub-skill text, trimmed.
    pub fn sub_skill_text(&self) -> Option<&str> {
        self.sub_skill.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Skill name with any sub-skill suffix, e.g. "Condução (veículos aéreos)".
    pub fn display_skill(&self) -> String {
        let skill = self.skill.as_deref().map(str::trim).unwrap_or_default();
        match self.sub_skill_text() {
            Some(sub) if !skill.is_empty() => format!("{skill} ({sub})"),
            _ => skill.to_string(),
        }
    }
}

/// A character taking part in checks, tagged with their team.
#[derive(Debug, Clone, Copy)]
pub struct Combatant<'a> {
    /// The character.
    pub character: &'a Character,
    /// Team display name.
    pub team: &'a str,
}

/// Flavor phrases a batch hands out with its verdicts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorPhrases {
    /// Phrases for successes.
    #[serde(default)]
    pub success: Vec<String>,
    /// Phrases for failures.
    #[serde(default)]
    pub failure: Vec<String>,
}

impl FlavorPhrases {
    /// The phrase for a verdict at a position in the batch.
    pub fn pick(&self, success: bool, index: usize) -> Option<Flavor> {
        let list = if success { &self.success } else { &self.failure };
        if list.is_empty() {
            return None;
        }
        Some(Flavor {
            text: list[index % list.len()].clone(),
            on_success: success,
        })
    }
}

/// A flavor phrase attached to a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flavor {
    /// The phrase.
    pub text: String,
    /// Whether the phrase belongs to a success.
    pub on_success: bool,
}

/// Settings shared by every check in a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Batch display name.
    #[serde(default)]
    pub name: String,
    /// One difficulty for the whole batch.
    #[serde(default)]
    pub global_difficulty: Option<i32>,
    /// Compare the sum of all totals against the global difficulty.
    #[serde(default)]
    pub summed: bool,
    /// Custom phrase set.
    #[serde(default)]
    pub phrases: FlavorPhrases,
}

impl BatchConfig {
    /// An unnamed batch with no difficulty.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set a global difficulty, compared per character.
    pub fn with_global_difficulty(mut self, difficulty: i32) -> Self {
        self.global_difficulty = Some(difficulty);
        self.summed = false;
        self
    }

    /// Set a global difficulty, compared against the summed totals.
    pub fn with_summed_difficulty(mut self, difficulty: i32) -> Self {
        self.global_difficulty = Some(difficulty);
        self.summed = true;
        self
    }

    /// Set the flavor phrases.
    pub fn with_phrases(mut self, phrases: FlavorPhrases) -> Self {
        self.phrases = phrases;
        self
    }
}

/// Everything the resolver needs to produce one batch.
#[derive(Debug, Clone, Copy)]
pub struct BatchRequest<'a> {
    /// The batch being created or replaced.
    pub id: BatchId,
    /// One selection per character.
    pub selections: &'a [CheckSelection],
    /// Shared settings.
    pub config: &'a BatchConfig,
    /// True when this request replaces an existing batch.
    pub editing: bool,
}

/// The outcome of one character's check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCheckResult {
    /// The character's ID.
    pub character_id: CharacterId,
    /// Display name.
    pub name: String,
    /// Team display name.
    pub team: String,
    /// Category label of the skill, e.g. "Social" or "Condução".
    pub category: String,
    /// Skill display name with any sub-skill suffix.
    pub skill: String,
    /// The attribute added.
    pub attribute: Attribute,
    /// Effective skill value.
    pub skill_value: i32,
    /// Effective attribute value.
    pub attribute_value: i32,
    /// Clamped die roll.
    pub roll: i32,
    /// Skill plus attribute plus roll. Zero for a gambiarra.
    pub total: i32,
    /// When the check was resolved.
    pub at: DateTime<Utc>,
    /// Rolled in combat.
    pub combat: bool,
    /// The character's own difficulty.
    pub difficulty: Option<i32>,
    /// The batch's global difficulty.
    pub global_difficulty: Option<i32>,
    /// Pass or fail; `None` when no difficulty applied.
    pub success: Option<bool>,
    /// Flavor phrase for the verdict.
    pub flavor: Option<Flavor>,
    /// Resolved by gambiarra.
    pub gambiarra: bool,
    /// Terrain advantage tag.
    pub terrain_advantage: bool,
    /// Terrain disadvantage tag.
    pub terrain_disadvantage: bool,
}

/// Group label for the skill a selection names.
pub(crate) fn skill_group(catalog: &Catalog, character: &Character, skill: &str) -> String {
    if let Some(category) = SpecializationCategory::from_label(skill) {
        return category.label().to_string();
    }
    if let Some((category, _)) = catalog.skill_category(skill) {
        return category.label().to_string();
    }
    if character.skills.powers.keys().any(|k| names_match(k, skill)) {
        return "Poderes".to_string();
    }
    if character.skills.styles.keys().any(|k| names_match(k, skill)) {
        return "Estilos".to_string();
    }
    "Outros".to_string()
}

/// The skills a character may pick in a mode.
///
/// Combat offers the combat list plus the character's own powers and
/// styles. Everything else offers the social, utility, and complementary
/// lists plus the six specialization labels.
pub fn selectable_skills(catalog: &Catalog, character: &Character, mode: CheckMode) -> Vec<String> {
    if mode.is_combat() {
        catalog
            .skills(SkillCategory::Combat)
            .iter()
            .chain(character.skills.powers.keys())
            .chain(character.skills.styles.keys())
            .cloned()
            .collect()
    } else {
        [SkillCategory::Social, SkillCategory::Utility, SkillCategory::Complementary]
            .into_iter()
            .flat_map(|c| catalog.skills(c).iter().cloned())
            .chain(SpecializationCategory::ALL.into_iter().map(|c| c.label().to_string()))
            .collect()
    }
}
