//! JSON input files for the encounter commands.
//!
//! Encounter files name characters by display name; selections and
//! initiative entries are resolved to character IDs against the rosters.

use std::path::Path;

use ficha_core::{Attribute, CharacterId, names_match};
use ficha_rules::{BatchConfig, CheckMode, CheckSelection, Encounter, InitiativeRequest, Team};
use serde::Deserialize;

/// An encounter: two teams, initiative rolls, and check batches.
#[derive(Debug, Deserialize)]
pub struct EncounterFile {
    pub teams: Vec<Team>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub initiative: Vec<InitiativeEntry>,
    #[serde(default)]
    pub batches: Vec<BatchFile>,
}

#[derive(Debug, Deserialize)]
pub struct InitiativeEntry {
    pub character: String,
    #[serde(default)]
    pub roll: Option<i32>,
    #[serde(default)]
    pub courage: bool,
    #[serde(default)]
    pub cowardice: bool,
}

#[derive(Debug, Deserialize)]
pub struct BatchFile {
    #[serde(flatten)]
    pub config: BatchConfig,
    pub selections: Vec<SelectionEntry>,
}

#[derive(Debug, Deserialize)]
pub struct SelectionEntry {
    pub character: String,
    #[serde(default)]
    pub mode: CheckMode,
    #[serde(default)]
    pub skill: Option<String>,
    #[serde(default)]
    pub sub_skill: Option<String>,
    pub attribute: String,
    #[serde(default)]
    pub roll: Option<i32>,
    #[serde(default)]
    pub difficulty: Option<i32>,
    #[serde(default)]
    pub gambiarra: bool,
}

impl EncounterFile {
    pub fn load(path: &Path) -> Result<Self, String> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        serde_json::from_str(&json).map_err(|e| format!("invalid encounter {}: {e}", path.display()))
    }

    /// Split into the encounter state and the requests to run against it.
    pub fn into_parts(
        self,
        default_seed: u64,
    ) -> Result<(Encounter, Vec<InitiativeEntry>, Vec<BatchFile>), String> {
        let [first, second]: [Team; 2] = self
            .teams
            .try_into()
            .map_err(|teams: Vec<Team>| format!("an encounter needs exactly 2 teams, found {}", teams.len()))?;
        let encounter = Encounter::new(first, second, self.seed.unwrap_or(default_seed));
        Ok((encounter, self.initiative, self.batches))
    }
}

impl InitiativeEntry {
    pub fn to_request(&self, encounter: &Encounter) -> Result<InitiativeRequest, String> {
        Ok(InitiativeRequest {
            character_id: find_character(encounter, &self.character)?,
            roll: self.roll,
            courage: self.courage,
            cowardice: self.cowardice,
        })
    }
}

impl SelectionEntry {
    pub fn to_selection(&self, encounter: &Encounter) -> Result<CheckSelection, String> {
        let attribute = Attribute::from_label(&self.attribute).map_err(|e| e.to_string())?;
        Ok(CheckSelection {
            character_id: find_character(encounter, &self.character)?,
            mode: self.mode,
            skill: self.skill.clone(),
            sub_skill: self.sub_skill.clone(),
            attribute,
            roll: self.roll,
            difficulty: self.difficulty,
            gambiarra: self.gambiarra,
        })
    }
}

fn find_character(encounter: &Encounter, name: &str) -> Result<CharacterId, String> {
    encounter
        .teams()
        .iter()
        .flat_map(|t| t.members.iter())
        .find(|c| names_match(&c.name, name))
        .map(|c| c.id)
        .ok_or_else(|| format!("no character named '{name}' in this encounter"))
}
