//! Encounter state: two teams, numbered rounds, and the gambiarra ledger.
//!
//! Each round owns its own initiative list and its own test batches; nothing
//! derived is shared between rounds. The ledger lives on the encounter
//! because a gambiarra is once per encounter, not once per round.

use chrono::{DateTime, Utc};
use ficha_core::{Character, CharacterId};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::check::{
    BatchConfig, BatchId, BatchRequest, CheckSelection, Combatant, GambiarraLedger,
    SkillCheckResult, resolve_batch,
};
use crate::error::{RulesError, RulesResult};
use crate::initiative::{InitiativeInput, InitiativeResult, compute_order};
use crate::rulebook::RuleBook;

/// A named side of the encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Display name.
    pub name: String,
    /// The team's characters.
    #[serde(default)]
    pub members: Vec<Character>,
}

impl Team {
    /// Create a team.
    pub fn new(name: impl Into<String>, members: Vec<Character>) -> Self {
        Self {
            name: name.into(),
            members,
        }
    }
}

/// A resolved, named group of checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestBatch {
    /// Encounter-wide batch id.
    pub id: BatchId,
    /// Display name.
    pub name: String,
    /// Resolved in summed mode.
    pub summed: bool,
    /// The global difficulty, if any.
    pub global_difficulty: Option<i32>,
    /// One result per selected character.
    pub results: Vec<SkillCheckResult>,
    /// When the batch was first created.
    pub created_at: DateTime<Utc>,
}

impl TestBatch {
    /// Sum of every non-gambiarra total.
    pub fn sum(&self) -> i32 {
        self.results
            .iter()
            .filter(|r| !r.gambiarra)
            .map(|r| r.total)
            .fold(0, i32::saturating_add)
    }
}

/// One round of the encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based round number.
    pub number: u32,
    /// Initiative order, empty until rolled.
    pub initiative: Vec<InitiativeResult>,
    /// Test batches in creation order.
    pub batches: Vec<TestBatch>,
}

/// One character's initiative roll and perk toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeRequest {
    /// The character.
    pub character_id: CharacterId,
    /// The d20 result; rolled for them if absent.
    #[serde(default)]
    pub roll: Option<i32>,
    /// Courage perk toggled on.
    #[serde(default)]
    pub courage: bool,
    /// Cowardice hindrance toggled on.
    #[serde(default)]
    pub cowardice: bool,
}

impl InitiativeRequest {
    /// A request with a typed-in roll and no perks.
    pub fn rolled(character_id: CharacterId, roll: i32) -> Self {
        Self {
            character_id,
            roll: Some(roll),
            courage: false,
            cowardice: false,
        }
    }
}

/// The state of an encounter.
#[derive(Debug, Clone)]
pub struct Encounter {
    teams: [Team; 2],
    rounds: Vec<Round>,
    ledger: GambiarraLedger,
    next_batch: u32,
    rng: StdRng,
}

impl Encounter {
    /// Start an encounter between two teams.
    ///
    /// `seed` drives every die the encounter rolls for players who did not
    /// type one in.
    pub fn new(first: Team, second: Team, seed: u64) -> Self {
        Self {
            teams: [first, second],
            rounds: Vec::new(),
            ledger: GambiarraLedger::new(),
            next_batch: 1,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Both teams.
    pub fn teams(&self) -> &[Team; 2] {
        &self.teams
    }

    /// Look up a team by name.
    pub fn team(&self, name: &str) -> RulesResult<&Team> {
        self.teams
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| RulesError::UnknownTeam(name.to_string()))
    }

    /// Look up a character on either team by ID.
    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.teams
            .iter()
            .flat_map(|t| t.members.iter())
            .find(|c| c.id == id)
    }

    /// All rounds so far.
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Look up a round by number.
    pub fn round(&self, number: u32) -> RulesResult<&Round> {
        self.rounds
            .iter()
            .find(|r| r.number == number)
            .ok_or(RulesError::UnknownRound(number))
    }

    /// The gambiarra ledger.
    pub fn ledger(&self) -> &GambiarraLedger {
        &self.ledger
    }

    /// Whether a character may still spend their gambiarra.
    pub fn gambiarra_available(&self, id: CharacterId, editing: Option<BatchId>) -> bool {
        self.ledger.is_available(id, editing)
    }

    /// Open a new round and return its number.
    pub fn start_round(&mut self) -> u32 {
        let number = self.rounds.len() as u32 + 1;
        self.rounds.push(Round {
            number,
            initiative: Vec::new(),
            batches: Vec::new(),
        });
        tracing::info!(round = number, "round started");
        number
    }

    /// Compute a round's initiative for every character on both teams.
    ///
    /// Characters without a request, or whose request has no roll, get a
    /// d20 rolled for them. Recomputing replaces the round's list.
    pub fn roll_initiative(
        &mut self,
        book: &RuleBook,
        round: u32,
        requests: &[InitiativeRequest],
    ) -> RulesResult<&[InitiativeResult]> {
        let index = self.round_index(round)?;
        if let Some(unknown) = requests.iter().find(|r| self.character(r.character_id).is_none()) {
            return Err(RulesError::UnknownCharacter(unknown.character_id.to_string()));
        }

        let die = book.config().initiative_die;
        let mut inputs = Vec::new();
        for team in &self.teams {
            for character in &team.members {
                let request = requests.iter().find(|r| r.character_id == character.id);
                let roll = request
                    .and_then(|r| r.roll)
                    .unwrap_or_else(|| die.roll(&mut self.rng));
                inputs.push(InitiativeInput {
                    character,
                    team: &team.name,
                    roll,
                    courage: request.is_some_and(|r| r.courage),
                    cowardice: request.is_some_and(|r| r.cowardice),
                });
            }
        }

        let order = compute_order(book, &inputs);
        let round = &mut self.rounds[index];
        round.initiative = order;
        Ok(&round.initiative)
    }

    /// Resolve and store a new batch in a round.
    ///
    /// Regular checks without a roll get a d10 rolled for them.
    pub fn create_batch(
        &mut self,
        book: &RuleBook,
        round: u32,
        config: BatchConfig,
        selections: Vec<CheckSelection>,
        at: DateTime<Utc>,
    ) -> RulesResult<BatchId> {
        let index = self.round_index(round)?;
        let id = BatchId(self.next_batch);
        let results = self.resolve(book, id, &config, selections, false, at)?;

        self.next_batch += 1;
        tracing::info!(round, batch = %id, name = %config.name, checks = results.len(), "batch created");
        self.rounds[index].batches.push(TestBatch {
            id,
            name: config.name,
            summed: config.summed,
            global_difficulty: config.global_difficulty,
            results,
            created_at: at,
        });
        Ok(id)
    }

    /// Replace a batch wholesale.
    ///
    /// Gambiarra tokens the old batch spent are available to the new one.
    /// On error the old batch and the ledger stay as they were.
    pub fn edit_batch(
        &mut self,
        book: &RuleBook,
        round: u32,
        id: BatchId,
        config: BatchConfig,
        selections: Vec<CheckSelection>,
        at: DateTime<Utc>,
    ) -> RulesResult<()> {
        let index = self.round_index(round)?;
        let position = self.rounds[index]
            .batches
            .iter()
            .position(|b| b.id == id)
            .ok_or(RulesError::UnknownBatch(id))?;
        let results = self.resolve(book, id, &config, selections, true, at)?;

        tracing::info!(round, batch = %id, name = %config.name, "batch replaced");
        let batch = &mut self.rounds[index].batches[position];
        batch.name = config.name;
        batch.summed = config.summed;
        batch.global_difficulty = config.global_difficulty;
        batch.results = results;
        Ok(())
    }

    /// Look up a batch in a round.
    pub fn batch(&self, round: u32, id: BatchId) -> RulesResult<&TestBatch> {
        self.round(round)?
            .batches
            .iter()
            .find(|b| b.id == id)
            .ok_or(RulesError::UnknownBatch(id))
    }

    fn round_index(&self, number: u32) -> RulesResult<usize> {
        self.rounds
            .iter()
            .position(|r| r.number == number)
            .ok_or(RulesError::UnknownRound(number))
    }

    fn resolve(
        &mut self,
        book: &RuleBook,
        id: BatchId,
        config: &BatchConfig,
        mut selections: Vec<CheckSelection>,
        editing: bool,
        at: DateTime<Utc>,
    ) -> RulesResult<Vec<SkillCheckResult>> {
        let die = book.config().check_die;
        for selection in selections.iter_mut().filter(|s| !s.gambiarra && s.roll.is_none()) {
            selection.roll = Some(die.roll(&mut self.rng));
        }

        let roster = roster(&self.teams);
        let request = BatchRequest {
            id,
            selections: &selections,
            config,
            editing,
        };
        resolve_batch(book, &roster, &request, &mut self.ledger, at)
    }
}

fn roster(teams: &[Team]) -> Vec<Combatant<'_>> {
    teams
        .iter()
        .flat_map(|team| {
            team.members.iter().map(move |character| Combatant {
                character,
                team: &team.name,
            })
        })
        .collect()
}
