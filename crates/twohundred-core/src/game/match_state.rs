use crate::error::EngineError;
use crate::game::agent::Table;
use crate::game::engine::{RoundEngine, RoundOutcome};
use crate::model::deck::Deck;
use crate::model::player::Team;
use crate::model::score::MatchScores;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{Level, event};

pub const DEFAULT_MAX_ROUNDS: u32 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchLimits {
    /// Deals allowed, void ones included, before the match is abandoned.
    pub max_rounds: u32,
}

impl Default for MatchLimits {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("round {round} aborted: {source}")]
    Engine {
        round: u32,
        #[source]
        source: EngineError,
    },
    #[error("match did not reach the target within {rounds} rounds")]
    RoundLimit { rounds: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub winner: Team,
    pub scores: [i64; 2],
    pub rounds_played: u32,
    pub void_rounds: u32,
    pub contracts_made: [u32; 2],
    pub contracts_failed: [u32; 2],
}

/// Plays rounds against a seeded deck until a team reaches the target.
#[derive(Debug, Clone)]
pub struct MatchState {
    scores: MatchScores,
    round_number: u32,
    void_rounds: u32,
    contracts_made: [u32; 2],
    contracts_failed: [u32; 2],
    last_contract_team: Option<Team>,
    rng: StdRng,
    seed: u64,
}

impl MatchState {
    pub fn new() -> Self {
        let seed: u64 = rand::random();
        Self::with_seed(seed)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            scores: MatchScores::new(),
            round_number: 0,
            void_rounds: 0,
            contracts_made: [0; 2],
            contracts_failed: [0; 2],
            last_contract_team: None,
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn scores(&self) -> &MatchScores {
        &self.scores
    }

    /// Deals played so far, void ones included.
    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn void_rounds(&self) -> u32 {
        self.void_rounds
    }

    pub fn is_complete(&self) -> bool {
        self.scores.target_reached()
    }

    /// Winner once the target is reached. A tie is awarded to the team that
    /// held the final contract, whose settlement is applied first.
    pub fn winner(&self) -> Option<Team> {
        if !self.is_complete() {
            return None;
        }
        self.scores.leader().or(self.last_contract_team)
    }

    /// Deals a fresh deck and plays it out, folding the result into the scores.
    pub fn play_round(&mut self, table: &mut Table) -> Result<RoundOutcome, MatchError> {
        let deck = Deck::shuffled(&mut self.rng);
        self.round_number += 1;
        let round = self.round_number;
        let outcome = RoundEngine::deal(&deck)
            .run(table, &self.scores)
            .map_err(|source| MatchError::Engine { round, source })?;

        match &outcome {
            RoundOutcome::Void => self.void_rounds += 1,
            RoundOutcome::Settled(summary) => {
                self.scores
                    .apply(&summary.delta)
                    .map_err(|source| MatchError::Engine { round, source })?;
                let team = summary.contract_team();
                if summary.delta.contract_made {
                    self.contracts_made[team.index()] += 1;
                } else {
                    self.contracts_failed[team.index()] += 1;
                }
                self.last_contract_team = Some(team);
            }
        }

        event!(
            target: "twohundred_core::match",
            Level::DEBUG,
            round,
            north_south = self.scores.score(Team::NorthSouth),
            east_west = self.scores.score(Team::EastWest),
            void = matches!(outcome, RoundOutcome::Void)
        );
        Ok(outcome)
    }

    pub fn play_to_completion(
        &mut self,
        table: &mut Table,
        limits: MatchLimits,
    ) -> Result<MatchOutcome, MatchError> {
        loop {
            if let Some(winner) = self.winner() {
                event!(
                    target: "twohundred_core::match",
                    Level::INFO,
                    seed = self.seed,
                    winner = %winner,
                    rounds = self.round_number,
                    "match complete"
                );
                return Ok(self.outcome(winner));
            }
            if self.round_number >= limits.max_rounds {
                return Err(MatchError::RoundLimit {
                    rounds: self.round_number,
                });
            }
            self.play_round(table)?;
        }
    }

    fn outcome(&self, winner: Team) -> MatchOutcome {
        MatchOutcome {
            winner,
            scores: *self.scores.standings(),
            rounds_played: self.round_number,
            void_rounds: self.void_rounds,
            contracts_made: self.contracts_made,
            contracts_failed: self.contracts_failed,
        }
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}
