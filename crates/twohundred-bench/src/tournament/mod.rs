mod agents;
mod seating;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};
use twohundred_core::model::player::{PlayerPosition, Team};
use twohundred_core::{MatchError, MatchLimits, MatchOutcome, MatchState, Table};

use crate::analytics::{AnalyticsError, StandingsCollector};
use crate::config::{BenchmarkConfig, ResolvedOutputs};
use crate::logging::TELEMETRY_FILE;

pub use agents::{AgentBlueprint, AgentError};
pub use seating::{Seating, seat_seed};

/// Primary entry point for orchestrating a series of matches between two teams.
pub struct TournamentRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    teams: [AgentBlueprint; 2],
    logging_enabled: bool,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub matches_played: usize,
    pub rows_written: usize,
    pub wins: Vec<(String, u32)>,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub telemetry_path: Option<PathBuf>,
}

impl TournamentRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let blueprints = AgentBlueprint::from_configs(&config.teams)?;
        let found = blueprints.len();
        let teams: [AgentBlueprint; 2] = blueprints
            .try_into()
            .map_err(|_| RunnerError::TeamCount { found })?;

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            teams,
        })
    }

    /// Play every configured match, streaming one JSONL row per match.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.matches.seed.unwrap_or(0));
        let mut standings = StandingsCollector::new(&self.config);
        let mut rows_written = 0usize;

        for match_index in 0..self.config.matches.count {
            let match_seed = rng.next_u64();
            let seating = Seating::for_match(match_index, self.config.matches.swap_sides);
            let record = self.play_match(match_index, match_seed, seating)?;
            standings.record_match(&record)?;
            write_match_row(&mut writer, &self.config.run_id, &record)?;
            rows_written += 1;
        }

        writer.flush()?;

        let summary = standings.finalize();
        summary.write_markdown(&self.outputs.summary_md)?;

        let telemetry_path = self
            .logging_enabled
            .then(|| self.outputs.report_dir().join(TELEMETRY_FILE));

        Ok(RunSummary {
            matches_played: self.config.matches.count,
            rows_written,
            wins: summary
                .agents
                .iter()
                .map(|agent| (agent.name.clone(), agent.wins))
                .collect(),
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            telemetry_path,
        })
    }

    fn play_match(
        &self,
        match_index: usize,
        match_seed: u64,
        seating: Seating,
    ) -> Result<MatchRecord, RunnerError> {
        let mut table = self.build_table(seating, match_seed);
        let limits = MatchLimits {
            max_rounds: self.config.matches.max_rounds,
        };

        let start = Instant::now();
        let outcome = MatchState::with_seed(match_seed)
            .play_to_completion(&mut table, limits)
            .map_err(|source| RunnerError::Match {
                match_index,
                source,
            })?;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        let record = MatchRecord {
            match_index,
            seed: match_seed,
            seating,
            team_names: self.teams.clone().map(|team| team.name),
            outcome,
            elapsed_ms,
        };

        if self.logging_enabled && tracing::enabled!(Level::INFO) {
            event!(
                target: "twohundred_bench::match",
                Level::INFO,
                run_id = %self.config.run_id,
                match_index = match_index as u64,
                seed = match_seed,
                north_south = record.agent_for(Team::NorthSouth),
                east_west = record.agent_for(Team::EastWest),
                winner = record.agent_for(outcome.winner),
                rounds = outcome.rounds_played,
                elapsed_ms
            );
        }

        Ok(record)
    }

    fn build_table(&self, seating: Seating, match_seed: u64) -> Table {
        PlayerPosition::LOOP.map(|seat| {
            let team = &self.teams[seating.team_index(seat.team())];
            team.spawn_agent(seat_seed(match_seed, seat.index()))
        })
    }
}

/// One finished match together with who sat where.
#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub match_index: usize,
    pub seed: u64,
    pub seating: Seating,
    /// Configured team names, in configuration order.
    pub team_names: [String; 2],
    pub outcome: MatchOutcome,
    pub elapsed_ms: f64,
}

impl MatchRecord {
    pub fn agent_for(&self, team: Team) -> &str {
        &self.team_names[self.seating.team_index(team)]
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn team_label(team: Team) -> &'static str {
    match team {
        Team::NorthSouth => "north_south",
        Team::EastWest => "east_west",
    }
}

#[derive(Serialize)]
struct MatchLogRow<'a> {
    run_id: &'a str,
    match_id: String,
    match_index: usize,
    seed: u64,
    north_south: &'a str,
    east_west: &'a str,
    winner: &'a str,
    winning_side: &'static str,
    scores: [i64; 2],
    rounds_played: u32,
    void_rounds: u32,
    contracts_made: [u32; 2],
    contracts_failed: [u32; 2],
    elapsed_ms: f64,
}

fn write_match_row(
    writer: &mut BufWriter<File>,
    run_id: &str,
    record: &MatchRecord,
) -> Result<(), RunnerError> {
    let outcome = &record.outcome;
    let row = MatchLogRow {
        run_id,
        match_id: format!("M{:05}", record.match_index),
        match_index: record.match_index,
        seed: record.seed,
        north_south: record.agent_for(Team::NorthSouth),
        east_west: record.agent_for(Team::EastWest),
        winner: record.agent_for(outcome.winner),
        winning_side: team_label(outcome.winner),
        scores: outcome.scores,
        rounds_played: outcome.rounds_played,
        void_rounds: outcome.void_rounds,
        contracts_made: outcome.contracts_made,
        contracts_failed: outcome.contracts_failed,
        elapsed_ms: record.elapsed_ms,
    };

    serde_json::to_writer(&mut *writer, &row)?;
    writer.write_all(b"\n")?;
    Ok(())
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{0}")]
    Agent(#[from] AgentError),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("match {match_index} failed: {source}")]
    Match {
        match_index: usize,
        #[source]
        source: MatchError,
    },
    #[error("configuration requires exactly 2 teams but found {found}")]
    TeamCount { found: usize },
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use twohundred_core::Agent;

    fn config(swap_sides: bool) -> BenchmarkConfig {
        let yaml = format!(
            r#"
run_id: "unit"
matches:
  seed: 7
  count: 2
  swap_sides: {swap_sides}
teams:
  - name: "greedy"
    kind: "heuristic"
  - name: "coin"
    kind: "random"
outputs:
  jsonl: "unused.jsonl"
  summary_md: "unused.md"
"#
        );
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).unwrap();
        cfg.validate().unwrap();
        cfg
    }

    fn runner(swap_sides: bool) -> TournamentRunner {
        let cfg = config(swap_sides);
        let outputs = cfg.resolved_outputs();
        TournamentRunner::new(cfg, outputs).unwrap()
    }

    #[test]
    fn table_seats_partners_from_the_same_team() {
        let runner = runner(true);
        let table = runner.build_table(Seating::new(1, 0), 99);
        let names: Vec<&str> = table.iter().map(|agent| agent.name()).collect();
        assert_eq!(names, ["coin", "greedy", "coin", "greedy"]);
    }

    #[test]
    fn single_match_record_is_consistent() {
        let runner = runner(false);
        let record = runner.play_match(0, 1234, Seating::new(0, 1)).unwrap();
        assert_eq!(record.agent_for(Team::NorthSouth), "greedy");
        assert_eq!(record.agent_for(Team::EastWest), "coin");
        assert!(record.outcome.scores.iter().any(|&score| score >= 200));
        assert!(record.outcome.rounds_played >= 1);
    }

    #[test]
    fn wrong_team_count_is_rejected() {
        let mut cfg = config(true);
        cfg.teams.pop();
        let outputs = cfg.resolved_outputs();
        assert!(matches!(
            TournamentRunner::new(cfg, outputs),
            Err(RunnerError::TeamCount { found: 1 })
        ));
    }
}
