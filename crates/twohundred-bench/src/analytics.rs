use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use twohundred_core::model::player::Team;

use crate::config::{AgentKind, BenchmarkConfig};
use crate::tournament::MatchRecord;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("agent '{0}' defined in results but missing from configuration")]
    UnknownAgent(String),
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Accumulates per-team results across every match of a run.
pub struct StandingsCollector {
    agents: Vec<AgentAccumulator>,
}

impl StandingsCollector {
    pub fn new(config: &BenchmarkConfig) -> Self {
        let agents = config
            .teams
            .iter()
            .map(|team| AgentAccumulator::new(team.name.clone(), team.kind))
            .collect();
        Self { agents }
    }

    pub fn record_match(&mut self, record: &MatchRecord) -> Result<(), AnalyticsError> {
        for team in Team::BOTH {
            let name = record.agent_for(team);
            let acc = self
                .agents
                .iter_mut()
                .find(|acc| acc.name == name)
                .ok_or_else(|| AnalyticsError::UnknownAgent(name.to_string()))?;

            let outcome = &record.outcome;
            let own = outcome.scores[team.index()];
            let other = outcome.scores[team.opponent().index()];
            acc.matches += 1;
            if outcome.winner == team {
                acc.wins += 1;
            }
            if team == Team::NorthSouth {
                acc.north_south_matches += 1;
            }
            acc.score_total = acc.score_total.saturating_add(own);
            acc.margin_total = acc.margin_total.saturating_add(own.saturating_sub(other));
            acc.rounds += u64::from(outcome.rounds_played);
            acc.contracts_made += outcome.contracts_made[team.index()];
            acc.contracts_failed += outcome.contracts_failed[team.index()];
        }
        Ok(())
    }

    pub fn finalize(self) -> StandingsSummary {
        StandingsSummary {
            agents: self
                .agents
                .into_iter()
                .map(AgentAccumulator::into_report)
                .collect(),
        }
    }
}

struct AgentAccumulator {
    name: String,
    kind: AgentKind,
    matches: u32,
    wins: u32,
    north_south_matches: u32,
    score_total: i64,
    margin_total: i64,
    rounds: u64,
    contracts_made: u32,
    contracts_failed: u32,
}

impl AgentAccumulator {
    fn new(name: String, kind: AgentKind) -> Self {
        Self {
            name,
            kind,
            matches: 0,
            wins: 0,
            north_south_matches: 0,
            score_total: 0,
            margin_total: 0,
            rounds: 0,
            contracts_made: 0,
            contracts_failed: 0,
        }
    }

    fn into_report(self) -> AgentReport {
        let per_match = |total: f64| {
            if self.matches == 0 {
                0.0
            } else {
                total / f64::from(self.matches)
            }
        };
        let contracts = self.contracts_made + self.contracts_failed;
        AgentReport {
            win_rate: per_match(f64::from(self.wins)),
            avg_score: per_match(self.score_total as f64),
            avg_margin: per_match(self.margin_total as f64),
            avg_rounds: per_match(self.rounds as f64),
            contract_success: if contracts == 0 {
                0.0
            } else {
                f64::from(self.contracts_made) / f64::from(contracts)
            },
            name: self.name,
            kind: self.kind,
            matches: self.matches,
            wins: self.wins,
            north_south_matches: self.north_south_matches,
            contracts_made: self.contracts_made,
            contracts_failed: self.contracts_failed,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StandingsSummary {
    pub agents: Vec<AgentReport>,
}

impl StandingsSummary {
    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        fs::write(path.as_ref(), self.to_markdown()).map_err(|e| AnalyticsError::Io {
            context: "writing summary markdown",
            source: e,
        })
    }

    pub fn to_markdown(&self) -> String {
        let mut rows = String::new();
        rows.push_str("# Match Summary\n\n");
        rows.push_str("| Agent | Kind | Matches | Wins | Win % | Avg Score | Avg Margin | Avg Rounds | Contracts Made | Contracts Failed | Contract % |\n");
        rows.push_str("|-------|------|---------|------|-------|-----------|------------|------------|----------------|------------------|------------|\n");

        for agent in &self.agents {
            let _ = writeln!(
                rows,
                "| {name} | {kind:?} | {matches} | {wins} | {win:.1}% | {score:.1} | {margin:+.1} | {rounds:.1} | {made} | {failed} | {success:.1}% |",
                name = agent.name,
                kind = agent.kind,
                matches = agent.matches,
                wins = agent.wins,
                win = agent.win_rate * 100.0,
                score = agent.avg_score,
                margin = agent.avg_margin,
                rounds = agent.avg_rounds,
                made = agent.contracts_made,
                failed = agent.contracts_failed,
                success = agent.contract_success * 100.0,
            );
        }
        rows
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentReport {
    pub name: String,
    pub kind: AgentKind,
    pub matches: u32,
    pub wins: u32,
    pub north_south_matches: u32,
    pub win_rate: f64,
    pub avg_score: f64,
    pub avg_margin: f64,
    pub avg_rounds: f64,
    pub contracts_made: u32,
    pub contracts_failed: u32,
    pub contract_success: f64,
}
