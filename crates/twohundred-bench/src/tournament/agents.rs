use serde_yaml::{Mapping, Value};
use thiserror::Error;
use twohundred_bot::{BotDifficulty, BotParams, HeuristicAgent, RandomAgent};
use twohundred_core::Agent;

use crate::config::{AgentConfig, AgentKind};

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("invalid heuristic parameter for agent '{name}': {message}")]
    InvalidHeuristicParam { name: String, message: String },
    #[error("invalid random parameter for agent '{name}': {message}")]
    InvalidRandomParam { name: String, message: String },
}

/// Parsed team definition that can spawn fresh agents for every match.
#[derive(Debug, Clone)]
pub struct AgentBlueprint {
    pub name: String,
    pub kind: AgentKind,
    implementation: AgentImplementation,
}

#[derive(Debug, Clone)]
enum AgentImplementation {
    Heuristic(HeuristicOptions),
    Random(RandomOptions),
}

impl AgentBlueprint {
    pub fn from_configs(configs: &[AgentConfig]) -> Result<Vec<Self>, AgentError> {
        configs.iter().map(Self::from_config).collect()
    }

    pub fn from_config(config: &AgentConfig) -> Result<Self, AgentError> {
        let implementation = match config.kind {
            AgentKind::Heuristic => AgentImplementation::Heuristic(HeuristicOptions::from_params(
                &config.name,
                &config.params,
            )?),
            AgentKind::Random => {
                AgentImplementation::Random(RandomOptions::from_params(&config.name, &config.params)?)
            }
        };

        Ok(Self {
            name: config.name.clone(),
            kind: config.kind,
            implementation,
        })
    }

    /// Fresh agent for one seat. `seed` only matters to randomised agents.
    pub fn spawn_agent(&self, seed: u64) -> Box<dyn Agent> {
        match &self.implementation {
            AgentImplementation::Heuristic(opts) => Box::new(HeuristicAgent::new(
                self.name.clone(),
                opts.difficulty,
                opts.params,
            )),
            AgentImplementation::Random(opts) => Box::new(
                RandomAgent::new(self.name.clone(), seed).with_bid_chance(opts.bid_chance),
            ),
        }
    }
}

#[derive(Debug, Clone)]
struct HeuristicOptions {
    difficulty: BotDifficulty,
    params: BotParams,
}

impl HeuristicOptions {
    fn from_params(name: &str, params: &Value) -> Result<Self, AgentError> {
        let invalid = |message: String| AgentError::InvalidHeuristicParam {
            name: name.to_string(),
            message,
        };
        let mut options = Self {
            difficulty: BotDifficulty::Normal,
            params: BotParams::default(),
        };
        let Some(mapping) = as_mapping(params).map_err(|message| invalid(message.to_string()))?
        else {
            return Ok(options);
        };

        for (key, value) in mapping {
            match key.as_str() {
                Some("difficulty") => {
                    let text = value
                        .as_str()
                        .ok_or_else(|| invalid("difficulty must be a string".to_string()))?;
                    options.difficulty = BotDifficulty::from_label(text)
                        .ok_or_else(|| invalid(format!("unknown difficulty '{text}'")))?;
                }
                Some("aggression") => {
                    let aggression = value
                        .as_f64()
                        .filter(|v| v.is_finite() && *v > 0.0)
                        .ok_or_else(|| invalid("aggression must be a positive number".to_string()))?;
                    options.params.aggression = aggression as f32;
                }
                Some("min_bid") => {
                    let min_bid = value
                        .as_u64()
                        .and_then(|v| u32::try_from(v).ok())
                        .filter(|v| *v > 0)
                        .ok_or_else(|| invalid("min_bid must be a positive integer".to_string()))?;
                    options.params.min_bid = min_bid;
                }
                Some(other) => return Err(invalid(format!("unknown parameter '{other}'"))),
                None => return Err(invalid("parameter names must be strings".to_string())),
            }
        }

        Ok(options)
    }
}

const DEFAULT_RANDOM_BID_CHANCE: f64 = 0.25;

#[derive(Debug, Clone)]
struct RandomOptions {
    bid_chance: f64,
}

impl RandomOptions {
    fn from_params(name: &str, params: &Value) -> Result<Self, AgentError> {
        let invalid = |message: String| AgentError::InvalidRandomParam {
            name: name.to_string(),
            message,
        };
        let mut options = Self {
            bid_chance: DEFAULT_RANDOM_BID_CHANCE,
        };
        let Some(mapping) = as_mapping(params).map_err(|message| invalid(message.to_string()))?
        else {
            return Ok(options);
        };

        for (key, value) in mapping {
            match key.as_str() {
                Some("bid_chance") => {
                    options.bid_chance = value
                        .as_f64()
                        .filter(|v| (0.0..=1.0).contains(v))
                        .ok_or_else(|| invalid("bid_chance must be between 0 and 1".to_string()))?;
                }
                Some(other) => return Err(invalid(format!("unknown parameter '{other}'"))),
                None => return Err(invalid("parameter names must be strings".to_string())),
            }
        }

        Ok(options)
    }
}

fn as_mapping(params: &Value) -> Result<Option<&Mapping>, &'static str> {
    if params.is_null() {
        return Ok(None);
    }
    params
        .as_mapping()
        .map(Some)
        .ok_or("expected a mapping of parameters")
}
