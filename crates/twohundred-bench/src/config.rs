use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;
use twohundred_core::game::match_state::DEFAULT_MAX_ROUNDS;

/// A match always seats exactly two partnerships.
const TEAM_COUNT: usize = 2;

/// Harness configuration, read from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BenchmarkConfig {
    pub run_id: String,
    pub matches: MatchConfig,
    pub teams: Vec<AgentConfig>,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BenchmarkConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(source) => return Err(ConfigError::Read { source, path }),
        };
        let mut cfg: BenchmarkConfig = match serde_yaml::from_str(&text) {
            Ok(cfg) => cfg,
            Err(source) => return Err(ConfigError::Parse { source, path }),
        };
        if let Err(source) = cfg.validate() {
            return Err(ConfigError::Invalid { path, source });
        }
        Ok(cfg)
    }

    /// Checks every block and fills in empty team params. Also run after CLI
    /// overrides are applied.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        if self.run_id.is_empty() || !self.run_id.chars().all(is_name_char) {
            return Err(ValidationError::invalid(
                "run_id",
                "use one or more of [A-Za-z0-9._-]",
            ));
        }
        if self.matches.count == 0 {
            return Err(ValidationError::invalid("matches.count", "must be at least 1"));
        }
        if self.matches.max_rounds == 0 {
            return Err(ValidationError::invalid(
                "matches.max_rounds",
                "must be at least 1",
            ));
        }
        if self.logging.tracing_level.trim().parse::<Level>().is_err() {
            return Err(ValidationError::invalid(
                "logging.tracing_level",
                format!("unknown level '{}'", self.logging.tracing_level),
            ));
        }
        self.outputs.validate()?;
        self.validate_teams()
    }

    fn validate_teams(&mut self) -> Result<(), ValidationError> {
        if self.teams.len() != TEAM_COUNT {
            return Err(ValidationError::invalid(
                "teams",
                format!("exactly {TEAM_COUNT} teams required, found {}", self.teams.len()),
            ));
        }

        let mut seen = HashSet::new();
        for (index, team) in self.teams.iter_mut().enumerate() {
            if team.name.is_empty() || !team.name.chars().all(is_name_char) {
                return Err(ValidationError::invalid(
                    format!("teams[{index}].name"),
                    "use one or more of [A-Za-z0-9._-]",
                ));
            }
            if !seen.insert(team.name.clone()) {
                return Err(ValidationError::invalid(
                    "teams",
                    format!("both teams are named '{}'", team.name),
                ));
            }
            if team.params.is_null() {
                team.params = serde_yaml::Value::Mapping(Default::default());
            }
        }
        Ok(())
    }

    /// Output paths with `{run_id}` substituted.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        let resolve = |template: &str| PathBuf::from(template.replace("{run_id}", &self.run_id));
        ResolvedOutputs {
            jsonl: resolve(&self.outputs.jsonl),
            summary_md: resolve(&self.outputs.summary_md),
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MatchConfig {
    /// Base seed; every match seed is drawn from it. Absent means 0.
    pub seed: Option<u64>,
    pub count: usize,
    /// Alternate which team sits North/South on every other match.
    #[serde(default = "default_swap_sides")]
    pub swap_sides: bool,
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
}

fn default_swap_sides() -> bool {
    true
}

fn default_max_rounds() -> u32 {
    DEFAULT_MAX_ROUNDS
}

/// One side of the table. Both seats of a team run the same agent.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AgentConfig {
    pub name: String,
    pub kind: AgentKind,
    #[serde(default)]
    pub params: serde_yaml::Value,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Heuristic,
    Random,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
    pub summary_md: String,
}

impl OutputsConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.jsonl.trim().is_empty() {
            return Err(ValidationError::invalid("outputs.jsonl", "path is empty"));
        }
        if self.summary_md.trim().is_empty() {
            return Err(ValidationError::invalid("outputs.summary_md", "path is empty"));
        }
        if self.jsonl == self.summary_md {
            return Err(ValidationError::invalid(
                "outputs.summary_md",
                "summary must not overwrite the JSONL log",
            ));
        }
        Ok(())
    }
}

/// Structured logs are off unless enabled.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    /// Configured level, `INFO` if it does not parse.
    pub fn level(&self) -> Level {
        self.tracing_level.trim().parse().unwrap_or(Level::INFO)
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
}

impl ResolvedOutputs {
    /// Directory holding the summary; structured logs are written alongside it.
    pub fn report_dir(&self) -> PathBuf {
        self.summary_md
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

impl ValidationError {
    fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC_YAML: &str = r#"
run_id: "stage0_smoke"
matches:
  seed: 123
  count: 16
teams:
  - name: "greedy"
    kind: "heuristic"
    params:
      aggression: 1.2
  - name: "coin"
    kind: "random"
outputs:
  jsonl: "bench/out/{run_id}/matches.jsonl"
  summary_md: "bench/out/{run_id}/summary.md"
logging:
  enable_structured: true
  tracing_level: "debug"
"#;

    fn parse(yaml: &str) -> BenchmarkConfig {
        serde_yaml::from_str(yaml).expect("parse yaml")
    }

    fn rejected_field(yaml: &str) -> String {
        let ValidationError::InvalidField { field, .. } =
            parse(yaml).validate().expect_err("config should be rejected");
        field
    }

    #[test]
    fn loads_and_validates_basic_config() {
        let mut cfg = parse(BASIC_YAML);
        cfg.validate().expect("validate");

        assert!(cfg.matches.swap_sides);
        assert_eq!(cfg.matches.max_rounds, DEFAULT_MAX_ROUNDS);
        assert!(cfg.logging.enable_structured);
        assert_eq!(cfg.logging.level(), Level::DEBUG);
        assert_eq!(cfg.teams[1].kind, AgentKind::Random);
        assert!(cfg.teams[1].params.is_mapping());

        let outputs = cfg.resolved_outputs();
        assert_eq!(
            outputs.jsonl,
            PathBuf::from("bench/out/stage0_smoke/matches.jsonl")
        );
        assert_eq!(outputs.report_dir(), PathBuf::from("bench/out/stage0_smoke"));
    }

    #[test]
    fn rejects_a_third_team() {
        let yaml = BASIC_YAML.replace(
            "outputs:",
            "  - name: \"extra\"\n    kind: \"random\"\noutputs:",
        );
        assert_eq!(rejected_field(&yaml), "teams");
    }

    #[test]
    fn rejects_duplicate_teams() {
        let yaml = BASIC_YAML.replace("name: \"coin\"", "name: \"greedy\"");
        assert_eq!(rejected_field(&yaml), "teams");
    }

    #[test]
    fn rejects_team_names_outside_the_safe_alphabet() {
        let yaml = BASIC_YAML.replace("name: \"coin\"", "name: \"coin flip\"");
        assert_eq!(rejected_field(&yaml), "teams[1].name");
    }

    #[test]
    fn rejects_zero_matches_and_zero_round_limit() {
        assert_eq!(
            rejected_field(&BASIC_YAML.replace("count: 16", "count: 0")),
            "matches.count"
        );
        assert_eq!(
            rejected_field(&BASIC_YAML.replace("count: 16", "count: 16\n  max_rounds: 0")),
            "matches.max_rounds"
        );
    }

    #[test]
    fn rejects_invalid_run_id() {
        let yaml = BASIC_YAML.replace("stage0_smoke", "stage 0 smoke");
        assert_eq!(rejected_field(&yaml), "run_id");
    }

    #[test]
    fn rejects_unknown_tracing_level() {
        let yaml = BASIC_YAML.replace("\"debug\"", "\"chatty\"");
        assert_eq!(rejected_field(&yaml), "logging.tracing_level");
    }

    #[test]
    fn rejects_summary_written_over_the_log() {
        let yaml = BASIC_YAML.replace("summary.md", "matches.jsonl");
        assert_eq!(rejected_field(&yaml), "outputs.summary_md");
    }

    #[test]
    fn unknown_agent_kind_fails_to_parse() {
        let yaml = BASIC_YAML.replace("kind: \"random\"", "kind: \"external\"");
        assert!(serde_yaml::from_str::<BenchmarkConfig>(&yaml).is_err());
    }

    #[test]
    fn missing_file_reports_its_path() {
        let err = BenchmarkConfig::from_path("does/not/exist.yaml").expect_err("missing");
        assert!(matches!(
            err,
            ConfigError::Read { ref path, .. } if path == Path::new("does/not/exist.yaml")
        ));
    }
}
