use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use arbor_bot::SearchConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Level;

/// Self-play match description, read from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RunnerConfig {
    pub run_id: String,
    pub games: GamesConfig,
    pub agents: Vec<AgentConfig>,
    #[serde(default)]
    pub search: SearchSettings,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GamesConfig {
    pub count: usize,
    pub seed: Option<u64>,
    /// Replay every deal with the seats exchanged.
    #[serde(default = "enabled")]
    pub swap_seats: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    pub name: String,
    pub kind: AgentKind,
    /// Fixed policy seed; otherwise each game derives one from its deal.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Heuristic,
    Search,
    Random,
}

/// Tree search budget shared by every `search` agent.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SearchSettings {
    pub time_limit_ms: u64,
    pub exploration: f64,
    pub max_iterations: Option<u64>,
    pub max_nodes: usize,
}

/// Output paths; `{run_id}` is substituted.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputsConfig {
    pub jsonl: String,
    pub summary_md: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub enable_structured: bool,
    pub tracing_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
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

impl RunnerConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        let config: RunnerConfig = match serde_yaml::from_str(&text) {
            Ok(config) => config,
            Err(source) => return Err(ConfigError::Parse { path, source }),
        };
        match config.validate() {
            Ok(()) => Ok(config),
            Err(source) => Err(ConfigError::Invalid { path, source }),
        }
    }

    /// Checks run after command-line overrides are applied.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check(is_safe_name(&self.run_id), "run_id", || {
            "must be non-empty and use only letters, digits, '.', '_' or '-'".into()
        })?;
        check(self.games.count > 0, "games.count", || {
            "must be greater than zero".into()
        })?;
        check(self.agents.len() == 2, "agents", || {
            format!("exactly two agents are required, found {}", self.agents.len())
        })?;
        for agent in &self.agents {
            check(is_safe_name(&agent.name), "agents.name", || {
                format!("'{}' is not a valid agent name", agent.name)
            })?;
        }
        check(self.agents[0].name != self.agents[1].name, "agents", || {
            format!("agent name '{}' defined more than once", self.agents[0].name)
        })?;

        let search = &self.search;
        check(search.time_limit_ms > 0, "search.time_limit_ms", || {
            "must be greater than zero".into()
        })?;
        check(
            search.exploration.is_finite() && search.exploration >= 0.0,
            "search.exploration",
            || "must be a non-negative number".into(),
        )?;
        check(search.max_iterations != Some(0), "search.max_iterations", || {
            "must be at least 1 when set".into()
        })?;
        check(search.max_nodes > 0, "search.max_nodes", || {
            "must be greater than zero".into()
        })?;

        check(!self.outputs.jsonl.trim().is_empty(), "outputs.jsonl", || {
            "path must not be empty".into()
        })?;
        check(
            !self.outputs.summary_md.trim().is_empty(),
            "outputs.summary_md",
            || "path must not be empty".into(),
        )?;
        if let Some(raw) = &self.logging.tracing_level {
            check(parse_level(raw).is_some(), "logging.tracing_level", || {
                format!("unknown level '{raw}'")
            })?;
        }
        Ok(())
    }

    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        let resolve = |template: &str| PathBuf::from(template.replace("{run_id}", &self.run_id));
        ResolvedOutputs {
            jsonl: resolve(&self.outputs.jsonl),
            summary_md: resolve(&self.outputs.summary_md),
        }
    }
}

impl GamesConfig {
    /// Seatings per deal: one, or two when seats are swapped.
    pub fn seatings(&self) -> usize {
        if self.swap_seats { 2 } else { 1 }
    }
}

impl AgentKind {
    pub fn policy_name(self) -> &'static str {
        match self {
            AgentKind::Heuristic => "heuristic",
            AgentKind::Search => "search",
            AgentKind::Random => "random",
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        let defaults = SearchConfig::default();
        Self {
            time_limit_ms: defaults.time_limit.as_millis() as u64,
            exploration: defaults.exploration,
            max_iterations: defaults.max_iterations,
            max_nodes: defaults.max_nodes,
        }
    }
}

impl SearchSettings {
    pub fn to_search_config(&self) -> SearchConfig {
        SearchConfig {
            exploration: self.exploration,
            time_limit: Duration::from_millis(self.time_limit_ms),
            max_iterations: self.max_iterations,
            max_nodes: self.max_nodes,
        }
    }
}

impl LoggingConfig {
    pub fn level(&self) -> Level {
        self.tracing_level
            .as_deref()
            .and_then(parse_level)
            .unwrap_or(Level::INFO)
    }
}

pub fn parse_level(raw: &str) -> Option<Level> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

fn check(
    ok: bool,
    field: &str,
    message: impl FnOnce() -> String,
) -> Result<(), ValidationError> {
    if ok {
        Ok(())
    } else {
        Err(ValidationError::InvalidField {
            field: field.to_string(),
            message: message(),
        })
    }
}

/// Names end up in file paths and log fields.
fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

fn enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const BASIC_YAML: &str = r#"
run_id: "selfplay_smoke"
games:
  count: 6
  seed: 123
agents:
  - name: "greedy"
    kind: "heuristic"
  - name: "mcts"
    kind: "search"
    seed: 9
search:
  max_iterations: 50
outputs:
  jsonl: "out/{run_id}/games.jsonl"
  summary_md: "out/{run_id}/summary.md"
logging:
  enable_structured: true
  tracing_level: "debug"
"#;

    fn parse(yaml: &str) -> RunnerConfig {
        serde_yaml::from_str(yaml).expect("parse yaml")
    }

    fn invalid_field(config: &RunnerConfig) -> String {
        match config.validate() {
            Err(ValidationError::InvalidField { field, .. }) => field,
            Ok(()) => panic!("configuration unexpectedly valid"),
        }
    }

    #[test]
    fn loads_and_validates_basic_config() {
        let cfg = parse(BASIC_YAML);
        cfg.validate().expect("validate");

        assert!(cfg.games.swap_seats);
        assert_eq!(cfg.games.seatings(), 2);
        assert_eq!(cfg.logging.level(), Level::DEBUG);
        assert_eq!(cfg.agents[0].seed, None);
        assert_eq!(cfg.agents[1].seed, Some(9));

        let search = cfg.search.to_search_config();
        assert_eq!(search.max_iterations, Some(50));
        assert_eq!(search.time_limit, SearchConfig::default().time_limit);
        assert_eq!(search.time_limit, Duration::from_millis(1_150));

        assert_eq!(
            cfg.resolved_outputs().jsonl,
            PathBuf::from("out/selfplay_smoke/games.jsonl")
        );
    }

    #[test]
    fn logging_level_defaults_to_info() {
        let yaml = BASIC_YAML.replace("  tracing_level: \"debug\"\n", "");
        let cfg = parse(&yaml);
        cfg.validate().expect("validate");
        assert_eq!(cfg.logging.level(), Level::INFO);

        let cfg = parse(&BASIC_YAML.replace("\"debug\"", "\"loud\""));
        assert_eq!(invalid_field(&cfg), "logging.tracing_level");
    }

    #[test]
    fn rejects_wrong_agent_count() {
        let yaml = BASIC_YAML.replace(
            "  - name: \"mcts\"\n    kind: \"search\"\n    seed: 9\n",
            "",
        );
        assert_eq!(invalid_field(&parse(&yaml)), "agents");
    }

    #[test]
    fn rejects_duplicate_agents() {
        let yaml = BASIC_YAML.replace("name: \"mcts\"", "name: \"greedy\"");
        assert_eq!(invalid_field(&parse(&yaml)), "agents");
    }

    #[test]
    fn rejects_invalid_names() {
        let yaml = BASIC_YAML.replace("selfplay_smoke", "self play");
        assert_eq!(invalid_field(&parse(&yaml)), "run_id");

        let yaml = BASIC_YAML.replace("name: \"mcts\"", "name: \"../mcts\"");
        assert_eq!(invalid_field(&parse(&yaml)), "agents.name");
    }

    #[test]
    fn rejects_zero_games_and_bad_search_budget() {
        let yaml = BASIC_YAML.replace("count: 6", "count: 0");
        assert_eq!(invalid_field(&parse(&yaml)), "games.count");

        let yaml = BASIC_YAML.replace("max_iterations: 50", "max_iterations: 0");
        assert_eq!(invalid_field(&parse(&yaml)), "search.max_iterations");
    }

    #[test]
    fn unknown_kinds_and_keys_fail_to_parse() {
        let yaml = BASIC_YAML.replace("kind: \"search\"", "kind: \"oracle\"");
        assert!(serde_yaml::from_str::<RunnerConfig>(&yaml).is_err());

        let yaml = BASIC_YAML.replace("seed: 9", "difficulty: 9");
        assert!(serde_yaml::from_str::<RunnerConfig>(&yaml).is_err());
    }

    #[test]
    fn from_path_reports_the_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(BASIC_YAML.replace("count: 6", "count: 0").as_bytes())
            .expect("write yaml");
        let err = RunnerConfig::from_path(file.path()).expect_err("invalid config");
        assert!(matches!(&err, ConfigError::Invalid { path, .. } if path == file.path()));

        let missing = RunnerConfig::from_path("does/not/exist.yaml").expect_err("missing file");
        assert!(matches!(missing, ConfigError::Read { .. }));
    }
}
