//! Configuration loading for a Nature Engine run.
//!
//! The configuration lives in `nature-config.yaml`. Every section and every
//! field has a default, so an empty document (or no file at all) describes
//! a complete run. Numeric bounds are not checked here;
//! [`Community::create`](crate::community::Community::create) owns them.

use std::path::Path;

use nature_mind::MindConfig;
use nature_types::{Strategy, StrategyCount};
use serde::Deserialize;

use crate::community::CommunityParams;
use crate::policy::Payoffs;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level run configuration, mirroring `nature-config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NatureConfig {
    /// Community parameters and seed.
    #[serde(default)]
    pub community: CommunityConfig,

    /// Donation game payoffs.
    #[serde(default)]
    pub payoffs: Payoffs,

    /// Composition of generation 0.
    #[serde(default = "default_population")]
    pub population: Vec<StrategyCount>,

    /// Mind service connection.
    #[serde(default)]
    pub mind: MindConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for NatureConfig {
    fn default() -> Self {
        Self {
            community: CommunityConfig::default(),
            payoffs: Payoffs::default(),
            population: default_population(),
            mind: MindConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl NatureConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `AGENTS_URL` overrides `mind.url`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.mind.apply_env_overrides();
        Ok(config)
    }
}

/// Community section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommunityConfig {
    /// Maximum onlookers per interaction.
    #[serde(default = "default_num_onlookers")]
    pub num_onlookers: u32,

    /// Generations to run.
    #[serde(default = "default_num_generations")]
    pub num_generations: u32,

    /// Timepoints per generation.
    #[serde(default = "default_length_of_generations")]
    pub length_of_generations: u64,

    /// Seed for the community's random source. Absent means OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            num_onlookers: default_num_onlookers(),
            num_generations: default_num_generations(),
            length_of_generations: default_length_of_generations(),
            seed: None,
        }
    }
}

impl CommunityConfig {
    /// The numeric parameters as handed to the community.
    pub const fn params(&self) -> CommunityParams {
        CommunityParams {
            num_onlookers: self.num_onlookers,
            num_generations: self.num_generations,
            length_of_generations: self.length_of_generations,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive (trace, debug, info, warn, error).
    /// `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

const fn default_num_onlookers() -> u32 {
    5
}

const fn default_num_generations() -> u32 {
    10
}

const fn default_length_of_generations() -> u64 {
    30
}

fn default_log_level() -> String {
    String::from("info")
}

fn default_population() -> Vec<StrategyCount> {
    vec![
        StrategyCount::new(
            Strategy::new("cooperator", "promote_self", "naive_trust_model"),
            6,
        ),
        StrategyCount::new(
            Strategy::new("defector", "spread_negative_trust", "void_trust_model"),
            4,
        ),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use nature_types::total_population;

    use super::*;

    #[test]
    fn defaults_describe_a_valid_run() {
        let config = NatureConfig::default();
        assert_eq!(config.community.params(), CommunityParams::default());
        assert!(config.community.params().validate().is_ok());
        assert_eq!(config.community.seed, None);
        assert_eq!(total_population(&config.population), 10);
        assert_eq!(config.payoffs, Payoffs::default());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
community:
  num_onlookers: 3
  num_generations: 4
  length_of_generations: 12
  seed: 99

payoffs:
  cooperation_cost: 2
  cooperation_benefit: 5

population:
  - strategy:
      donor_strategy: "stingy"
      non_donor_strategy: "lazy"
      trust_model: "void"
      options: ["verbose"]
    count: 7

mind:
  url: "http://mind:5000"
  request_timeout_ms: 2500

logging:
  level: "debug"
  format: "json"
"#;
        let config = NatureConfig::parse(yaml).unwrap();
        assert_eq!(config.community.params().num_onlookers, 3);
        assert_eq!(config.community.seed, Some(99));
        assert_eq!(config.payoffs.cooperation_benefit, 5);
        assert_eq!(config.population.len(), 1);
        let entry = config.population.first().unwrap();
        assert_eq!(entry.count, 7);
        assert_eq!(entry.strategy.options, vec![String::from("verbose")]);
        assert_eq!(config.mind.request_timeout_ms, Some(2500));
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn partial_sections_fill_in_defaults() {
        let config = NatureConfig::parse("community:\n  seed: 7\n").unwrap();
        assert_eq!(config.community.seed, Some(7));
        assert_eq!(config.community.num_generations, 10);
        assert_eq!(config.payoffs, Payoffs::default());
        assert_eq!(total_population(&config.population), 10);
    }

    #[test]
    fn empty_document_is_all_defaults() {
        let config = NatureConfig::parse("").unwrap();
        assert_eq!(config.community, CommunityConfig::default());
    }

    #[test]
    fn invalid_yaml_is_rejected() {
        let err = NatureConfig::parse("community: [not, a, map").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }
}
