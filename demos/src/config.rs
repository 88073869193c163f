//! Configuration for the demo binaries.
//!
//! Settings are resolved in this order (highest first):
//! 1. Command-line flags
//! 2. Environment variables (`QTUTOR_` prefix)
//! 3. Configuration file (YAML, default `~/.qtutor/config.yaml`)
//! 4. Default values
//!
//! This module covers layers 2 to 4; the binaries apply their own flags on
//! top of the loaded [`DemoConfig`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment variable overriding the shot count.
pub const ENV_SHOTS: &str = "QTUTOR_SHOTS";
/// Environment variable overriding the Bernstein-Vazirani secret.
pub const ENV_SECRET: &str = "QTUTOR_SECRET";
/// Environment variable naming a recorded counts file.
pub const ENV_COUNTS_FILE: &str = "QTUTOR_COUNTS_FILE";
/// Environment variable overriding the observables, comma or space separated.
pub const ENV_OBSERVABLES: &str = "QTUTOR_OBSERVABLES";

/// Settings shared by the demo binaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Shots requested from the backend.
    #[serde(default = "default_shots")]
    pub shots: u32,

    /// Secret bit string for Bernstein-Vazirani.
    #[serde(default = "default_secret")]
    pub secret: String,

    /// Pauli labels estimated by the Bell demo.
    #[serde(default = "default_observables")]
    pub observables: Vec<String>,

    /// Use a shared ancilla as the oracle target.
    #[serde(default = "default_true")]
    pub use_ancilla: bool,

    /// Give every input qubit its own target (only without ancilla).
    #[serde(default)]
    pub use_paired: bool,

    /// JSON file of recorded counts to replay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counts_file: Option<PathBuf>,
}

fn default_shots() -> u32 {
    1024
}

fn default_secret() -> String {
    "10110101".to_string()
}

fn default_observables() -> Vec<String> {
    ["IZ", "IX", "ZI", "XI", "ZZ", "XX", "YY"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_true() -> bool {
    true
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            shots: default_shots(),
            secret: default_secret(),
            observables: default_observables(),
            use_ancilla: true,
            use_paired: false,
            counts_file: None,
        }
    }
}

impl DemoConfig {
    /// Default configuration file location, `~/.qtutor/config.yaml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".qtutor").join("config.yaml"))
    }

    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: DemoConfig = serde_yaml_ng::from_str(&contents)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration from file and environment.
    ///
    /// An explicit `path` must exist. Without one, the default path is used
    /// when present and defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(default) => Self::from_file(default)?,
                None => Self::default(),
            },
        };

        let config = config.merge_env(|var| std::env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `QTUTOR_*` overrides read through `lookup`.
    ///
    /// Only variables that are set override the current values.
    pub fn merge_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(v) = lookup(ENV_SHOTS) {
            self.shots = v.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_SHOTS,
                value: v.clone(),
            })?;
        }
        if let Some(v) = lookup(ENV_SECRET) {
            self.secret = v.trim().to_string();
        }
        if let Some(v) = lookup(ENV_COUNTS_FILE) {
            self.counts_file = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup(ENV_OBSERVABLES) {
            self.observables = split_labels(&v);
        }
        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shots == 0 {
            return Err(ConfigError::Validation(
                "shots must be greater than 0".to_string(),
            ));
        }
        if self.secret.is_empty() {
            return Err(ConfigError::Validation(
                "secret must not be empty".to_string(),
            ));
        }
        if self.observables.is_empty() {
            return Err(ConfigError::Validation(
                "at least one observable is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Split a list of Pauli labels on commas and whitespace.
pub fn split_labels(list: &str) -> Vec<String> {
    list.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Cannot read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for [`DemoConfig`].
    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    /// An environment override could not be parsed.
    #[error("Invalid value '{value}' for {var}")]
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
    },

    /// A value is out of range.
    #[error("Validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = DemoConfig::default();
        assert_eq!(config.shots, 1024);
        assert_eq!(config.secret, "10110101");
        assert_eq!(config.observables.len(), 7);
        assert!(config.use_ancilla);
        assert!(!config.use_paired);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: DemoConfig =
            serde_yaml_ng::from_str("shots: 100\nuse_ancilla: false\n").unwrap();
        assert_eq!(config.shots, 100);
        assert!(!config.use_ancilla);
        assert_eq!(config.secret, "10110101");
    }

    #[test]
    fn test_env_overrides_file_values() {
        let config = DemoConfig {
            shots: 10,
            ..DemoConfig::default()
        };
        let merged = config
            .merge_env(env(&[
                (ENV_SHOTS, "2048"),
                (ENV_SECRET, " 101 "),
                (ENV_OBSERVABLES, "ZZ, XX  YY"),
            ]))
            .unwrap();
        assert_eq!(merged.shots, 2048);
        assert_eq!(merged.secret, "101");
        assert_eq!(merged.observables, vec!["ZZ", "XX", "YY"]);
        assert!(merged.counts_file.is_none());
    }

    #[test]
    fn test_unset_env_leaves_values() {
        let config = DemoConfig::default();
        let merged = config.clone().merge_env(env(&[])).unwrap();
        assert_eq!(merged, config);
    }

    #[test]
    fn test_invalid_env_shots() {
        let err = DemoConfig::default()
            .merge_env(env(&[(ENV_SHOTS, "lots")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { var: ENV_SHOTS, .. }));
    }

    #[test]
    fn test_validate_rejects_zero_shots_and_empty_lists() {
        let mut config = DemoConfig::default();
        config.shots = 0;
        assert!(config.validate().is_err());

        let mut config = DemoConfig::default();
        config.secret.clear();
        assert!(config.validate().is_err());

        let mut config = DemoConfig::default();
        config.observables.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "secret: \"0110\"\ncounts_file: counts.json\n").unwrap();

        let config = DemoConfig::from_file(&path).unwrap();
        assert_eq!(config.secret, "0110");
        assert_eq!(config.counts_file, Some(PathBuf::from("counts.json")));

        let missing = DemoConfig::from_file(dir.path().join("absent.yaml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
