//! Configuration types for import-patterns.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::policy::{PolicyEntry, PolicyError, PolicySet};
use crate::types::Severity;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Severity assigned to every violation (default: "error").
    #[serde(default = "default_severity")]
    pub severity: Severity,

    /// Documentation link attached to every violation.
    #[serde(default)]
    pub docs: Option<String>,

    /// Abort the run when a source file cannot be parsed.
    #[serde(default)]
    pub fail_on_parse_error: bool,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Policies in declaration order.
    #[serde(default)]
    pub policies: Vec<PolicyEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            severity: default_severity(),
            docs: None,
            fail_on_parse_error: false,
            analyzer: AnalyzerConfig::default(),
            policies: Vec::new(),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Compiles the configured policies.
    ///
    /// # Errors
    ///
    /// Returns an error if no policies are defined or any entry fails to
    /// compile.
    pub fn policy_set(&self) -> Result<PolicySet, ConfigError> {
        if self.policies.is_empty() {
            return Err(ConfigError::NoPolicies);
        }
        Ok(PolicySet::new(self.policies.iter().cloned())?)
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Root directory; file paths are matched relative to it.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude from analysis.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: default_exclude(),
            respect_gitignore: true,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_exclude() -> Vec<String> {
    vec!["**/node_modules/**".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_severity() -> Severity {
    Severity::Error
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// No `[[policies]]` entries.
    #[error("no [[policies]] defined")]
    NoPolicies,

    /// A policy entry failed to compile.
    #[error(transparent)]
    Policy(#[from] PolicyError),
}
