//! Configuration for the qlower CLI.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with `QLOWER_` prefix)
//!
//! Environment variables override file values, which override defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use qlower_compile::TimingModel;
use qlower_cqasm::{DEFAULT_NAMESPACE, EmitterConfig, OutputTarget, Verbosity};
use qlower_ir::is_valid_name;

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QlowerConfig {
    /// Directory for written listings; stdout when unset.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Pragma namespace in emitted listings.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Instruction durations.
    #[serde(default)]
    pub timing: TimingModel,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl Default for QlowerConfig {
    fn default() -> Self {
        QlowerConfig {
            output_dir: None,
            log_level: default_log_level(),
            namespace: default_namespace(),
            timing: TimingModel::default(),
        }
    }
}

impl QlowerConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.as_ref().display())))?;
        let config: QlowerConfig = serde_yaml_ng::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with the following precedence:
    /// 1. Environment variables
    /// 2. File, if provided
    /// 3. Defaults
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => QlowerConfig::default(),
        };

        let config = config.merge_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup.
    ///
    /// Only variables the lookup returns override the current values.
    /// An unparsable `QLOWER_READOUT_GAP` is ignored.
    pub fn merge_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("QLOWER_OUTPUT_DIR") {
            self.output_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("QLOWER_LOG_LEVEL") {
            self.log_level = v;
        }
        if let Some(v) = lookup("QLOWER_NAMESPACE") {
            self.namespace = v;
        }
        if let Some(v) = lookup("QLOWER_READOUT_GAP") {
            if let Ok(val) = v.parse() {
                self.timing.readout_gap = val;
            }
        }
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: {other}"
                )));
            }
        }

        if !is_valid_name(&self.namespace) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid namespace: '{}'",
                self.namespace
            )));
        }

        self.timing
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    /// Emitter settings derived from this configuration.
    ///
    /// `output_dir` overrides the configured directory.
    pub fn emitter_config(&self, output_dir: Option<&Path>, verbosity: Verbosity) -> EmitterConfig {
        let output = match output_dir.or(self.output_dir.as_deref()) {
            Some(dir) => OutputTarget::Directory(dir.to_path_buf()),
            None => OutputTarget::Stdout,
        };
        EmitterConfig {
            namespace: self.namespace.clone(),
            output,
            verbosity,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
