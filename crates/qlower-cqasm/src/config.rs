//! Emitter configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default pragma namespace.
pub const DEFAULT_NAMESPACE: &str = "ql";

/// Where a listing goes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputTarget {
    /// Returned to the caller for printing.
    #[default]
    Stdout,
    /// Written to `<dir>/<program>.qasm`.
    Directory(PathBuf),
}

/// How much commentary the listing carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    /// No blank separator lines.
    Quiet,
    /// Header, blank line, body.
    #[default]
    Normal,
    /// Adds a total-cycle comment under the header.
    Detailed,
}

/// Emitter settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmitterConfig {
    /// Pragma namespace, as in `pragma @ql.name(...)`.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Output destination.
    #[serde(default)]
    pub output: OutputTarget,
    /// Commentary level.
    #[serde(default)]
    pub verbosity: Verbosity,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            output: OutputTarget::Stdout,
            verbosity: Verbosity::Normal,
        }
    }
}

impl EmitterConfig {
    /// Write listings into `dir`.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output = OutputTarget::Directory(dir.into());
        self
    }

    /// Set the commentary level.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set the pragma namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }
}
