use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

pub use crate::config::language::{CompileConfig, Languages, Placeholders, RunConfig, Toolchain};

pub mod language;
mod loader;

/// Example configuration embedded at compile time.
///
/// Library users can access this to generate a starter config file.
pub const EXAMPLE_CONFIG: &str = include_str!("../../polyrun.example.toml");

/// Run-step wall-clock limit used when the config does not set one
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] config::ConfigError),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Config for Polyrun
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Wall-clock limit for the run step, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Directory that holds per-request workspaces (system temp dir if unset).
    #[serde(default)]
    pub workspace_root: Option<PathBuf>,

    /// Prefix of every workspace directory name.
    #[serde(default = "default_workspace_prefix")]
    pub workspace_prefix: String,

    /// Toolchain for each supported language
    pub languages: Languages,
}

impl Config {
    /// Create a new config with the embedded default toolchains
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory under which workspaces are created
    pub fn workspace_root(&self) -> PathBuf {
        self.workspace_root
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }

    /// Run-step timeout as a duration
    pub fn timeout_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout)
    }

    /// Message reported in-band when the run step exceeds the timeout
    pub fn timeout_message(&self) -> String {
        format!("Execution timed out (exceeded {} seconds)", self.timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::parse_toml(EXAMPLE_CONFIG).expect("embedded default config should be valid")
    }
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_workspace_prefix() -> String {
    "code_execution_".to_owned()
}
