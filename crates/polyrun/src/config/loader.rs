//! Configuration file loading for Polyrun
//!
//! Handles loading and parsing configuration files using the config crate.

use std::path::Path;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};

use crate::config::{Config, ConfigError, EXAMPLE_CONFIG};

/// Prefix of environment variables that override file settings
pub const ENV_PREFIX: &str = "POLYRUN";

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::ReadFile {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            });
        }
        let config = ConfigBuilder::builder()
            .add_source(File::from(path))
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        let config = ConfigBuilder::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load a file (or the embedded defaults) with `POLYRUN_*` overrides
    ///
    /// Scalar settings can be overridden from the environment, e.g.
    /// `POLYRUN_TIMEOUT=5` or `POLYRUN_WORKSPACE_ROOT=/scratch`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, env_source())
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();
        builder = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::ReadFile {
                        path: path.to_path_buf(),
                        source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
                    });
                }
                builder.add_source(File::from(path))
            }
            None => builder.add_source(File::from_str(EXAMPLE_CONFIG, FileFormat::Toml)),
        };

        let config: Config = builder.add_source(env).build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout == 0 {
            return Err(ConfigError::Invalid(
                "timeout must be at least one second".to_owned(),
            ));
        }
        if self.workspace_prefix.is_empty() {
            return Err(ConfigError::Invalid(
                "workspace_prefix must not be empty".to_owned(),
            ));
        }
        if self.workspace_prefix.contains(['/', '\\']) || self.workspace_prefix.contains("..") {
            return Err(ConfigError::Invalid(format!(
                "workspace_prefix '{}' must be a plain directory name",
                self.workspace_prefix
            )));
        }

        for (lang, toolchain) in self.languages.iter() {
            if toolchain.source_name.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "language '{lang}' has empty source_name"
                )));
            }
            if toolchain.run.command.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "language '{lang}' has empty run command"
                )));
            }
            if let Some(ref compile) = toolchain.compile {
                if compile.command.is_empty() {
                    return Err(ConfigError::Invalid(format!(
                        "language '{lang}' has empty compile command"
                    )));
                }
                if compile.output_name.is_empty() {
                    return Err(ConfigError::Invalid(format!(
                        "language '{lang}' has empty output_name"
                    )));
                }
            }
        }

        Ok(())
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
