//! Language runners for Polyrun
//!
//! Writes source into a workspace, compiles it when the toolchain has a
//! compile step, and runs the result under the configured timeout.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, instrument};

pub use crate::runner::compile::{COMPILATION_ERROR_PREFIX, CompileResult};
pub use crate::runner::entry::public_class;
pub use crate::runner::execute::timed_out;

mod compile;
mod entry;
mod execute;

use crate::config::{Config, Placeholders, language::expand_file_name};
use crate::process::ProcessError;
use crate::types::{RunOutput, SupportedLanguage};
use crate::workspace::{Workspace, WorkspaceError};

/// In-band error reported when Java code declares no public class
pub const MISSING_ENTRY_POINT: &str = "Could not find public class name in Java code";

/// Infrastructure failures while running code
///
/// Compile and run failures of the submitted program are not errors; they are
/// reported in-band through [`RunOutput`].
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("workspace error: {0}")]
    Workspace(#[from] WorkspaceError),

    #[error("process error: {0}")]
    Process(#[from] ProcessError),
}

/// High-level runner for code execution
#[derive(Debug, Clone)]
pub struct Runner {
    config: Arc<Config>,
}

impl Runner {
    /// Create a new runner with the given configuration
    pub fn new(config: impl Into<Arc<Config>>) -> Self {
        Self {
            config: config.into(),
        }
    }

    /// Create a new runner with default configuration
    pub fn with_defaults() -> Self {
        Self::new(Config::default())
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Write, compile if needed, and run `code` inside `workspace`
    #[instrument(skip(self, code, workspace), fields(workspace = %workspace.id()))]
    pub async fn run(
        &self,
        language: SupportedLanguage,
        code: &str,
        workspace: &Workspace,
    ) -> Result<RunOutput, RunnerError> {
        let toolchain = self.config.languages.get(language);

        let class = match entry_class(language, code) {
            Ok(class) => class,
            Err(failure) => return Ok(failure),
        };

        let source_name = expand_file_name(&toolchain.source_name, class);
        let source = workspace.write_file(&source_name, code.as_bytes()).await?;
        debug!(source_name, "wrote source file");

        let output_name = match toolchain.compile {
            Some(ref compile) => expand_file_name(&compile.output_name, class),
            None => source_name,
        };
        let output = workspace.file_path(&output_name)?;

        let placeholders = Placeholders {
            source: &source,
            output: &output,
            workspace: workspace.path(),
            class,
        };

        if let Some(ref compile_config) = toolchain.compile {
            let result = compile::compile(compile_config, &placeholders, workspace.path()).await?;
            if !result.success {
                return Ok(RunOutput::failure(result.error_message()));
            }
        }

        execute::execute(
            &toolchain.run,
            &placeholders,
            workspace.path(),
            self.config.timeout_duration(),
        )
        .await
    }
}

/// Entry class for languages that need one; empty for the others
///
/// Java sources must declare a public class, which names both the source
/// file and the class handed to the launcher.
fn entry_class(language: SupportedLanguage, code: &str) -> Result<&str, RunOutput> {
    match language {
        SupportedLanguage::Java => {
            public_class(code).ok_or_else(|| RunOutput::failure(MISSING_ENTRY_POINT))
        }
        SupportedLanguage::Python | SupportedLanguage::C | SupportedLanguage::Cpp => Ok(""),
    }
}
