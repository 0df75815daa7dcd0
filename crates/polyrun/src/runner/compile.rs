//! Compilation step for code execution
//!
//! Handles compiling source code using language-specific compilers.

use std::path::Path;

use tracing::{debug, instrument};

use crate::config::{CompileConfig, Placeholders};
use crate::process::{CapturedOutput, run_to_completion};
use crate::runner::RunnerError;

/// Prefix of the in-band error reported when the compiler fails
pub const COMPILATION_ERROR_PREFIX: &str = "Compilation error: ";

/// Result of a compilation
#[derive(Debug, Clone)]
pub struct CompileResult {
    /// Whether compilation succeeded
    pub success: bool,

    /// Captured compiler process output
    pub process: CapturedOutput,
}

impl CompileResult {
    /// In-band error message for a failed compilation
    pub fn error_message(&self) -> String {
        format!("{COMPILATION_ERROR_PREFIX}{}", self.process.stderr)
    }
}

/// Run the compiler for a source file already written to the workspace
#[instrument(skip(compile_config, placeholders))]
pub async fn compile(
    compile_config: &CompileConfig,
    placeholders: &Placeholders<'_>,
    workspace: &Path,
) -> Result<CompileResult, RunnerError> {
    let command = placeholders.expand_command(&compile_config.command);
    debug!(?command, "compiling");

    let process = run_to_completion(&command, workspace, &compile_config.env).await?;
    let success = process.is_success();

    debug!(success, exit_code = ?process.exit_code, "compilation complete");

    Ok(CompileResult { success, process })
}
