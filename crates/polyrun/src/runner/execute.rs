//! Execution step for code running
//!
//! Runs the compiled artifact or the interpreter under the configured
//! wall-clock limit and maps the outcome onto a [`RunOutput`].

use std::path::Path;
use std::time::Duration;

use tracing::{debug, instrument};

use crate::config::{Placeholders, RunConfig};
use crate::process::{RuntimeTimeout, run_with_timeout};
use crate::runner::RunnerError;
use crate::types::RunOutput;

/// Run the program for a prepared workspace
#[instrument(skip(run_config, placeholders))]
pub async fn execute(
    run_config: &RunConfig,
    placeholders: &Placeholders<'_>,
    workspace: &Path,
    timeout: Duration,
) -> Result<RunOutput, RunnerError> {
    let command = placeholders.expand_command(&run_config.command);
    debug!(?command, "executing program");

    let outcome = run_with_timeout(&command, workspace, &run_config.env, timeout).await?;
    let output = match outcome {
        Ok(captured) => RunOutput {
            success: captured.is_success(),
            output: captured.stdout,
            error: captured.stderr,
            execution_time: 0,
        },
        Err(timeout) => timed_out(timeout),
    };

    debug!(success = output.success, "execution complete");
    Ok(output)
}

/// In-band result for a run step that hit its limit
pub fn timed_out(timeout: RuntimeTimeout) -> RunOutput {
    let secs = timeout.limit.as_secs();
    RunOutput {
        output: String::new(),
        error: format!("Execution timed out (exceeded {secs} seconds)"),
        success: false,
        execution_time: secs,
    }
}
