//! Child process spawning and output capture
//!
//! Compilers run to completion; user programs run under a wall-clock limit.
//! stdout and stderr are always drained concurrently with the wait so a
//! chatty child can never block on a full pipe.

use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tracing::{debug, instrument, warn};

/// Errors that prevent a child process from being run at all
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("empty command")]
    EmptyCommand,

    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error while running '{program}': {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Exit status and captured streams of a finished child
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    /// Exit code, or None if the child was killed by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    /// Check if the child exited with code 0
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// The run step did not finish within its wall-clock limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("process exceeded {} seconds", .limit.as_secs())]
pub struct RuntimeTimeout {
    pub limit: Duration,
}

fn build_command(
    argv: &[String],
    cwd: &Path,
    env: &HashMap<String, String>,
) -> Result<Command, ProcessError> {
    let program = argv.first().ok_or(ProcessError::EmptyCommand)?;

    let mut command = Command::new(program);
    command
        .args(&argv[1..])
        .current_dir(cwd)
        .envs(env)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    Ok(command)
}

/// Run a command until it exits and capture its output (for compilation)
#[instrument(skip(env))]
pub async fn run_to_completion(
    argv: &[String],
    cwd: &Path,
    env: &HashMap<String, String>,
) -> Result<CapturedOutput, ProcessError> {
    let program = argv.first().cloned().unwrap_or_default();
    let output = build_command(argv, cwd, env)?
        .output()
        .await
        .map_err(|source| ProcessError::Spawn { program, source })?;

    let captured = CapturedOutput {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    debug!(exit_code = ?captured.exit_code, "process finished");
    Ok(captured)
}

/// Run a command under a wall-clock limit
///
/// The child leads its own process group. When the limit expires the whole
/// group is killed and the child reaped before [`RuntimeTimeout`] is returned.
#[instrument(skip(env))]
pub async fn run_with_timeout(
    argv: &[String],
    cwd: &Path,
    env: &HashMap<String, String>,
    limit: Duration,
) -> Result<Result<CapturedOutput, RuntimeTimeout>, ProcessError> {
    let program = argv.first().cloned().unwrap_or_default();
    let mut command = build_command(argv, cwd, env)?;
    own_process_group(&mut command);
    command.kill_on_drop(true);

    let mut child = command.spawn().map_err(|source| ProcessError::Spawn {
        program: program.clone(),
        source,
    })?;
    let pid = child.id();
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let finished = tokio::time::timeout(limit, async {
        tokio::try_join!(child.wait(), read_stream(stdout), read_stream(stderr))
    })
    .await;

    match finished {
        Ok(result) => {
            let (status, stdout, stderr) =
                result.map_err(|source| ProcessError::Io { program, source })?;
            let captured = CapturedOutput {
                exit_code: status.code(),
                stdout: String::from_utf8_lossy(&stdout).into_owned(),
                stderr: String::from_utf8_lossy(&stderr).into_owned(),
            };
            debug!(exit_code = ?captured.exit_code, "process finished");
            Ok(Ok(captured))
        }
        Err(_) => {
            warn!(?pid, limit_secs = limit.as_secs(), "process timed out, killing process group");
            terminate(pid, &mut child).await;
            Ok(Err(RuntimeTimeout { limit }))
        }
    }
}

async fn read_stream<R: AsyncRead + Unpin>(stream: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut stream) = stream {
        stream.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

#[cfg(unix)]
fn own_process_group(command: &mut Command) {
    command.process_group(0);
}

#[cfg(not(unix))]
fn own_process_group(_command: &mut Command) {}

#[cfg(unix)]
fn kill_group(pid: u32) {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
        warn!(pid, error = %e, "failed to kill process group");
    }
}

#[cfg(not(unix))]
fn kill_group(_pid: u32) {}

/// Kill the child's process group, then the child itself, and reap it
async fn terminate(pid: Option<u32>, child: &mut Child) {
    if let Some(pid) = pid {
        kill_group(pid);
    }

    // Reaps the leader; SIGKILL on an already-dead child is harmless
    if let Err(e) = child.kill().await {
        debug!(error = %e, "child already gone");
    }
}
