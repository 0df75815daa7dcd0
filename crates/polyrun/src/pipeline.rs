//! Execution pipeline
//!
//! Resolves the language, provisions a workspace, runs the code and releases
//! the workspace before returning. Only resolution failures and
//! infrastructure faults surface as errors; every compile or run outcome of
//! the submitted program is a successful execution carrying `success=false`.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::resolver::{ResolveError, resolve};
use crate::runner::{Runner, RunnerError};
use crate::types::{ExecutionRequest, ExecutionResult};
use crate::workspace::{Workspace, WorkspaceError};

/// Errors that escape the pipeline to the caller
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The request named an unsupported extension or language
    #[error(transparent)]
    Unsupported(#[from] ResolveError),

    /// The workspace could not be created
    #[error("workspace creation failed: {0}")]
    Workspace(#[from] WorkspaceError),

    /// A toolchain could not be started or the filesystem failed mid-run
    #[error("runner failed: {0}")]
    Runner(#[from] RunnerError),
}

impl PipelineError {
    /// True when the request itself was at fault (HTTP 400 territory)
    pub fn is_client_error(&self) -> bool {
        matches!(self, PipelineError::Unsupported(_))
    }
}

/// Runs execution requests end to end
///
/// Cheap to clone; clones share the same configuration.
#[derive(Debug, Clone)]
pub struct Pipeline {
    runner: Runner,
}

impl Pipeline {
    pub fn new(config: impl Into<Arc<Config>>) -> Self {
        Self {
            runner: Runner::new(config),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(Config::default())
    }

    pub fn config(&self) -> &Config {
        self.runner.config()
    }

    /// Execute one request
    #[instrument(skip(self, request), fields(language_target = ?request.target))]
    pub async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult, PipelineError> {
        let language = resolve(&request.target)?;
        debug!(%language, code = %request.code, "resolved language");

        let config = self.runner.config();
        let workspace = Workspace::acquire(&config.workspace_root(), &config.workspace_prefix).await?;

        // Runs to completion before release; a panic inside still drops the
        // workspace, which removes the directory.
        let outcome = self.runner.run(language, &request.code, &workspace).await;
        workspace.release().await;

        let result = outcome?.into_result(language);
        info!(
            %language,
            success = result.success,
            execution_time = result.execution_time,
            "execution finished"
        );
        Ok(result)
    }
}
