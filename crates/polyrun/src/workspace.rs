//! Per-request workspace lifecycle
//!
//! A [`Workspace`] is a freshly created directory under the workspace root,
//! named with a random UUID so concurrent requests never share one. It is
//! removed by [`Workspace::release`], or on drop if release was skipped.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Errors that occur while provisioning or using a workspace
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("failed to create workspace at {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid path: {0}")]
    InvalidPath(String),
}

/// An exclusively owned temporary directory for one execution
///
/// # Cleanup
///
/// Call [`release()`](Self::release) when the execution finishes. If the
/// workspace is dropped without being released (for example because the
/// owning task panicked or was cancelled), the directory is removed
/// synchronously in `Drop`.
#[derive(Debug)]
pub struct Workspace {
    /// Random identity of this workspace
    id: Uuid,

    /// Path to the workspace directory
    path: PathBuf,

    /// Whether the directory still needs to be removed
    live: bool,
}

impl Workspace {
    /// Create a new uniquely named workspace under `root`
    #[instrument]
    pub async fn acquire(root: &Path, prefix: &str) -> Result<Self, WorkspaceError> {
        let id = Uuid::new_v4();
        let path = root.join(format!("{prefix}{id}"));

        // create_dir (not create_dir_all) so an existing directory is never reused
        tokio::fs::create_dir(&path)
            .await
            .map_err(|source| WorkspaceError::Create {
                path: path.clone(),
                source,
            })?;

        debug!(?path, "workspace created");

        Ok(Self {
            id,
            path,
            live: true,
        })
    }

    /// Get the workspace ID
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Get the path to the workspace directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the path to a file inside the workspace
    ///
    /// Returns an error if the name would escape the workspace.
    pub fn file_path(&self, name: &str) -> Result<PathBuf, WorkspaceError> {
        if name.is_empty() || name.contains("..") || name.starts_with('/') {
            return Err(WorkspaceError::InvalidPath(format!(
                "path traversal not allowed: {name}"
            )));
        }
        Ok(self.path.join(name))
    }

    /// Write a file into the workspace, returning its absolute path
    #[instrument(skip(self, content), fields(workspace = %self.id))]
    pub async fn write_file(&self, name: &str, content: &[u8]) -> Result<PathBuf, WorkspaceError> {
        let path = self.file_path(name)?;
        tokio::fs::write(&path, content)
            .await
            .map_err(|source| WorkspaceError::Write {
                path: path.clone(),
                source,
            })?;
        debug!(?path, len = content.len(), "wrote file to workspace");
        Ok(path)
    }

    /// Remove the workspace directory tree
    ///
    /// Failures are logged and swallowed; they never affect the result of the
    /// execution that used this workspace.
    #[instrument(skip(self), fields(workspace = %self.id))]
    pub async fn release(mut self) {
        self.live = false;
        match tokio::fs::remove_dir_all(&self.path).await {
            Ok(()) => debug!("workspace removed"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to remove workspace"),
        }
    }

    /// Check if the directory has not been released yet
    pub fn is_live(&self) -> bool {
        self.live
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if self.live {
            warn!(
                workspace = %self.id,
                path = %self.path.display(),
                "workspace dropped without release, removing synchronously"
            );
            if let Err(e) = std::fs::remove_dir_all(&self.path) {
                warn!(workspace = %self.id, error = %e, "best-effort workspace removal failed");
            }
        }
    }
}
