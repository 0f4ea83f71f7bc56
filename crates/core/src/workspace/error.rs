//! Error types for the workspace module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while allocating a workspace.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// A workspace directory could not be created.
    #[error("Failed to create workspace directory: {path}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WorkspaceError {
    pub fn create(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Create {
            path: path.into(),
            source,
        }
    }
}
