//! Workspace allocation and removal.

use chrono::{DateTime, Utc};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

use super::error::WorkspaceError;
use crate::archive::ARCHIVE_FILE_NAME;
use crate::config::WorkspaceConfig;
use crate::metrics::WORKSPACES_ACTIVE;

/// Name of the output region inside a workspace.
pub const OUTPUT_DIR_NAME: &str = "out";

/// An isolated directory tree owned by one request.
#[derive(Debug, Clone)]
pub struct Workspace {
    id: Uuid,
    root: PathBuf,
    out_dir: PathBuf,
    created_at: DateTime<Utc>,
}

impl Workspace {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Workspace root; received files are stored here.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Output region holding converted artifacts.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Path of an input file in the workspace root.
    ///
    /// Only the final component of `file_name` is used, so a name carrying
    /// directories can never point outside the workspace.
    pub fn input_path(&self, file_name: &str) -> PathBuf {
        let name = Path::new(file_name)
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| crate::batch::DEFAULT_UPLOAD_NAME.into());
        self.root.join(name)
    }

    /// Path of an artifact in the output region.
    pub fn output_path(&self, stem: &str, extension: &str) -> PathBuf {
        self.out_dir.join(format!("{}.{}", stem, extension))
    }

    /// Where the archive for this request is written.
    pub fn archive_path(&self) -> PathBuf {
        self.root.join(ARCHIVE_FILE_NAME)
    }

    /// Whether `path` lies inside this workspace.
    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.root)
            && !path
                .components()
                .any(|c| matches!(c, Component::ParentDir))
    }
}

/// Creates and destroys request workspaces under a common root.
#[derive(Debug, Clone)]
pub struct WorkspaceManager {
    config: WorkspaceConfig,
}

impl WorkspaceManager {
    pub fn new(config: WorkspaceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// Allocates a fresh workspace with an empty output region.
    pub async fn create(&self) -> Result<Workspace, WorkspaceError> {
        tokio::fs::create_dir_all(&self.config.temp_root)
            .await
            .map_err(|e| WorkspaceError::create(&self.config.temp_root, e))?;

        let id = Uuid::new_v4();
        let root = self
            .config
            .temp_root
            .join(format!("{}{}", self.config.prefix, id));

        // create_dir, not create_dir_all: an existing directory is never reused
        tokio::fs::create_dir(&root)
            .await
            .map_err(|e| WorkspaceError::create(&root, e))?;

        let out_dir = root.join(OUTPUT_DIR_NAME);
        if let Err(e) = tokio::fs::create_dir(&out_dir).await {
            let _ = tokio::fs::remove_dir_all(&root).await;
            return Err(WorkspaceError::create(&out_dir, e));
        }

        WORKSPACES_ACTIVE.inc();
        debug!(workspace_id = %id, path = %root.display(), "Workspace created");

        Ok(Workspace {
            id,
            root,
            out_dir,
            created_at: Utc::now(),
        })
    }

    /// Removes the workspace tree. Best effort: failures are logged, and an
    /// already-removed workspace counts as success.
    pub async fn destroy(&self, workspace: &Workspace) {
        match tokio::fs::remove_dir_all(workspace.root()).await {
            Ok(()) => {
                WORKSPACES_ACTIVE.dec();
                debug!(
                    workspace_id = %workspace.id(),
                    age_ms = (Utc::now() - workspace.created_at()).num_milliseconds(),
                    "Workspace destroyed"
                );
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(workspace_id = %workspace.id(), "Workspace already removed");
            }
            Err(e) => {
                warn!(
                    workspace_id = %workspace.id(),
                    path = %workspace.root().display(),
                    error = %e,
                    "Failed to destroy workspace"
                );
            }
        }
    }
}
