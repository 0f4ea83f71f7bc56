//! Zip writer for a request's artifacts.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::error::ArchiveError;
use crate::metrics::ARCHIVES_BUILT;
use crate::workspace::Workspace;

/// File name of the archive, both on disk and as served to the client.
pub const ARCHIVE_FILE_NAME: &str = "converted_pdfs.zip";

/// Builds `converted_pdfs.zip` for a workspace.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveBuilder;

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Writes every artifact into `workspace.archive_path()`, in order.
    ///
    /// The zip writer is synchronous, so the work runs on the blocking pool.
    pub async fn build(
        &self,
        workspace: &Workspace,
        artifacts: &[PathBuf],
    ) -> Result<PathBuf, ArchiveError> {
        if artifacts.is_empty() {
            return Err(ArchiveError::EmptyArchive);
        }

        let entries = entry_names(workspace, artifacts)?;
        let archive_path = workspace.archive_path();
        let target = archive_path.clone();

        tokio::task::spawn_blocking(move || write_archive(&target, &entries))
            .await
            .map_err(|e| ArchiveError::Task(e.to_string()))??;

        ARCHIVES_BUILT.inc();
        debug!(
            workspace_id = %workspace.id(),
            entries = artifacts.len(),
            path = %archive_path.display(),
            "Archive built"
        );

        Ok(archive_path)
    }
}

/// Pairs each artifact with its entry name, rejecting duplicates and
/// anything outside the workspace.
fn entry_names(
    workspace: &Workspace,
    artifacts: &[PathBuf],
) -> Result<Vec<(PathBuf, String)>, ArchiveError> {
    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(artifacts.len());

    for path in artifacts {
        if !workspace.contains(path) {
            return Err(ArchiveError::OutsideWorkspace { path: path.clone() });
        }

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ArchiveError::InvalidArtifact { path: path.clone() })?
            .to_string();

        if !seen.insert(name.clone()) {
            return Err(ArchiveError::DuplicateEntry { name });
        }
        entries.push((path.clone(), name));
    }

    Ok(entries)
}

fn write_archive(target: &Path, entries: &[(PathBuf, String)]) -> Result<(), ArchiveError> {
    let file = File::create(target).map_err(|source| ArchiveError::Write {
        path: target.to_path_buf(),
        source,
    })?;

    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (path, name) in entries {
        let data = std::fs::read(path).map_err(|source| ArchiveError::ReadArtifact {
            path: path.clone(),
            source,
        })?;
        zip.start_file(name.as_str(), options)?;
        zip.write_all(&data).map_err(|source| ArchiveError::Write {
            path: target.to_path_buf(),
            source,
        })?;
    }

    let mut writer = zip.finish()?;
    writer.flush().map_err(|source| ArchiveError::Write {
        path: target.to_path_buf(),
        source,
    })?;

    Ok(())
}
