//! Error types for the archive module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building an archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Called with nothing to package.
    #[error("No artifacts to archive")]
    EmptyArchive,

    /// Two artifacts would produce the same entry name.
    #[error("Duplicate archive entry: {name}")]
    DuplicateEntry { name: String },

    /// An artifact path has no usable file name.
    #[error("Artifact has no file name: {path}")]
    InvalidArtifact { path: PathBuf },

    /// An artifact lies outside the request's workspace.
    #[error("Artifact outside workspace: {path}")]
    OutsideWorkspace { path: PathBuf },

    /// An artifact could not be read.
    #[error("Failed to read artifact {path}")]
    ReadArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The archive file could not be created or written.
    #[error("Failed to write archive {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The blocking writer task died.
    #[error("Archive task failed: {0}")]
    Task(String),
}
