//! Error types for the batch module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that end a batch.
#[derive(Debug, Error)]
pub enum BatchError {
    /// A file failed to convert; the whole batch is abandoned.
    #[error("Conversion failed for {file_name}: {reason}")]
    ConversionFailed { file_name: String, reason: String },

    /// Nothing in the batch had a supported extension.
    #[error("No valid PPT/PPTX files converted.")]
    NoConvertibleFiles,

    /// An upload could not be stored in the workspace.
    #[error("Failed to write upload to {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BatchError {
    pub fn conversion_failed(file_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConversionFailed {
            file_name: file_name.into(),
            reason: reason.into(),
        }
    }
}
