//! Error types for the converter module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during conversion.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// Engine binary not found.
    #[error("Conversion engine not found at path: {path}")]
    EngineNotFound { path: PathBuf },

    /// Engine binary exists but does not work on this host.
    #[error("Conversion engine unavailable: {reason}")]
    EngineUnavailable { reason: String },

    /// Input file not found.
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// Input file is not a supported format.
    #[error("Unsupported input format: {format}")]
    UnsupportedInputFormat { format: String },

    /// Conversion process failed.
    #[error("Conversion failed: {reason}")]
    ConversionFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// Conversion timed out.
    #[error("Conversion timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// I/O error during conversion.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConverterError {
    /// Creates a new conversion failed error with stderr output.
    pub fn conversion_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::ConversionFailed {
            reason: reason.into(),
            stderr,
        }
    }

    /// Creates a new engine unavailable error.
    pub fn engine_unavailable(reason: impl Into<String>) -> Self {
        Self::EngineUnavailable {
            reason: reason.into(),
        }
    }

    /// Whether this error means the engine itself is missing or broken,
    /// as opposed to one input failing.
    pub fn is_capability_error(&self) -> bool {
        matches!(
            self,
            Self::EngineNotFound { .. } | Self::EngineUnavailable { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_failed_display() {
        let err = ConverterError::conversion_failed("soffice exited with code 1", None);
        assert_eq!(err.to_string(), "Conversion failed: soffice exited with code 1");
    }

    #[test]
    fn test_capability_classification() {
        assert!(ConverterError::EngineNotFound {
            path: PathBuf::from("soffice")
        }
        .is_capability_error());
        assert!(ConverterError::engine_unavailable("broken").is_capability_error());
        assert!(!ConverterError::Timeout { timeout_secs: 5 }.is_capability_error());
        assert!(!ConverterError::conversion_failed("bad deck", None).is_capability_error());
    }
}
