//! Configuration for the converter module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Available conversion backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConverterBackend {
    /// Headless LibreOffice (`soffice --convert-to pdf`).
    #[default]
    LibreOffice,
}

/// Configuration for the conversion engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    #[serde(default)]
    pub backend: ConverterBackend,

    /// Path to the soffice binary.
    #[serde(default = "default_soffice_path")]
    pub soffice_path: PathBuf,

    /// Timeout for a single document conversion in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Additional arguments passed to soffice before the input path.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

fn default_soffice_path() -> PathBuf {
    PathBuf::from("soffice")
}

fn default_timeout() -> u64 {
    300
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            backend: ConverterBackend::default(),
            soffice_path: default_soffice_path(),
            timeout_secs: default_timeout(),
            extra_args: Vec::new(),
        }
    }
}

impl ConverterConfig {
    /// Creates a new config with a custom soffice path.
    pub fn with_soffice_path(soffice_path: impl Into<PathBuf>) -> Self {
        Self {
            soffice_path: soffice_path.into(),
            ..Default::default()
        }
    }

    /// Sets the timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}
