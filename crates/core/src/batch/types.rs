//! Types for the batch module.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Name used when an upload's declared name sanitizes to nothing.
pub const DEFAULT_UPLOAD_NAME: &str = "upload.pptx";

/// What to do when one file in a batch fails to convert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Abort the batch on the first failure and discard earlier successes.
    #[default]
    FailFast,
    /// Keep going and return whatever converted.
    Partial,
}

/// One uploaded file as received from the client.
#[derive(Debug, Clone)]
pub struct UploadItem {
    /// Declared filename, untrusted.
    pub file_name: Option<String>,
    pub data: Bytes,
}

impl UploadItem {
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: Some(file_name.into()),
            data: data.into(),
        }
    }

    /// An item whose client sent no filename.
    pub fn unnamed(data: impl Into<Bytes>) -> Self {
        Self {
            file_name: None,
            data: data.into(),
        }
    }
}

/// Why an item was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    UnsupportedExtension,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedExtension => write!(f, "unsupported extension"),
        }
    }
}

/// Result for a single uploaded item.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConversionOutcome {
    Converted {
        file_name: String,
        input: PathBuf,
        output: PathBuf,
    },
    Skipped {
        file_name: String,
        reason: SkipReason,
    },
    Failed {
        file_name: String,
        reason: String,
    },
}

impl ConversionOutcome {
    /// Sanitized name of the item this outcome belongs to.
    pub fn file_name(&self) -> &str {
        match self {
            Self::Converted { file_name, .. }
            | Self::Skipped { file_name, .. }
            | Self::Failed { file_name, .. } => file_name,
        }
    }

    pub fn is_converted(&self) -> bool {
        matches!(self, Self::Converted { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Metric label for this outcome.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Converted { .. } => "converted",
            Self::Skipped { .. } => "skipped",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Artifacts and per-item outcomes of a completed batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    /// Converted files, in input order.
    pub artifacts: Vec<PathBuf>,
    /// One entry per uploaded item, in input order.
    pub outcomes: Vec<ConversionOutcome>,
}

impl BatchReport {
    pub fn converted_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_converted()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ConversionOutcome::Skipped { .. }))
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ConversionOutcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_policy_serde() {
        assert_eq!(
            serde_json::to_string(&FailurePolicy::FailFast).unwrap(),
            "\"fail_fast\""
        );
        let parsed: FailurePolicy = serde_json::from_str("\"partial\"").unwrap();
        assert_eq!(parsed, FailurePolicy::Partial);
        assert_eq!(FailurePolicy::default(), FailurePolicy::FailFast);
    }

    #[test]
    fn test_outcome_accessors() {
        let converted = ConversionOutcome::Converted {
            file_name: "a.pptx".to_string(),
            input: PathBuf::from("/w/a.pptx"),
            output: PathBuf::from("/w/out/a.pdf"),
        };
        let skipped = ConversionOutcome::Skipped {
            file_name: "notes.txt".to_string(),
            reason: SkipReason::UnsupportedExtension,
        };
        let failed = ConversionOutcome::Failed {
            file_name: "b.ppt".to_string(),
            reason: "artifact not produced".to_string(),
        };

        assert!(converted.is_converted());
        assert_eq!(skipped.file_name(), "notes.txt");
        assert!(failed.is_failed());
        assert_eq!(failed.label(), "failed");

        let report = BatchReport {
            artifacts: vec![PathBuf::from("/w/out/a.pdf")],
            outcomes: vec![converted, skipped, failed],
        };
        assert_eq!(report.converted_count(), 1);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let skipped = ConversionOutcome::Skipped {
            file_name: "notes.txt".to_string(),
            reason: SkipReason::UnsupportedExtension,
        };
        let json = serde_json::to_value(&skipped).unwrap();
        assert_eq!(json["status"], "skipped");
        assert_eq!(json["reason"], "unsupported_extension");
        assert_eq!(SkipReason::UnsupportedExtension.to_string(), "unsupported extension");
    }
}
