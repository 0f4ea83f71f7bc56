//! Mock converter for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::converter::{ConversionEngine, ConverterError};

/// Header written at the start of every mock artifact.
const MOCK_PDF_HEADER: &[u8] = b"%PDF-1.4\n% mock\n";

/// A recorded conversion call for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedConversion {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Whether the mock reported success.
    pub success: bool,
}

/// Mock implementation of the ConversionEngine trait.
///
/// Provides controllable behavior for testing:
/// - Track conversion calls for assertions
/// - Fail specific input files by name
/// - Report success without writing the artifact
/// - Simulate an engine that is not installed
/// - Simulate conversion time
///
/// Successful conversions write `MOCK_PDF_HEADER` followed by the input
/// bytes, so artifacts are non-empty and traceable to their input.
#[derive(Debug, Clone)]
pub struct MockConverter {
    conversions: Arc<RwLock<Vec<RecordedConversion>>>,
    /// Input file name -> failure reason.
    failures: Arc<RwLock<HashMap<String, String>>>,
    /// Input file names that "succeed" without output.
    missing_outputs: Arc<RwLock<HashSet<String>>>,
    /// If set, the next conversion fails with this error.
    next_error: Arc<RwLock<Option<ConverterError>>>,
    /// If set, validate() reports the engine unavailable.
    unavailable: Arc<RwLock<Option<String>>>,
    validate_calls: Arc<RwLock<usize>>,
    conversion_duration: Arc<RwLock<Duration>>,
}

impl Default for MockConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConverter {
    /// Create a new mock converter.
    pub fn new() -> Self {
        Self {
            conversions: Arc::new(RwLock::new(Vec::new())),
            failures: Arc::new(RwLock::new(HashMap::new())),
            missing_outputs: Arc::new(RwLock::new(HashSet::new())),
            next_error: Arc::new(RwLock::new(None)),
            unavailable: Arc::new(RwLock::new(None)),
            validate_calls: Arc::new(RwLock::new(0)),
            conversion_duration: Arc::new(RwLock::new(Duration::ZERO)),
        }
    }

    /// A mock whose capability check always fails.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        let mut mock = Self::new();
        mock.unavailable = Arc::new(RwLock::new(Some(reason.into())));
        mock
    }

    /// Get all recorded conversions.
    pub async fn recorded_conversions(&self) -> Vec<RecordedConversion> {
        self.conversions.read().await.clone()
    }

    /// Get the number of conversions attempted.
    pub async fn conversion_count(&self) -> usize {
        self.conversions.read().await.len()
    }

    /// Number of capability checks performed.
    pub async fn validate_count(&self) -> usize {
        *self.validate_calls.read().await
    }

    /// Fail every conversion whose input file is named `file_name`.
    pub async fn fail_for(&self, file_name: impl Into<String>, reason: impl Into<String>) {
        self.failures
            .write()
            .await
            .insert(file_name.into(), reason.into());
    }

    /// Report success for `file_name` without writing any output.
    pub async fn succeed_without_output_for(&self, file_name: impl Into<String>) {
        self.missing_outputs.write().await.insert(file_name.into());
    }

    /// Configure the next conversion to fail with the given error.
    pub async fn set_next_error(&self, error: ConverterError) {
        *self.next_error.write().await = Some(error);
    }

    /// Mark the engine as unavailable (or available again with `None`).
    pub async fn set_unavailable(&self, reason: Option<String>) {
        *self.unavailable.write().await = reason;
    }

    /// Set the simulated conversion duration.
    pub async fn set_conversion_duration(&self, duration: Duration) {
        *self.conversion_duration.write().await = duration;
    }

    async fn record(&self, input: &Path, output: &Path, success: bool) {
        self.conversions.write().await.push(RecordedConversion {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            success,
        });
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[async_trait]
impl ConversionEngine for MockConverter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn convert(&self, input: &Path, output: &Path) -> Result<(), ConverterError> {
        let duration = *self.conversion_duration.read().await;
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }

        if let Some(err) = self.next_error.write().await.take() {
            self.record(input, output, false).await;
            return Err(err);
        }

        let name = file_name_of(input);
        if let Some(reason) = self.failures.read().await.get(&name).cloned() {
            self.record(input, output, false).await;
            return Err(ConverterError::conversion_failed(reason, None));
        }

        let data = tokio::fs::read(input)
            .await
            .map_err(|_| ConverterError::InputNotFound {
                path: input.to_path_buf(),
            })?;

        if !self.missing_outputs.read().await.contains(&name) {
            let mut pdf = MOCK_PDF_HEADER.to_vec();
            pdf.extend_from_slice(&data);
            tokio::fs::write(output, pdf).await?;
        }

        self.record(input, output, true).await;
        Ok(())
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        *self.validate_calls.write().await += 1;
        match self.unavailable.read().await.as_ref() {
            Some(reason) => Err(ConverterError::engine_unavailable(reason.clone())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_input(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, b"PK-data").unwrap();
        path
    }

    #[tokio::test]
    async fn test_basic_conversion_writes_pdf() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "deck.pptx");
        let output = dir.path().join("deck.pdf");

        let converter = MockConverter::new();
        converter.convert(&input, &output).await.unwrap();

        let pdf = std::fs::read(&output).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
        assert!(pdf.ends_with(b"PK-data"));

        let conversions = converter.recorded_conversions().await;
        assert_eq!(conversions.len(), 1);
        assert!(conversions[0].success);
        assert_eq!(conversions[0].input, input);
    }

    #[tokio::test]
    async fn test_fail_for_named_file() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "broken.pptx");

        let converter = MockConverter::new();
        converter.fail_for("broken.pptx", "corrupt").await;

        let err = converter
            .convert(&input, &dir.path().join("broken.pdf"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("corrupt"));
        assert!(!converter.recorded_conversions().await[0].success);
    }

    #[tokio::test]
    async fn test_succeed_without_output() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "ghost.pptx");
        let output = dir.path().join("ghost.pdf");

        let converter = MockConverter::new();
        converter.succeed_without_output_for("ghost.pptx").await;

        converter.convert(&input, &output).await.unwrap();
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_error_injection_is_consumed() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "deck.pptx");
        let output = dir.path().join("deck.pdf");

        let converter = MockConverter::new();
        converter
            .set_next_error(ConverterError::Timeout { timeout_secs: 1 })
            .await;

        assert!(converter.convert(&input, &output).await.is_err());
        assert!(converter.convert(&input, &output).await.is_ok());
        assert_eq!(converter.conversion_count().await, 2);
    }

    #[tokio::test]
    async fn test_unavailable_engine() {
        let converter = MockConverter::unavailable("no soffice here");
        let err = converter.validate().await.unwrap_err();
        assert!(err.is_capability_error());
        assert_eq!(converter.validate_count().await, 1);

        converter.set_unavailable(None).await;
        assert!(converter.validate().await.is_ok());
    }
}
