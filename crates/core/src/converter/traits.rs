//! Trait definitions for the converter module.

use async_trait::async_trait;
use std::path::Path;

use super::error::ConverterError;

/// An engine that turns one presentation file into one PDF.
#[async_trait]
pub trait ConversionEngine: Send + Sync {
    /// Returns the name of this engine implementation.
    fn name(&self) -> &str;

    /// Converts the document at `input` into `output`.
    ///
    /// `Ok(())` means the engine reported success. It is not proof that
    /// `output` was written.
    async fn convert(&self, input: &Path, output: &Path) -> Result<(), ConverterError>;

    /// Validates that the engine is installed and usable on this host.
    async fn validate(&self) -> Result<(), ConverterError>;

    /// Extension of the files this engine produces, without the dot.
    fn target_extension(&self) -> &str {
        "pdf"
    }

    /// Accepted input extensions, lowercase, without the dot.
    fn supported_input_formats(&self) -> &[&str] {
        &["ppt", "pptx"]
    }

    /// Whether `extension` is accepted, ignoring ASCII case.
    fn supports_extension(&self, extension: &str) -> bool {
        self.supported_input_formats()
            .iter()
            .any(|f| f.eq_ignore_ascii_case(extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubEngine;

    #[async_trait]
    impl ConversionEngine for StubEngine {
        fn name(&self) -> &str {
            "stub"
        }

        async fn convert(&self, _input: &Path, output: &Path) -> Result<(), ConverterError> {
            tokio::fs::write(output, b"%PDF-1.7").await?;
            Ok(())
        }

        async fn validate(&self) -> Result<(), ConverterError> {
            Ok(())
        }
    }

    #[test]
    fn test_default_formats() {
        let engine = StubEngine;
        assert_eq!(engine.target_extension(), "pdf");
        assert_eq!(engine.supported_input_formats(), &["ppt", "pptx"]);
    }

    #[test]
    fn test_supports_extension_ignores_case() {
        let engine = StubEngine;
        assert!(engine.supports_extension("pptx"));
        assert!(engine.supports_extension("PPT"));
        assert!(engine.supports_extension("PpTx"));
        assert!(!engine.supports_extension("pdf"));
        assert!(!engine.supports_extension("key"));
        assert!(!engine.supports_extension(""));
    }

    #[tokio::test]
    async fn test_stub_engine_convert() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("deck.pdf");
        StubEngine
            .convert(Path::new("deck.pptx"), &output)
            .await
            .unwrap();
        assert!(output.exists());
    }
}
