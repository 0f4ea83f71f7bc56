//! LibreOffice-based converter implementation.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

use super::config::ConverterConfig;
use super::error::ConverterError;
use super::traits::ConversionEngine;

/// Headless `soffice` converter.
pub struct LibreOfficeConverter {
    config: ConverterConfig,
}

impl LibreOfficeConverter {
    /// Creates a new LibreOffice converter with the given configuration.
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Creates a converter with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ConverterConfig::default())
    }

    /// Builds soffice arguments for a PDF export into `out_dir`.
    fn build_args(&self, input_path: &Path, out_dir: &Path, profile_dir: &Path) -> Vec<String> {
        let mut args = vec![
            // Private profile so parallel requests don't fight over the user lock
            format!("-env:UserInstallation={}", file_url(profile_dir)),
            "--headless".to_string(),
            "--norestore".to_string(),
            "--nolockcheck".to_string(),
            "--convert-to".to_string(),
            self.target_extension().to_string(),
            "--outdir".to_string(),
            out_dir.to_string_lossy().to_string(),
        ];

        args.extend(self.config.extra_args.iter().cloned());

        args.push(input_path.to_string_lossy().to_string());

        args
    }

    fn map_spawn_error(&self, e: std::io::Error) -> ConverterError {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConverterError::EngineNotFound {
                path: self.config.soffice_path.clone(),
            }
        } else {
            ConverterError::Io(e)
        }
    }

    async fn run_soffice(
        &self,
        input: &Path,
        out_dir: &Path,
        profile_dir: &Path,
    ) -> Result<(), ConverterError> {
        let args = self.build_args(input, out_dir, profile_dir);

        let child = Command::new(&self.config.soffice_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.map_spawn_error(e))?;

        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        // On timeout the child is dropped, and kill_on_drop takes it down.
        let output = match timeout(timeout_duration, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(ConverterError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                })
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ConverterError::conversion_failed(
                format!("soffice exited with code: {:?}", output.status.code()),
                if stderr.is_empty() { None } else { Some(stderr) },
            ));
        }

        Ok(())
    }
}

/// `file://` URL for an absolute local path, as soffice expects for
/// `-env:UserInstallation`.
fn file_url(path: &Path) -> String {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let raw = absolute.to_string_lossy().replace('\\', "/");
    let encoded = raw.replace('%', "%25").replace(' ', "%20");
    if encoded.starts_with('/') {
        format!("file://{}", encoded)
    } else {
        format!("file:///{}", encoded)
    }
}

/// Where soffice writes its export for `input` inside `out_dir`.
fn produced_path(input: &Path, out_dir: &Path, extension: &str) -> Option<PathBuf> {
    let stem = input.file_stem()?;
    let mut name = stem.to_os_string();
    name.push(".");
    name.push(extension);
    Some(out_dir.join(name))
}

#[async_trait]
impl ConversionEngine for LibreOfficeConverter {
    fn name(&self) -> &str {
        "libreoffice"
    }

    async fn convert(&self, input: &Path, output: &Path) -> Result<(), ConverterError> {
        if !input.is_file() {
            return Err(ConverterError::InputNotFound {
                path: input.to_path_buf(),
            });
        }

        let extension = input
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        if !self.supports_extension(extension) {
            return Err(ConverterError::UnsupportedInputFormat {
                format: extension.to_string(),
            });
        }

        let out_dir = output
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        tokio::fs::create_dir_all(&out_dir).await?;

        let profile_dir = out_dir.join(format!(".soffice-profile-{}", uuid::Uuid::new_v4()));

        let start = Instant::now();
        let result = self.run_soffice(input, &out_dir, &profile_dir).await;

        if let Err(e) = tokio::fs::remove_dir_all(&profile_dir).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %profile_dir.display(), error = %e, "Failed to remove soffice profile");
            }
        }

        result?;

        debug!(
            input = %input.display(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "soffice finished"
        );

        // soffice names the export after the input; move it where the caller asked.
        if let Some(produced) = produced_path(input, &out_dir, self.target_extension()) {
            if produced != output && tokio::fs::try_exists(&produced).await.unwrap_or(false) {
                tokio::fs::rename(&produced, output).await?;
            }
        }

        Ok(())
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        let result = timeout(
            Duration::from_secs(self.config.timeout_secs),
            Command::new(&self.config.soffice_path)
                .arg("--version")
                .stdin(Stdio::null())
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| ConverterError::engine_unavailable("soffice --version timed out"))?;

        let output = result.map_err(|e| self.map_spawn_error(e))?;

        if !output.status.success() {
            return Err(ConverterError::engine_unavailable(format!(
                "soffice --version exited with code: {:?}",
                output.status.code()
            )));
        }

        debug!(
            version = %String::from_utf8_lossy(&output.stdout).trim(),
            "LibreOffice available"
        );

        Ok(())
    }
}
