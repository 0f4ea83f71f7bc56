//! The batch conversion loop.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use super::error::BatchError;
use super::sanitize::secure_filename;
use super::types::{
    BatchReport, ConversionOutcome, FailurePolicy, SkipReason, UploadItem, DEFAULT_UPLOAD_NAME,
};
use crate::converter::{ConversionEngine, ConverterError};
use crate::metrics::{CONVERSIONS_TOTAL, CONVERSION_DURATION};
use crate::workspace::Workspace;

/// Reason recorded when the engine claims success but wrote nothing.
pub(crate) const ARTIFACT_NOT_PRODUCED: &str = "artifact not produced";

/// Converts every upload of a request inside its workspace.
#[derive(Clone)]
pub struct BatchConverter {
    engine: Arc<dyn ConversionEngine>,
    policy: FailurePolicy,
}

impl BatchConverter {
    pub fn new(engine: Arc<dyn ConversionEngine>, policy: FailurePolicy) -> Self {
        Self { engine, policy }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Converts `items` in input order.
    ///
    /// On `Ok`, `artifacts` is non-empty and every path in it exists.
    pub async fn convert_all(
        &self,
        workspace: &Workspace,
        items: Vec<UploadItem>,
    ) -> Result<BatchReport, BatchError> {
        let mut report = BatchReport::default();
        let mut used_stems = HashSet::new();

        for item in items {
            let file_name = normalized_name(item.file_name.as_deref());

            let Some((stem, extension)) = split_supported(&file_name, self.engine.as_ref())
            else {
                debug!(file_name = %file_name, "Skipping upload with unsupported extension");
                record(&mut report, ConversionOutcome::Skipped {
                    file_name,
                    reason: SkipReason::UnsupportedExtension,
                });
                continue;
            };

            let stem = unique_stem(&stem, &mut used_stems);
            let stored_name = format!("{}.{}", stem, extension);
            let input = workspace.input_path(&stored_name);
            tokio::fs::write(&input, &item.data)
                .await
                .map_err(|source| BatchError::Write {
                    path: input.clone(),
                    source,
                })?;

            let output = workspace.output_path(&stem, self.engine.target_extension());
            debug_assert!(workspace.contains(&output));

            match self.convert_one(&input, &output).await {
                Ok(()) => {
                    report.artifacts.push(output.clone());
                    record(&mut report, ConversionOutcome::Converted {
                        file_name,
                        input,
                        output,
                    });
                }
                Err(reason) => {
                    warn!(file_name = %file_name, reason = %reason, "Conversion failed");
                    if self.policy == FailurePolicy::FailFast {
                        CONVERSIONS_TOTAL.with_label_values(&["failed"]).inc();
                        return Err(BatchError::conversion_failed(file_name, reason));
                    }
                    record(&mut report, ConversionOutcome::Failed { file_name, reason });
                }
            }
        }

        if report.artifacts.is_empty() {
            // Partial mode with nothing converted: surface the first real failure
            if let Some(ConversionOutcome::Failed { file_name, reason }) =
                report.failures().next()
            {
                return Err(BatchError::conversion_failed(file_name.clone(), reason.clone()));
            }
            return Err(BatchError::NoConvertibleFiles);
        }

        Ok(report)
    }

    /// Runs the engine, then checks the artifact independently.
    async fn convert_one(&self, input: &Path, output: &Path) -> Result<(), String> {
        let start = Instant::now();
        let result = self.engine.convert(input, output).await;
        let elapsed = start.elapsed().as_secs_f64();

        let verdict = match result {
            Ok(()) => match tokio::fs::metadata(output).await {
                Ok(meta) if meta.is_file() => Ok(()),
                _ => Err(ARTIFACT_NOT_PRODUCED.to_string()),
            },
            Err(ConverterError::ConversionFailed { reason, stderr }) => Err(match stderr {
                // Last stderr line is usually the one naming the problem
                Some(stderr) => match stderr.lines().last() {
                    Some(line) => format!("{}: {}", reason, line.trim()),
                    None => reason,
                },
                None => reason,
            }),
            Err(e) => Err(e.to_string()),
        };

        CONVERSION_DURATION
            .with_label_values(&[if verdict.is_ok() { "success" } else { "failed" }])
            .observe(elapsed);

        verdict
    }
}

fn record(report: &mut BatchReport, outcome: ConversionOutcome) {
    CONVERSIONS_TOTAL.with_label_values(&[outcome.label()]).inc();
    report.outcomes.push(outcome);
}

/// Sanitized name for a declared upload name.
///
/// When sanitizing strips a non-empty stem but keeps the extension (e.g. a
/// name written entirely in non-ASCII script), the extension is kept on a
/// generic stem instead of turning the name into a bare `pptx`. A name that
/// never had a stem (`.pptx`) is left as sanitized and later skipped.
fn normalized_name(declared: Option<&str>) -> String {
    let declared = declared.unwrap_or_default();
    let sanitized = secure_filename(declared);

    if sanitized.is_empty() {
        return DEFAULT_UPLOAD_NAME.to_string();
    }

    if !sanitized.contains('.') {
        let last_component = declared.rsplit(['/', '\\']).next().unwrap_or_default();
        let declared_ext = match last_component.rsplit_once('.') {
            Some((stem, ext)) if !stem.trim().is_empty() => secure_filename(ext),
            _ => String::new(),
        };
        if !declared_ext.is_empty() && declared_ext == sanitized {
            let default_stem = DEFAULT_UPLOAD_NAME
                .split_once('.')
                .map(|(stem, _)| stem)
                .unwrap_or(DEFAULT_UPLOAD_NAME);
            return format!("{}.{}", default_stem, sanitized);
        }
    }

    sanitized
}

/// Splits `file_name` into stem and extension if the engine accepts it.
fn split_supported(file_name: &str, engine: &dyn ConversionEngine) -> Option<(String, String)> {
    let path = Path::new(file_name);
    let extension = path.extension()?.to_str()?;
    if !engine.supports_extension(extension) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    Some((stem.to_string(), extension.to_string()))
}

/// Returns `stem`, or `stem_N` if an earlier item already used it.
///
/// Comparison ignores case so outputs stay distinct on case-insensitive
/// filesystems and as archive entry names.
fn unique_stem(stem: &str, used: &mut HashSet<String>) -> String {
    if used.insert(stem.to_lowercase()) {
        return stem.to_string();
    }
    let mut n = 1;
    loop {
        let candidate = format!("{}_{}", stem, n);
        if used.insert(candidate.to_lowercase()) {
            return candidate;
        }
        n += 1;
    }
}
