//! The per-request conversion pipeline.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn};

use super::error::ServiceError;
use super::types::{PreparedArchive, RequestState, ServiceConfig};
use crate::archive::ArchiveBuilder;
use crate::batch::{BatchConverter, BatchReport, UploadItem};
use crate::converter::ConversionEngine;
use crate::metrics::REQUESTS_TOTAL;
use crate::reclaim::DeferredReclaimer;
use crate::workspace::{Workspace, WorkspaceManager};

/// Turns a batch of uploads into a zip of PDFs.
///
/// Holds no per-request state; one instance serves every request.
pub struct ConversionService {
    engine: Arc<dyn ConversionEngine>,
    config: ServiceConfig,
    workspaces: WorkspaceManager,
    batch: BatchConverter,
    archiver: ArchiveBuilder,
    reclaimer: DeferredReclaimer,
    /// Set once the engine has passed its capability check.
    capable: OnceCell<()>,
}

impl ConversionService {
    pub fn new(engine: Arc<dyn ConversionEngine>, config: ServiceConfig) -> Self {
        let workspaces = WorkspaceManager::new(config.workspace.clone());
        Self {
            batch: BatchConverter::new(Arc::clone(&engine), config.failure_policy),
            archiver: ArchiveBuilder::new(),
            reclaimer: DeferredReclaimer::new(workspaces.clone()),
            workspaces,
            engine,
            config,
            capable: OnceCell::new(),
        }
    }

    pub fn engine(&self) -> &Arc<dyn ConversionEngine> {
        &self.engine
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Checks that the engine can run here. Only success is cached, so a
    /// host that gains the engine later recovers without a restart.
    pub async fn check_capability(&self) -> Result<(), ServiceError> {
        self.capable
            .get_or_try_init(|| async {
                self.engine.validate().await.map_err(|e| {
                    if e.is_capability_error() {
                        warn!(engine = %self.engine.name(), error = %e, "Conversion engine unavailable");
                    } else {
                        error!(engine = %self.engine.name(), error = %e, "Capability check failed");
                    }
                    ServiceError::Capability(e)
                })
            })
            .await
            .map(|_| ())
    }

    /// Converts `items` and packages the results.
    ///
    /// On success the workspace is already scheduled for removal after the
    /// grace delay. On failure it has already been removed.
    pub async fn process(&self, items: Vec<UploadItem>) -> Result<PreparedArchive, ServiceError> {
        let result = self.run(items).await;
        match &result {
            Ok(prepared) => {
                REQUESTS_TOTAL.with_label_values(&["served"]).inc();
                info!(
                    request_id = %prepared.request_id,
                    converted = prepared.report.converted_count(),
                    skipped = prepared.report.skipped_count(),
                    bytes = prepared.size,
                    "Batch converted"
                );
            }
            Err(e) => {
                REQUESTS_TOTAL.with_label_values(&[e.metric_label()]).inc();
                if e.is_client_error() {
                    info!(error = %e, "Batch rejected");
                } else {
                    error!(error = %e, "Batch failed");
                }
            }
        }
        result
    }

    async fn run(&self, items: Vec<UploadItem>) -> Result<PreparedArchive, ServiceError> {
        // Capability first: a host without the engine rejects every request alike
        self.check_capability().await?;

        if items.is_empty() {
            return Err(ServiceError::NoFiles);
        }

        let workspace = self.workspaces.create().await?;
        let request_id = workspace.id();
        debug!(request_id = %request_id, state = %RequestState::Created, "Request state");

        match self.build(&workspace, items).await {
            Ok((path, size, report)) => {
                let reclaim = self
                    .reclaimer
                    .schedule_destroy(workspace, self.config.grace_delay());
                Ok(PreparedArchive {
                    request_id,
                    path,
                    size,
                    report,
                    reclaim,
                })
            }
            Err(e) => {
                // No response body references the workspace, so skip the grace delay
                self.workspaces.destroy(&workspace).await;
                Err(e)
            }
        }
    }

    async fn build(
        &self,
        workspace: &Workspace,
        items: Vec<UploadItem>,
    ) -> Result<(PathBuf, u64, BatchReport), ServiceError> {
        let request_id = workspace.id();
        debug!(
            request_id = %request_id,
            state = %RequestState::Populating,
            items = items.len(),
            policy = ?self.batch.policy(),
            "Request state"
        );

        // Items are stored and converted one at a time, so the two states interleave
        debug!(request_id = %request_id, state = %RequestState::Converting, "Request state");
        let report = self.batch.convert_all(workspace, items).await?;

        let path = self.archiver.build(workspace, &report.artifacts).await?;
        let size = tokio::fs::metadata(&path)
            .await
            .map_err(|e| ServiceError::Resource(format!("Failed to stat archive: {}", e)))?
            .len();
        debug!(request_id = %request_id, state = %RequestState::Archived, bytes = size, "Request state");

        Ok((path, size, report))
    }

    /// Reclaims every workspace still waiting on its grace delay.
    pub async fn shutdown(&self) {
        self.reclaimer.shutdown().await;
    }
}
