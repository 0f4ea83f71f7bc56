use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::debug;
use uuid::Uuid;

use crate::metrics::WORKSPACES_RECLAIMED;
use crate::service::RequestState;
use crate::workspace::{Workspace, WorkspaceManager};

/// How a scheduled reclaim ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReclaimStatus {
    /// The workspace was destroyed.
    Reclaimed,
    /// The timer was cancelled and the workspace left in place.
    Cancelled,
}

/// Schedules workspace destruction after a delay.
#[derive(Debug, Clone)]
pub struct DeferredReclaimer {
    manager: WorkspaceManager,
    /// Parent of every pending timer; cancelling it fires them all.
    flush: CancellationToken,
    tasks: TaskTracker,
}

impl DeferredReclaimer {
    pub fn new(manager: WorkspaceManager) -> Self {
        Self {
            manager,
            flush: CancellationToken::new(),
            tasks: TaskTracker::new(),
        }
    }

    /// Number of reclaims still waiting or running.
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Destroys `workspace` after `delay` without blocking the caller.
    ///
    /// Takes ownership: once scheduled the workspace belongs to the timer.
    pub fn schedule_destroy(&self, workspace: Workspace, delay: Duration) -> ReclaimHandle {
        let workspace_id = workspace.id();
        let cancel = CancellationToken::new();
        let fire = self.flush.child_token();
        let manager = self.manager.clone();

        debug!(workspace_id = %workspace_id, delay_ms = delay.as_millis() as u64, "Reclaim scheduled");

        let task = {
            let cancel = cancel.clone();
            let fire = fire.clone();
            self.tasks.spawn(async move {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        debug!(workspace_id = %workspace.id(), "Reclaim cancelled");
                        return ReclaimStatus::Cancelled;
                    }
                    _ = fire.cancelled() => {}
                    _ = tokio::time::sleep(delay) => {}
                }

                manager.destroy(&workspace).await;
                WORKSPACES_RECLAIMED.inc();
                debug!(
                    request_id = %workspace.id(),
                    state = %RequestState::Reclaimed,
                    "Request state"
                );
                ReclaimStatus::Reclaimed
            })
        };

        ReclaimHandle {
            workspace_id,
            cancel,
            fire,
            task,
        }
    }

    /// Fires every pending timer now and waits for the removals to finish.
    pub async fn shutdown(&self) {
        let pending = self.tasks.len();
        if pending > 0 {
            debug!(pending, "Flushing pending reclaims");
        }
        self.flush.cancel();
        self.tasks.close();
        self.tasks.wait().await;
    }
}

/// Control over one scheduled reclaim.
///
/// Dropping the handle does not affect the timer.
#[derive(Debug)]
pub struct ReclaimHandle {
    workspace_id: Uuid,
    cancel: CancellationToken,
    fire: CancellationToken,
    task: JoinHandle<ReclaimStatus>,
}

impl ReclaimHandle {
    pub fn workspace_id(&self) -> Uuid {
        self.workspace_id
    }

    /// Stops the timer; the workspace is left on disk.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Skips the rest of the delay and destroys now.
    pub fn reclaim_now(&self) {
        self.fire.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the reclaim to end.
    pub async fn wait(self) -> ReclaimStatus {
        self.task.await.unwrap_or(ReclaimStatus::Cancelled)
    }
}
