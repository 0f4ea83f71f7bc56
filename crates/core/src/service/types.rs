use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

use crate::archive::ARCHIVE_FILE_NAME;
use crate::batch::{BatchReport, FailurePolicy};
use crate::config::{Config, WorkspaceConfig};
use crate::reclaim::ReclaimHandle;

/// Settings the service needs from the full config.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    pub workspace: WorkspaceConfig,
    pub failure_policy: FailurePolicy,
}

impl ServiceConfig {
    pub fn with_temp_root(temp_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace: WorkspaceConfig::with_temp_root(temp_root),
            ..Default::default()
        }
    }

    pub fn grace_delay(&self) -> Duration {
        self.workspace.grace_delay()
    }
}

impl From<&Config> for ServiceConfig {
    fn from(config: &Config) -> Self {
        Self {
            workspace: config.workspace.clone(),
            failure_policy: config.batch.failure_policy,
        }
    }
}

/// Lifecycle of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Created,
    Populating,
    Converting,
    Archived,
    Served,
    Reclaimed,
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Created => "created",
            Self::Populating => "populating",
            Self::Converting => "converting",
            Self::Archived => "archived",
            Self::Served => "served",
            Self::Reclaimed => "reclaimed",
        };
        write!(f, "{}", s)
    }
}

/// A finished archive ready to be streamed.
///
/// The workspace holding it is already scheduled for reclamation.
#[derive(Debug)]
pub struct PreparedArchive {
    pub request_id: Uuid,
    pub path: PathBuf,
    pub size: u64,
    pub report: BatchReport,
    pub reclaim: ReclaimHandle,
}

impl PreparedArchive {
    /// Name offered to the client.
    pub fn file_name(&self) -> &'static str {
        ARCHIVE_FILE_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_state_display() {
        assert_eq!(RequestState::Created.to_string(), "created");
        assert_eq!(RequestState::Served.to_string(), "served");
        assert_eq!(RequestState::Reclaimed.to_string(), "reclaimed");
    }

    #[test]
    fn test_service_config_from_config() {
        let mut config = Config::default();
        config.workspace.grace_delay_secs = 12;
        config.batch.failure_policy = FailurePolicy::Partial;

        let service_config = ServiceConfig::from(&config);
        assert_eq!(service_config.grace_delay(), Duration::from_secs(12));
        assert_eq!(service_config.failure_policy, FailurePolicy::Partial);
    }
}
