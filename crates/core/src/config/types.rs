use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::batch::FailurePolicy;
pub use crate::converter::{ConverterBackend, ConverterConfig};

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub workspace: WorkspaceConfig,
    #[serde(default)]
    pub converter: ConverterConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Cap on the whole upload request body, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    5000
}

fn default_max_upload_bytes() -> usize {
    500 * 1024 * 1024
}

/// Per-request workspace configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkspaceConfig {
    /// Directory under which request workspaces are allocated.
    #[serde(default = "default_temp_root")]
    pub temp_root: PathBuf,
    /// Name prefix of each workspace directory.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Seconds a served workspace is kept before it is reclaimed.
    #[serde(default = "default_grace_delay")]
    pub grace_delay_secs: u64,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            temp_root: default_temp_root(),
            prefix: default_prefix(),
            grace_delay_secs: default_grace_delay(),
        }
    }
}

impl WorkspaceConfig {
    /// Workspace config rooted at `temp_root`, other fields defaulted.
    pub fn with_temp_root(temp_root: impl Into<PathBuf>) -> Self {
        Self {
            temp_root: temp_root.into(),
            ..Default::default()
        }
    }

    pub fn grace_delay(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.grace_delay_secs)
    }
}

fn default_temp_root() -> PathBuf {
    std::env::temp_dir()
}

fn default_prefix() -> String {
    "ppt2pdf_".to_string()
}

fn default_grace_delay() -> u64 {
    5
}

/// Batch behaviour configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BatchConfig {
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

/// Config as exposed over the API
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub workspace: WorkspaceConfig,
    pub converter: SanitizedConverterConfig,
    pub batch: BatchConfig,
}

/// Converter config without the local binary path
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConverterConfig {
    pub backend: String,
    pub timeout_secs: u64,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            workspace: config.workspace.clone(),
            converter: SanitizedConverterConfig {
                backend: match config.converter.backend {
                    ConverterBackend::LibreOffice => "libre_office".to_string(),
                },
                timeout_secs: config.converter.timeout_secs,
            },
            batch: config.batch.clone(),
        }
    }
}
