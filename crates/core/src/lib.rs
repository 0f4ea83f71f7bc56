pub mod archive;
pub mod batch;
pub mod config;
pub mod converter;
pub mod metrics;
pub mod reclaim;
pub mod service;
pub mod testing;
pub mod workspace;

pub use archive::{ArchiveBuilder, ArchiveError, ARCHIVE_FILE_NAME};
pub use batch::{
    secure_filename, BatchConverter, BatchError, BatchReport, ConversionOutcome, FailurePolicy,
    SkipReason, UploadItem, DEFAULT_UPLOAD_NAME,
};
pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, BatchConfig,
    Config, ConfigError, ConverterBackend, ConverterConfig, SanitizedConfig, ServerConfig,
    WorkspaceConfig,
};
pub use converter::{ConversionEngine, ConverterError, LibreOfficeConverter};
pub use reclaim::{DeferredReclaimer, ReclaimHandle, ReclaimStatus};
pub use service::{ConversionService, PreparedArchive, RequestState, ServiceConfig, ServiceError};
pub use workspace::{Workspace, WorkspaceError, WorkspaceManager};
