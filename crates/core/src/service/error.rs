//! Error types for the service module.

use std::error::Error as StdError;
use thiserror::Error;

use crate::archive::ArchiveError;
use crate::batch::BatchError;
use crate::converter::ConverterError;
use crate::workspace::WorkspaceError;

/// Terminal errors of a conversion request.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request carried no files at all.
    #[error("No files uploaded")]
    NoFiles,

    /// None of the files had a supported extension.
    #[error("No valid PPT/PPTX files converted.")]
    NoConvertibleFiles,

    /// The conversion engine is not usable on this host.
    #[error("{0}")]
    Capability(#[source] ConverterError),

    /// A file failed to convert and the batch was abandoned.
    #[error("Conversion failed for {file_name}: {reason}")]
    Conversion { file_name: String, reason: String },

    /// Filesystem or archive trouble.
    #[error("Server error: {0}")]
    Resource(String),
}

impl ServiceError {
    /// HTTP status the transport should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NoFiles | Self::NoConvertibleFiles | Self::Capability(_) => 400,
            Self::Conversion { .. } | Self::Resource(_) => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Label for the request metrics.
    pub fn metric_label(&self) -> &'static str {
        match self {
            Self::NoFiles | Self::NoConvertibleFiles => "input_error",
            Self::Capability(_) => "capability_error",
            Self::Conversion { .. } => "conversion_error",
            Self::Resource(_) => "resource_error",
        }
    }

    fn resource(err: &dyn StdError) -> Self {
        Self::Resource(error_chain(err))
    }
}

/// Joins an error and its sources into one line.
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl From<BatchError> for ServiceError {
    fn from(err: BatchError) -> Self {
        match err {
            BatchError::ConversionFailed { file_name, reason } => {
                Self::Conversion { file_name, reason }
            }
            BatchError::NoConvertibleFiles => Self::NoConvertibleFiles,
            other @ BatchError::Write { .. } => Self::resource(&other),
        }
    }
}

impl From<WorkspaceError> for ServiceError {
    fn from(err: WorkspaceError) -> Self {
        Self::resource(&err)
    }
}

impl From<ArchiveError> for ServiceError {
    fn from(err: ArchiveError) -> Self {
        Self::resource(&err)
    }
}
