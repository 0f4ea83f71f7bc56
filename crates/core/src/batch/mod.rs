//! Batch conversion of one request's uploads.
//!
//! [`BatchConverter::convert_all`] walks the uploaded items in order:
//! sanitize the declared name, skip anything that is not `.ppt`/`.pptx`,
//! store the bytes in the workspace, run the engine, and confirm the PDF is
//! really on disk. Every item yields exactly one [`ConversionOutcome`].
//!
//! With [`FailurePolicy::FailFast`] the first failed file ends the batch and
//! nothing that was already converted is returned.

mod converter;
mod error;
mod sanitize;
mod types;

pub use converter::BatchConverter;
pub use error::BatchError;
pub use sanitize::secure_filename;
pub use types::{
    BatchReport, ConversionOutcome, FailurePolicy, SkipReason, UploadItem, DEFAULT_UPLOAD_NAME,
};
