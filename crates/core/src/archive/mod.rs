//! Packaging of converted artifacts.
//!
//! All PDFs of a request go into a single deflate-compressed zip named
//! [`ARCHIVE_FILE_NAME`], written to the workspace root beside the inputs.
//! Entries are flat: each one is named by its artifact's base name.

mod builder;
mod error;

pub use builder::{ArchiveBuilder, ARCHIVE_FILE_NAME};
pub use error::ArchiveError;
