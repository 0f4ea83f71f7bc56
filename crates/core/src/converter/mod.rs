//! Conversion engine adapter.
//!
//! The core only depends on the [`ConversionEngine`] contract: convert one
//! presentation at an input path into a PDF at an output path, or report why
//! it could not. [`LibreOfficeConverter`] implements it by driving a headless
//! `soffice` process.
//!
//! # Example
//!
//! ```ignore
//! use ppt2pdf_core::converter::{ConversionEngine, ConverterConfig, LibreOfficeConverter};
//!
//! let engine = LibreOfficeConverter::new(ConverterConfig::default());
//!
//! // Capability check: is soffice installed here?
//! engine.validate().await?;
//!
//! engine
//!     .convert(Path::new("/tmp/job/deck.pptx"), Path::new("/tmp/job/out/deck.pdf"))
//!     .await?;
//! ```
//!
//! A successful return does not promise that the output exists; callers
//! check for the artifact themselves.

mod config;
mod error;
mod libreoffice;
mod traits;

pub use config::{ConverterBackend, ConverterConfig};
pub use error::ConverterError;
pub use libreoffice::LibreOfficeConverter;
pub use traits::ConversionEngine;
