//! Testing utilities and mock implementations.
//!
//! [`MockConverter`] stands in for the real conversion engine so batch,
//! service and HTTP tests run without LibreOffice installed.
//!
//! # Example
//!
//! ```rust,ignore
//! use ppt2pdf_core::testing::MockConverter;
//!
//! let engine = MockConverter::new();
//! engine.fail_for("broken.pptx", "corrupt presentation").await;
//!
//! let service = ConversionService::new(Arc::new(engine.clone()), service_config);
//! // ...
//! assert_eq!(engine.conversion_count().await, 2);
//! ```

mod mock_converter;

pub use mock_converter::{MockConverter, RecordedConversion};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::batch::UploadItem;

    /// Bytes that look enough like a pptx (zip magic) for logs and tests.
    pub fn pptx_bytes(label: &str) -> Vec<u8> {
        let mut data = b"PK\x03\x04".to_vec();
        data.extend_from_slice(label.as_bytes());
        data
    }

    /// An upload item with a fake presentation payload.
    pub fn upload(file_name: &str) -> UploadItem {
        UploadItem::new(file_name, pptx_bytes(file_name))
    }

    /// Upload items for each name, in order.
    pub fn uploads(file_names: &[&str]) -> Vec<UploadItem> {
        file_names.iter().map(|name| upload(name)).collect()
    }
}
