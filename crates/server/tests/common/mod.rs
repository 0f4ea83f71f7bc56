//! Common test utilities for in-process HTTP testing.
//!
//! This module provides a test fixture that builds the real router around a
//! `ConversionService` backed by the mock engine, so the whole upload path
//! runs without LibreOffice installed.

#![allow(dead_code)]

use std::io::Read;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use ppt2pdf_core::{testing::MockConverter, Config, ConversionService, ServiceConfig};
use ppt2pdf_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use ppt2pdf_core::testing::fixtures;

/// Boundary used for hand-built multipart bodies.
pub const BOUNDARY: &str = "ppt2pdf-test-boundary";

/// Test fixture for in-process HTTP testing.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_upload() {
///     let fixture = TestFixture::new();
///     let response = fixture.upload(&[("deck.pptx", b"data")]).await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock engine - fail files, make it unavailable, inspect calls
    pub engine: MockConverter,
    /// Service behind the router, for flushing reclaims
    pub service: Arc<ConversionService>,
    /// Root under which request workspaces are created
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("Body is not JSON")
    }

    pub fn header(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    /// Entry names and contents of a zip body.
    pub fn zip_entries(&self) -> Vec<(String, Vec<u8>)> {
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(self.body.to_vec()))
            .expect("Body is not a zip archive");
        (0..archive.len())
            .map(|i| {
                let mut entry = archive.by_index(i).unwrap();
                let mut data = Vec::new();
                entry.read_to_end(&mut data).unwrap();
                (entry.name().to_string(), data)
            })
            .collect()
    }
}

impl TestFixture {
    /// Create a new test fixture with default settings.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a test fixture from a config; the workspace root is always
    /// redirected to a fresh temp dir.
    pub fn with_config(mut config: Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        config.workspace.temp_root = temp_dir.path().to_path_buf();

        let engine = MockConverter::new();
        let service = Arc::new(ConversionService::new(
            Arc::new(engine.clone()),
            ServiceConfig::from(&config),
        ));

        let state = Arc::new(AppState::new(config, Arc::clone(&service)));
        let router = create_router(state);

        Self {
            router,
            engine,
            service,
            temp_dir,
        }
    }

    /// Workspaces currently on disk.
    pub fn workspace_count(&self) -> usize {
        std::fs::read_dir(self.temp_dir.path()).unwrap().count()
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// POST the given files to `/upload` as `files` parts.
    pub async fn upload(&self, files: &[(&str, &[u8])]) -> TestResponse {
        let parts: Vec<_> = files.iter().map(|(n, d)| ("files", Some(*n), *d)).collect();
        self.upload_parts(&parts).await
    }

    /// POST arbitrary parts: (field name, optional file name, content).
    pub async fn upload_parts(&self, parts: &[(&str, Option<&str>, &[u8])]) -> TestResponse {
        self.post_raw(
            "/upload",
            &format!("multipart/form-data; boundary={}", BOUNDARY),
            multipart_body(parts),
        )
        .await
    }

    /// Send a POST request with a raw body and content type.
    pub async fn post_raw(&self, path: &str, content_type: &str, body: Vec<u8>) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", content_type)
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Builds a `multipart/form-data` body using [`BOUNDARY`].
pub fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (field, file_name, data) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match file_name {
            Some(name) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n",
                    field, name
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", field).as_bytes(),
            ),
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}
