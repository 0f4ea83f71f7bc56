//! HTTP shell around `ppt2pdf-core`.
//!
//! Exposed as a library so the router can be exercised in-process by the
//! integration tests; the `ppt2pdf` binary only wires it to a listener.

pub mod api;
pub mod metrics;
pub mod state;
