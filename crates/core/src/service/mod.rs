//! Request orchestration.
//!
//! [`ConversionService`] runs one upload through its whole life:
//!
//! ```text
//! Created -> Populating -> Converting -> Archived -> Served -> (grace delay) -> Reclaimed
//! ```
//!
//! Any failure before `Archived` destroys the workspace on the spot and
//! yields a [`ServiceError`] carrying the HTTP status the shell should send.

mod error;
mod orchestrator;
mod types;

pub use error::ServiceError;
pub use orchestrator::ConversionService;
pub use types::{PreparedArchive, RequestState, ServiceConfig};
