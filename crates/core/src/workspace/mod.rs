//! Per-request workspaces.
//!
//! Every upload gets its own directory `{temp_root}/{prefix}{uuid}/`: the
//! received presentations sit at its root, converted PDFs under `out/`, and
//! the final archive next to the inputs. Nothing is ever shared between
//! requests, and [`WorkspaceManager::destroy`] is safe to call any number of
//! times.

mod error;
mod manager;

pub use error::WorkspaceError;
pub use manager::{Workspace, WorkspaceManager, OUTPUT_DIR_NAME};
