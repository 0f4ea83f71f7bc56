//! Deferred workspace reclamation.
//!
//! A served archive is still being streamed when the handler returns, so its
//! workspace cannot be removed right away. [`DeferredReclaimer`] destroys it
//! from a detached task once the grace delay has passed. Timers run on
//! `tokio::time`, which tests drive with a paused clock.

mod reclaimer;

pub use reclaimer::{DeferredReclaimer, ReclaimHandle, ReclaimStatus};
