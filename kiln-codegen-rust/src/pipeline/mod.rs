//! The finalizer pipeline.
//!
//! Every file runs through the same fixed phases:
//!
//! - `parse` - the body must be a complete Rust file
//! - `prune-imports` - drop imports nothing refers to
//! - `sort-imports` - group and order the remaining imports
//! - `print` - pretty-print the tree and write the file
//! - `normalize` - read the file back and lay out blank lines
//!
//! [`Plugin`]s observe the [`FinalizeContext`] before and after each phase;
//! [`SnapshotPlugin`] keeps the text of the file after every step.

mod context;
mod diagnostic;
mod phase;
pub mod phases;
mod plugin;
mod snapshot;

pub use context::FinalizeContext;
pub use diagnostic::{Diagnostic, Severity};
pub use phase::{Phase, PhaseInfo};
pub use plugin::Plugin;
pub use snapshot::{PhaseSnapshot, SnapshotPlugin};
