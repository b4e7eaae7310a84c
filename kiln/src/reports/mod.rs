//! Report data structures for commands.
//!
//! This module provides data structures that separate data collection from rendering.
//! Commands build reports, then render them to an Output target.

mod bake;
mod check;
mod clean;
mod fmt;
mod init;
mod list;
mod output;

pub use bake::{BakeReport, GenerationResult, PreviewFile, PreviewResult, WrittenResult};
pub use check::{CheckReport, FileFailure};
pub use clean::CleanReport;
pub use fmt::FmtReport;
pub use init::InitReport;
pub use list::{ListReport, ListedFile, ListedSection};
pub use output::{Report, TerminalOutput};
