//! Parsing and validation for `kiln.toml`.
//!
//! A manifest names the project, an output directory, shared templates and
//! the files to generate, each built from an ordered list of sections.
//! Errors carry the manifest source and spans for miette reporting.

// miette's Diagnostic derive generates code that triggers these warnings
#![allow(unused_assignments)]

mod error;
mod file;
mod manifest;
mod validate;

pub use error::{Error, Result, SourceContext};
pub use file::KilnToml;
pub use manifest::{FileKind, FileSpec, MANIFEST_FILE, Manifest, ProjectConfig, SectionSpec};

/// Parse a kiln.toml file.
pub fn parse_file(path: impl AsRef<std::path::Path>) -> Result<Manifest> {
    Manifest::from_file(path)
}
