//! Core utilities and types for the kiln code generator.
//!
//! This crate provides the on-disk artifact types and naming helpers
//! shared by every other kiln crate.

mod file;
mod gen_dir;
mod utils;

// File operations
pub use file::{File, FileRules, GeneratedFile, Overwrite, WriteResult, write_file};
// Generated directory layout
pub use gen_dir::{GEN_DIR, clean_gen_dir, gen_dir};
// String utilities
pub use utils::{to_camel_case, to_kebab_case, to_pascal_case, to_snake_case};
