//! Rust source finalization for kiln.
//!
//! Generated Rust files are assembled from independently rendered sections,
//! so the raw body usually carries imports nothing uses and no consistent
//! layout. The [`Finalizer`] turns such a body into a canonical file:
//!
//! ```
//! use kiln_codegen_rust::Finalizer;
//!
//! let body = "use std::fmt;\nuse std::str;\n\
//!             pub fn valid(b: &[u8]) -> bool { str::from_utf8(b).is_ok() }\n";
//!
//! let out = Finalizer::new().format_str(body)?;
//! assert_eq!(
//!     out.content,
//!     "use std::str;\n\npub fn valid(b: &[u8]) -> bool {\n    str::from_utf8(b).is_ok()\n}\n"
//! );
//! # Ok::<(), Box<kiln_codegen_rust::Error>>(())
//! ```
//!
//! [`SourceFile`] plugs the finalizer into the `kiln-codegen` [`Writer`].
//!
//! [`Writer`]: kiln_codegen::Writer

pub mod comments;
mod error;
mod finalizer;
pub mod imports;
mod layout;
pub mod pipeline;
mod source_file;

pub use comments::{Comment, Comments};
pub use error::{Error, Result};
pub use finalizer::{Finalized, Finalizer, finalize};
pub use imports::{ImportEntry, ImportGroup, collect_imports};
pub use layout::normalize_layout;
pub use source_file::SourceFile;
