//! Language-agnostic code generation for kiln.
//!
//! This crate turns section descriptors into output files:
//!
//! - [`section`] - [`SectionDescriptor`] and the [`SectionRenderer`]
//! - [`artifact`] - the [`Artifact`] trait and verbatim [`RawFile`]s
//! - [`writer`] - the multi-file [`Writer`] driver
//! - [`testing`] - Test utilities (feature-gated)
//!
//! Language crates (e.g. `kiln-codegen-rust`) provide artifacts whose
//! finalize step parses, cleans and formats the rendered body.

pub mod artifact;
pub mod section;
pub mod writer;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use artifact::{Artifact, RawFile, SectionsFn};
pub use section::{
    SectionDescriptor, SectionRenderer, TemplateError, TemplateErrorKind, render_sections,
};
pub use writer::{CheckOutcome, GenerateReport, PreviewFile, Writer};
