//! State passed through the finalizer phases.

use std::path::PathBuf;

use super::{Diagnostic, Severity};
use crate::{
    Error, Result,
    comments::Comments,
    error::IN_MEMORY,
    imports::ImportEntry,
};

/// Context passed through all finalizer phases.
///
/// Each phase reads what earlier phases produced and fills in its own
/// part: `parse` sets `syntax` and `comments`, `prune-imports` fills
/// `removed`, `print` and `normalize` set `output`.
#[derive(Debug)]
pub struct FinalizeContext {
    /// Target file; `None` when formatting in memory.
    pub path: Option<PathBuf>,
    /// The candidate body handed to the finalizer.
    pub source: String,
    /// The parsed file (populated by the parse phase).
    pub syntax: Option<syn::File>,
    /// Plain comments of the source, which the syntax tree drops.
    pub comments: Comments,
    /// The current text of the file (populated by the print phase).
    pub output: Option<String>,
    /// Imports removed by the prune phase, in source order.
    pub removed: Vec<ImportEntry>,
    pub diagnostics: Vec<Diagnostic>,
}

impl FinalizeContext {
    /// Context for a body that will be written to `path`.
    pub fn for_file(path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        Self::new(Some(path.into()), source.into())
    }

    /// Context for a body formatted without touching disk.
    pub fn in_memory(source: impl Into<String>) -> Self {
        Self::new(None, source.into())
    }

    fn new(path: Option<PathBuf>, source: String) -> Self {
        Self {
            path,
            source,
            syntax: None,
            comments: Comments::default(),
            output: None,
            removed: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// The path as shown in messages.
    pub fn display_path(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => IN_MEMORY.to_string(),
        }
    }

    /// The parsed file, or an error if no parse has happened yet.
    pub fn syntax(&self) -> Result<&syn::File> {
        self.syntax.as_ref().ok_or_else(|| {
            Error::format(&self.display_path(), "no syntax tree; the parse phase has not run")
        })
    }

    pub fn syntax_mut(&mut self) -> Result<&mut syn::File> {
        let path = self.display_path();
        self.syntax
            .as_mut()
            .ok_or_else(|| Error::format(&path, "no syntax tree; the parse phase has not run"))
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Warning)
    }

    pub fn add_warning(&mut self, phase: &'static str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::warning(phase, message));
    }

    pub fn add_info(&mut self, phase: &'static str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::info(phase, message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_creation() {
        let ctx = FinalizeContext::in_memory("fn main() {}");

        assert!(ctx.syntax.is_none());
        assert!(ctx.output.is_none());
        assert!(ctx.removed.is_empty());
        assert!(ctx.comments.is_empty());
        assert_eq!(ctx.display_path(), "<memory>");
    }

    #[test]
    fn test_syntax_before_parse_is_an_error() {
        let mut ctx = FinalizeContext::for_file("gen/lib.rs", "");

        let err = ctx.syntax_mut().unwrap_err();

        assert!(err.to_string().contains("gen/lib.rs"));
    }

    #[test]
    fn test_context_diagnostics() {
        let mut ctx = FinalizeContext::in_memory("");

        ctx.add_info("prune-imports", "removed unused import `std::fmt`");
        assert!(!ctx.has_warnings());

        ctx.add_warning("prune-imports", "glob import `std::io::*` is never removed");
        assert!(ctx.has_warnings());
        assert_eq!(ctx.diagnostics.len(), 2);
    }
}
