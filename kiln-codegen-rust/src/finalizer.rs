//! The Rust file finalizer.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    Error, Result,
    imports::ImportEntry,
    pipeline::{
        Diagnostic, FinalizeContext, Phase, PhaseInfo, Plugin,
        phases,
    },
};

/// Result of finalizing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finalized {
    /// Final file content.
    pub content: String,
    /// Imports removed because nothing referenced them.
    pub removed: Vec<ImportEntry>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Turns a rendered body into a canonical Rust source file.
///
/// The body goes through `parse`, `prune-imports`, `sort-imports`, `print`
/// and `normalize`. [`finalize`] writes the file twice: once after
/// printing, and again after the printed text is read back and normalized.
/// If the body does not parse, nothing is written.
///
/// A finalizer keeps no state between files; plugins may.
///
/// # Example
///
/// ```
/// use kiln_codegen_rust::Finalizer;
///
/// let body = "use std::fmt;\nuse std::str;\nfn valid(b: &[u8]) -> bool { str::from_utf8(b).is_ok() }\n";
/// let out = Finalizer::new().format_str(body)?;
///
/// assert!(!out.content.contains("use std::fmt;"));
/// assert_eq!(out.removed[0].path, "std::fmt");
/// # Ok::<(), Box<kiln_codegen_rust::Error>>(())
/// ```
///
/// [`finalize`]: Finalizer::finalize
#[derive(Default)]
pub struct Finalizer {
    plugins: Vec<Box<dyn Plugin>>,
}

impl Finalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plugin to receive phase lifecycle hooks.
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// The phases every file goes through, in order.
    pub fn phases() -> Vec<PhaseInfo> {
        phases::builtin().iter().map(|phase| phase.info()).collect()
    }

    /// Finalize `body` into the file at `path`.
    ///
    /// # Errors
    ///
    /// - [`Error::Syntax`] if the body does not parse; `path` is not touched.
    /// - [`Error::Io`] if the file cannot be written or read back.
    /// - [`Error::Format`] if the printed text cannot be normalized; the
    ///   printed (unnormalized) file is left on disk.
    pub fn finalize(&self, path: &Path, body: &str) -> Result<Finalized> {
        let _span = tracing::debug_span!("finalize", path = %path.display()).entered();

        let ctx = self
            .run(FinalizeContext::for_file(path, body))
            .inspect_err(|e| {
                if !e.is_syntax() && path.exists() {
                    tracing::warn!(path = %path.display(), "left a partially finalized file on disk");
                }
            })?;
        Ok(finished(ctx))
    }

    /// Finalize an existing file in place.
    pub fn format_file(&self, path: &Path) -> Result<Finalized> {
        let body = fs::read_to_string(path).map_err(|e| Error::io(path, "read", e))?;
        self.finalize(path, &body)
    }

    /// Run every phase in memory and return the final content.
    pub fn format_str(&self, body: &str) -> Result<Finalized> {
        let _span = tracing::debug_span!("finalize", path = crate::error::IN_MEMORY).entered();

        let ctx = self.run(FinalizeContext::in_memory(body))?;
        Ok(finished(ctx))
    }

    fn run(&self, mut ctx: FinalizeContext) -> Result<FinalizeContext> {
        for phase in phases::builtin() {
            self.run_phase(phase.as_ref(), &mut ctx)?;
        }
        Ok(ctx)
    }

    /// Run a single phase with plugin hooks.
    fn run_phase(&self, phase: &dyn Phase, ctx: &mut FinalizeContext) -> Result<()> {
        let name = phase.name();

        for plugin in &self.plugins {
            plugin.on_before_phase(name, ctx)?;
        }

        tracing::trace!(phase = name, "running phase");
        phase.run(ctx)?;

        for plugin in &self.plugins {
            plugin.on_after_phase(name, ctx)?;
        }

        Ok(())
    }
}

fn finished(ctx: FinalizeContext) -> Finalized {
    Finalized {
        content: ctx.output.unwrap_or_default(),
        removed: ctx.removed,
        diagnostics: ctx.diagnostics,
    }
}

/// Finalize a file with a default [`Finalizer`].
pub fn finalize(path: impl Into<PathBuf>, body: &str) -> Result<()> {
    let path = path.into();
    Finalizer::new().finalize(&path, body).map(|_| ())
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use tempfile::TempDir;

    use super::*;

    struct CountingPlugin {
        before: AtomicUsize,
        after: AtomicUsize,
    }

    impl Plugin for CountingPlugin {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn on_before_phase(&self, _phase: &str, _ctx: &mut FinalizeContext) -> Result<()> {
            self.before.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn on_after_phase(&self, _phase: &str, _ctx: &mut FinalizeContext) -> Result<()> {
            self.after.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FailingPlugin;

    impl Plugin for FailingPlugin {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn on_after_phase(&self, phase: &str, ctx: &mut FinalizeContext) -> Result<()> {
            if phase == "sort-imports" {
                return Err(Error::format(&ctx.display_path(), "stop"));
            }
            Ok(())
        }
    }

    #[test]
    fn test_phase_order() {
        let names: Vec<_> = Finalizer::phases().iter().map(|p| p.name).collect();

        assert_eq!(
            names,
            vec!["parse", "prune-imports", "sort-imports", "print", "normalize"]
        );
    }

    #[test]
    fn test_plugin_hooks_run_for_every_phase() {
        let plugin = Arc::new(CountingPlugin {
            before: AtomicUsize::new(0),
            after: AtomicUsize::new(0),
        });
        let finalizer = Finalizer::new().plugin(plugin.clone());

        finalizer.format_str("fn main() {}\n").unwrap();

        assert_eq!(plugin.before.load(Ordering::SeqCst), 5);
        assert_eq!(plugin.after.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_plugin_error_aborts_before_write() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("lib.rs");

        let err = Finalizer::new()
            .plugin(FailingPlugin)
            .finalize(&path, "fn main() {}\n")
            .unwrap_err();

        assert!(err.to_string().contains("stop"));
        assert!(!path.exists());
    }

    #[test]
    fn test_finalize_writes_canonical_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("gen").join("lib.rs");

        let out = Finalizer::new()
            .finalize(&path, "use std::fmt;\nfn a() {}\nfn b() {}\n")
            .unwrap();

        assert_eq!(out.content, "fn a() {}\n\nfn b() {}\n");
        assert_eq!(fs::read_to_string(&path).unwrap(), out.content);
    }

    #[test]
    fn test_syntax_error_leaves_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("lib.rs");
        fs::write(&path, "// keep me\n").unwrap();

        let err = Finalizer::new().finalize(&path, "fn broken( {").unwrap_err();

        assert!(err.is_syntax());
        assert_eq!(fs::read_to_string(&path).unwrap(), "// keep me\n");
    }

    #[test]
    fn test_format_file_in_place() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("lib.rs");
        fs::write(&path, "fn b()   {}\nuse std::fmt;\n").unwrap();

        let out = Finalizer::new().format_file(&path).unwrap();

        assert_eq!(out.content, "fn b() {}\n");
        assert_eq!(fs::read_to_string(&path).unwrap(), "fn b() {}\n");
    }

    #[test]
    fn test_format_file_missing() {
        let temp = TempDir::new().unwrap();

        let err = Finalizer::new()
            .format_file(&temp.path().join("missing.rs"))
            .unwrap_err();

        assert!(matches!(*err, Error::Io { action: "read", .. }));
    }
}
