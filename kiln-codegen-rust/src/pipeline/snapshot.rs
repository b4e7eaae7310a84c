//! Snapshot plugin for visualizing what each phase does to a file.

use std::{
    fs,
    path::{Component, Path, PathBuf},
    sync::{PoisonError, RwLock},
};

use super::{FinalizeContext, Plugin};
use crate::{Error, Result};

/// The text of one file right after a phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseSnapshot {
    /// The file, as shown in messages.
    pub file: String,
    /// The phase that just completed.
    pub phase: String,
    /// The file as printed from the tree (before `print`) or the text
    /// itself (from `print` on).
    pub source: String,
    /// Imports removed so far, rendered as paths.
    pub removed: Vec<String>,
}

/// A plugin that captures the file after each phase.
///
/// Used by `kiln bake --visualize`. When an output directory is set, every
/// snapshot is also written to `<dir>/<file>/<phase>.rs` as it is taken.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// use kiln_codegen_rust::{Finalizer, pipeline::SnapshotPlugin};
///
/// let snapshots = Arc::new(SnapshotPlugin::with_output_dir(".kiln/debug"));
/// let finalizer = Finalizer::new().plugin(snapshots.clone());
/// finalizer.format_str("use std::fmt;\nfn main() {}\n")?;
///
/// assert_eq!(snapshots.snapshots().len(), 5);
/// # Ok::<(), Box<kiln_codegen_rust::Error>>(())
/// ```
#[derive(Debug, Default)]
pub struct SnapshotPlugin {
    snapshots: RwLock<Vec<PhaseSnapshot>>,
    output_dir: Option<PathBuf>,
}

impl SnapshotPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a snapshot plugin that also writes to a directory.
    pub fn with_output_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            snapshots: RwLock::new(Vec::new()),
            output_dir: Some(output_dir.into()),
        }
    }

    /// Get all collected snapshots.
    pub fn snapshots(&self) -> Vec<PhaseSnapshot> {
        self.snapshots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Write all snapshots below `dir`.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<()> {
        for snapshot in self.snapshots() {
            write_snapshot(dir.as_ref(), &snapshot)?;
        }
        Ok(())
    }

    fn capture(&self, phase: &str, ctx: &FinalizeContext) -> PhaseSnapshot {
        let source = match (&ctx.output, &ctx.syntax) {
            (Some(output), _) => output.clone(),
            (None, Some(syntax)) => prettyplease::unparse(syntax),
            (None, None) => ctx.source.clone(),
        };
        PhaseSnapshot {
            file: ctx.display_path(),
            phase: phase.to_string(),
            source,
            removed: ctx.removed.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Plugin for SnapshotPlugin {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    fn on_after_phase(&self, phase: &str, ctx: &mut FinalizeContext) -> Result<()> {
        let snapshot = self.capture(phase, ctx);

        if let Some(dir) = &self.output_dir {
            write_snapshot(dir, &snapshot)?;
        }

        self.snapshots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(snapshot);
        Ok(())
    }
}

fn write_snapshot(dir: &Path, snapshot: &PhaseSnapshot) -> Result<()> {
    let file_dir = dir.join(flatten(&snapshot.file));
    fs::create_dir_all(&file_dir).map_err(|e| Error::io(&file_dir, "create directory", e))?;

    let path = file_dir.join(format!("{}.rs", snapshot.phase));
    fs::write(&path, &snapshot.source).map_err(|e| Error::io(&path, "write", e))
}

/// Turn a file path into a single directory name.
fn flatten(file: &str) -> String {
    Path::new(file)
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("__")
        .replace(['<', '>'], "")
}
