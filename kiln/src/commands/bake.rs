use std::{path::PathBuf, sync::Arc};

use clap::Args;
use eyre::Result;
use kiln_codegen_rust::pipeline::SnapshotPlugin;

use super::UnwrapOrExit;
use crate::{
    ops::{self, bake::BakeOptions},
    project::Project,
    reports::{Report, TerminalOutput},
};

/// Where `--visualize` writes phase snapshots, below the output root.
const DEBUG_DIR: &str = ".kiln/debug";

#[derive(Args)]
pub struct BakeCommand {
    /// Path to kiln.toml (defaults to ./kiln.toml)
    #[arg(short, long, default_value = "kiln.toml")]
    pub config: PathBuf,

    /// Output root (overrides project.output)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Preview generated files without writing to disk
    #[arg(long)]
    pub dry_run: bool,

    /// Write the source of every Rust file after each finalizer phase
    #[arg(long)]
    pub visualize: bool,

    /// Keep files already in the generated directory
    #[arg(long)]
    pub no_clean: bool,
}

impl BakeCommand {
    pub fn run(&self) -> Result<()> {
        let project = Project::open(&self.config).unwrap_or_exit();
        let output_dir = project.output_dir(self.output.as_deref());

        let debug_dir = self.visualize.then(|| output_dir.join(DEBUG_DIR));
        let snapshots = debug_dir
            .as_ref()
            .map(|dir| Arc::new(SnapshotPlugin::with_output_dir(dir)));
        let artifacts = project.artifacts(snapshots.as_ref()).unwrap_or_exit();

        let report = ops::bake(
            &project,
            &artifacts,
            BakeOptions {
                output_dir: &output_dir,
                dry_run: self.dry_run,
                clean: !self.no_clean,
                debug_dir: debug_dir.as_deref(),
            },
        )?;

        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
