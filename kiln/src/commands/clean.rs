use std::path::PathBuf;

use clap::Args;
use eyre::Result;

use super::UnwrapOrExit;
use crate::{
    ops::{self, clean::CleanOptions},
    project::Project,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CleanCommand {
    /// Path to kiln.toml, used to find the output root
    #[arg(short, long, default_value = "kiln.toml")]
    pub config: PathBuf,

    /// Output root (skips reading kiln.toml)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Preview what would be deleted without actually deleting
    #[arg(long)]
    pub dry_run: bool,
}

impl CleanCommand {
    pub fn run(&self) -> Result<()> {
        let output_dir = match &self.output {
            Some(dir) => dir.clone(),
            None => Project::open(&self.config).unwrap_or_exit().output_dir(None),
        };

        let report = ops::clean(CleanOptions {
            output_dir: &output_dir,
            dry_run: self.dry_run,
        })?;

        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
