use std::path::PathBuf;

use clap::Args;
use eyre::Result;

use super::UnwrapOrExit;
use crate::{
    ops,
    project::Project,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    /// Path to kiln.toml (defaults to ./kiln.toml)
    #[arg(short, long, default_value = "kiln.toml")]
    pub config: PathBuf,
}

impl CheckCommand {
    pub fn run(&self) -> Result<()> {
        let project = Project::open(&self.config).unwrap_or_exit();
        let artifacts = project.artifacts(None).unwrap_or_exit();

        let report = ops::check(&project, &artifacts)?;
        report.render(&mut TerminalOutput::new());

        if !report.is_valid() {
            std::process::exit(1);
        }
        Ok(())
    }
}
