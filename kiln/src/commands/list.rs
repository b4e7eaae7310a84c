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
pub struct ListCommand {
    /// Path to kiln.toml (defaults to ./kiln.toml)
    #[arg(short, long, default_value = "kiln.toml")]
    pub config: PathBuf,
}

impl ListCommand {
    pub fn run(&self) -> Result<()> {
        let project = Project::open(&self.config).unwrap_or_exit();

        ops::list(project.manifest()).render(&mut TerminalOutput::new());
        Ok(())
    }
}
