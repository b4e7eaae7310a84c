use std::path::PathBuf;

use clap::Args;
use eyre::Result;

use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct InitCommand {
    /// Project directory (created if missing)
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Project name (defaults to the directory name)
    #[arg(short, long)]
    pub name: Option<String>,
}

impl InitCommand {
    pub fn run(&self) -> Result<()> {
        let report = ops::init(&self.dir, self.name.as_deref())?;
        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
