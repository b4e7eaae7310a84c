mod bake;
mod check;
mod clean;
mod completions;
mod fmt;
mod init;
mod list;

use bake::BakeCommand;
use check::CheckCommand;
use clap::{Parser, Subcommand};
use clean::CleanCommand;
use completions::CompletionsCommand;
use eyre::Result;
use fmt::FmtCommand;
use init::InitCommand;
use list::ListCommand;

/// Extension trait for exiting on manifest errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for kiln_manifest::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "kiln")]
#[command(version)]
#[command(about = "Render section templates into finalized source files")]
pub(crate) struct Cli {
    /// Log debug output to stderr (overridden by KILN_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Init(cmd) => cmd.run(),
            Commands::Bake(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
            Commands::Fmt(cmd) => cmd.run(),
            Commands::Clean(cmd) => cmd.run(),
            Commands::List(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter kiln.toml and section template
    Init(InitCommand),

    /// Render and finalize every file in kiln.toml
    Bake(BakeCommand),

    /// Generate every file in memory and report failures
    Check(CheckCommand),

    /// Finalize existing Rust files in place
    Fmt(FmtCommand),

    /// Remove the generated directory
    Clean(CleanCommand),

    /// List files and sections defined in kiln.toml
    List(ListCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}
