//! Check operation - generate every file in memory and report failures.

use eyre::Result;
use kiln_codegen::Artifact;

use crate::{
    project::Project,
    reports::{CheckReport, FileFailure},
};

/// Execute the check operation.
///
/// Unlike bake, every file is checked even after one fails. Nothing is
/// written.
pub fn check(project: &Project, artifacts: &[Box<dyn Artifact>]) -> Result<CheckReport> {
    let writer = project.writer(&project.output_dir(None))?;

    let failures = writer
        .check(artifacts)
        .into_iter()
        .filter_map(|outcome| {
            outcome.error.map(|error| FileFailure {
                path: outcome.path.to_string_lossy().replace('\\', "/"),
                message: format!("{error:#}"),
            })
        })
        .collect();

    Ok(CheckReport {
        config_path: project.config_path().to_path_buf(),
        checked: artifacts.len(),
        failures,
    })
}
