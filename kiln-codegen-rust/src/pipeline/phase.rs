//! Finalizer phase trait.

use super::FinalizeContext;
use crate::Result;

/// Information about a finalizer phase.
#[derive(Debug, Clone)]
pub struct PhaseInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// One step of the finalizer.
///
/// Phases run in a fixed order: `parse`, `prune-imports`, `sort-imports`,
/// `print`, `normalize`. Each phase reads and updates the
/// [`FinalizeContext`].
pub trait Phase: Send + Sync {
    /// The name of this phase (used in diagnostics and plugin hooks).
    fn name(&self) -> &'static str;

    /// A human-readable description of what this phase does.
    fn description(&self) -> &'static str;

    /// Run this phase on the context.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be finalized. Non-fatal findings
    /// are recorded as diagnostics instead.
    fn run(&self, ctx: &mut FinalizeContext) -> Result<()>;

    fn info(&self) -> PhaseInfo {
        PhaseInfo {
            name: self.name(),
            description: self.description(),
        }
    }
}
