//! Finalizer plugin trait.

use std::sync::Arc;

use super::FinalizeContext;
use crate::Result;

/// A plugin that can hook into the finalizer.
///
/// Plugins receive callbacks before and after each phase runs, allowing
/// them to inspect or modify the context.
///
/// # Example
///
/// ```
/// use kiln_codegen_rust::{Finalizer, Result, pipeline::{FinalizeContext, Plugin}};
///
/// struct RemovedImports;
///
/// impl Plugin for RemovedImports {
///     fn name(&self) -> &'static str {
///         "removed-imports"
///     }
///
///     fn on_after_phase(&self, phase: &str, ctx: &mut FinalizeContext) -> Result<()> {
///         if phase == "prune-imports" {
///             for entry in &ctx.removed {
///                 eprintln!("removed {entry}");
///             }
///         }
///         Ok(())
///     }
/// }
///
/// let finalizer = Finalizer::new().plugin(RemovedImports);
/// # let _ = finalizer;
/// ```
pub trait Plugin: Send + Sync {
    /// The name of this plugin (for debugging and logging).
    fn name(&self) -> &'static str;

    /// Called before a phase runs.
    ///
    /// # Errors
    ///
    /// Return an error to abort finalization.
    #[allow(unused_variables)]
    fn on_before_phase(&self, phase: &str, ctx: &mut FinalizeContext) -> Result<()> {
        Ok(())
    }

    /// Called after a phase completes successfully.
    ///
    /// # Errors
    ///
    /// Return an error to abort finalization.
    #[allow(unused_variables)]
    fn on_after_phase(&self, phase: &str, ctx: &mut FinalizeContext) -> Result<()> {
        Ok(())
    }
}

/// Lets a caller keep a handle to a plugin it hands to the finalizer.
impl<P: Plugin> Plugin for Arc<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn on_before_phase(&self, phase: &str, ctx: &mut FinalizeContext) -> Result<()> {
        (**self).on_before_phase(phase, ctx)
    }

    fn on_after_phase(&self, phase: &str, ctx: &mut FinalizeContext) -> Result<()> {
        (**self).on_after_phase(phase, ctx)
    }
}
