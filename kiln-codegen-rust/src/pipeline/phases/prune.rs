//! Prune phase - drop imports nothing refers to.

use crate::{
    Result,
    imports::{collect_imports, prune_unused},
    pipeline::{FinalizeContext, Phase},
};

/// Removes imports whose bound name is never referenced.
pub struct PruneImportsPhase;

impl Phase for PruneImportsPhase {
    fn name(&self) -> &'static str {
        "prune-imports"
    }

    fn description(&self) -> &'static str {
        "Remove imports whose name is not referenced"
    }

    fn run(&self, ctx: &mut FinalizeContext) -> Result<()> {
        let syntax = ctx.syntax_mut()?;
        let removed = prune_unused(syntax);
        let globs: Vec<String> = collect_imports(syntax)
            .into_iter()
            .filter(|entry| entry.path.ends_with('*'))
            .map(|entry| entry.path)
            .collect();

        for entry in &removed {
            ctx.add_info(self.name(), format!("removed unused import `{entry}`"));
        }
        for glob in globs {
            ctx.add_warning(
                self.name(),
                format!("glob import `{glob}` is never removed, even when unused"),
            );
        }
        ctx.removed.extend(removed);
        Ok(())
    }
}
