//! Sort phase - canonical import order.

use crate::{
    Result,
    imports::sort_imports,
    pipeline::{FinalizeContext, Phase},
};

/// Groups and orders the remaining imports.
pub struct SortImportsPhase;

impl Phase for SortImportsPhase {
    fn name(&self) -> &'static str {
        "sort-imports"
    }

    fn description(&self) -> &'static str {
        "Group imports (std, external, local) and sort each group"
    }

    fn run(&self, ctx: &mut FinalizeContext) -> Result<()> {
        sort_imports(ctx.syntax_mut()?);
        Ok(())
    }
}
