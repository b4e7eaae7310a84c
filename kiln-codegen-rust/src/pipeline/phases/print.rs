//! Print phase - structural pretty-printing, first write.

use std::fs;

use crate::{
    Error, Result,
    pipeline::{FinalizeContext, Phase},
};

/// Prints the syntax tree, puts the plain comments back next to the nodes
/// they belong to and, for on-disk files, writes the result.
///
/// The file is truncated and fully replaced; parent directories are
/// created as needed.
pub struct PrintPhase;

impl Phase for PrintPhase {
    fn name(&self) -> &'static str {
        "print"
    }

    fn description(&self) -> &'static str {
        "Pretty-print the syntax tree and write the file"
    }

    fn run(&self, ctx: &mut FinalizeContext) -> Result<()> {
        let syntax = ctx.syntax()?;
        let printed = ctx
            .comments
            .reattach(&prettyplease::unparse(syntax), syntax)
            .map_err(|e| {
                Error::format(&ctx.display_path(), format!("printed text does not parse: {e}"))
            })?;

        if let Some(path) = &ctx.path {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)
                    .map_err(|e| Error::io(parent, "create directory", e))?;
            }
            fs::write(path, &printed).map_err(|e| Error::io(path, "write", e))?;
        }

        ctx.output = Some(printed);
        Ok(())
    }
}
