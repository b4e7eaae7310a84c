//! Built-in finalizer phases, in execution order.

mod normalize;
mod parse;
mod print;
mod prune;
mod sort;

pub use normalize::NormalizePhase;
pub use parse::ParsePhase;
pub use print::PrintPhase;
pub use prune::PruneImportsPhase;
pub use sort::SortImportsPhase;

use super::Phase;

/// The built-in phases in the order they run.
pub fn builtin() -> Vec<Box<dyn Phase>> {
    vec![
        Box::new(ParsePhase),
        Box::new(PruneImportsPhase),
        Box::new(SortImportsPhase),
        Box::new(PrintPhase),
        Box::new(NormalizePhase),
    ]
}
