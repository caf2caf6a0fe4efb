//! Pipeline phase trait.

use super::CompilationContext;
use crate::Result;

/// Name and description of a phase, for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// A step of a generation run.
///
/// Phases run in order against the shared [`CompilationContext`]. A phase
/// that fails aborts the run; non-fatal issues go into the context's
/// diagnostics instead.
pub trait Phase: Send + Sync {
    /// Short name, used in diagnostics and plugin hooks.
    fn name(&self) -> &'static str;

    /// What the phase is doing, phrased to follow "while" (e.g. "resolving
    /// entities"). Failures are reported with it.
    fn description(&self) -> &'static str;

    fn run(&self, ctx: &mut CompilationContext) -> Result<()>;

    fn info(&self) -> PhaseInfo {
        PhaseInfo {
            name: self.name(),
            description: self.description(),
        }
    }
}
