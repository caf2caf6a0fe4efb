//! Report data structures for commands.
//!
//! This module provides data structures that separate data collection from rendering.
//! Commands build reports, then render them to an Output target.

mod check;
mod explain;
mod generate;
mod init;
mod output;

pub use check::{CheckReport, CheckSummary};
pub use explain::{
    ColumnInfo, EntityInfo, ExplainReport, MethodInfo, PhaseInfo, ResolvedModel, RoutineInfo,
};
pub use generate::{GenerateReport, GenerationResult, PreviewFile, PreviewResult, WrittenResult};
pub use init::InitReport;
pub use output::{Report, TerminalOutput};
