//! Core operations.
//!
//! This module contains the business logic for dacgen commands,
//! separated from CLI argument parsing and output rendering.

pub mod check;
pub mod explain;
pub mod generate;
pub mod init;

pub use check::check;
pub use explain::explain;
pub use generate::generate;
pub use init::init;

use dacgen_codegen::pipeline::Diagnostic;

/// Diagnostic text without the severity prefix, reports add their own.
fn diagnostic_message(diag: &Diagnostic) -> String {
    match &diag.location {
        Some(loc) => format!("{}\n  --> {}", diag.message, loc),
        None => diag.message.clone(),
    }
}
