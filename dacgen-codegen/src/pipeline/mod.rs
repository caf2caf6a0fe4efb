//! Phase pipeline of a generation run.
//!
//! A [`Pipeline`] runs [`Phase`]s in order against a shared
//! [`CompilationContext`], calling [`Plugin`] hooks around each one:
//!
//! ```text
//! load → entities → methods → routines → (render-entities → render-aggregate)
//! ```
//!
//! The render phases are added by the caller so resolution can run on its
//! own (see `dacgen check` and `dacgen explain`).

mod context;
mod diagnostic;
mod phase;
pub mod phases;
mod plugin;
mod runner;

pub use context::CompilationContext;
pub use diagnostic::{Diagnostic, Severity};
pub use phase::{Phase, PhaseInfo};
pub use plugin::{Plugin, TracingPlugin};
pub use runner::Pipeline;
