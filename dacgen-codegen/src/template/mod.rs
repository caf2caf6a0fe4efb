//! Template rendering.
//!
//! - [`TemplateRenderer`] - the seam the generator renders through
//! - [`Templator`] - the bundled mustache-style implementation
//! - [`Keyword`] - named transforms applied through tag pipes
//! - [`RenderPass`] - per-render keyword state, created fresh for every file

mod engine;
mod error;
mod keyword;
pub mod keywords;
mod pass;

pub use engine::{Template, TemplateRenderer, Templator};
pub use error::RenderError;
pub use keyword::{Keyword, KeywordCall, KeywordRegistry};
pub use keywords::keywords_for;
pub use pass::RenderPass;
