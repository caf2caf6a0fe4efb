//! Schema resolution and code generation for dacgen.
//!
//! # Module Organization
//!
//! - [`resolve`] - entity, method and routine resolution from the schema tree
//! - [`template`] - the renderer seam, the bundled engine and its keywords
//! - [`render`] - template dictionaries and the bundled C# templates
//! - [`pipeline`] - phases, plugins and the context they share
//! - [`Generator`] - the orchestrator tying them together
//!
//! # Example
//!
//! ```ignore
//! use dacgen_codegen::{GenerateOptions, Generator, Outcome};
//!
//! let generator = Generator::load("dacgen.toml")?;
//! if let Outcome::Generated(generation) = generator.generate(&GenerateOptions::default())? {
//!     for path in &generation.written {
//!         println!("wrote {}", path.display());
//!     }
//! }
//! ```

mod error;
mod generate;
pub mod pipeline;
pub mod render;
pub mod resolve;
pub mod template;

pub use error::{Error, Result};
pub use generate::{GenerateOptions, Generation, Generator, Outcome, Preflight, SkipReason};
