//! Schema package loading for dacgen.
//!
//! A schema package is a zip archive whose `model.xml` entry serializes the
//! database object model. [`load_dacpac`] extracts and parses it into a
//! [`SchemaTree`] with namespace prefixes stripped from every name, so the
//! resolvers can query it with plain paths.

mod element;
mod error;
mod loader;
mod tree;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use element::ElementType;
pub use error::{Error, ErrorKind, Result};
pub use loader::{MODEL_ENTRY, load_dacpac};
pub use tree::{Element, SchemaTree};
