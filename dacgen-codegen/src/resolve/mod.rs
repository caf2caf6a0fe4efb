//! Resolution of the schema tree into the [`dacgen_ir::DataModel`].
//!
//! Entities come first; methods are resolved against them, and routines
//! stand alone.

mod entities;
mod methods;
mod routines;

pub use entities::resolve_entities;
pub use methods::resolve_methods;
pub use routines::{resolve_all_routines, resolve_routines};
