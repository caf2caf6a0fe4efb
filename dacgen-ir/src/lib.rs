//! Resolved data model for the dacgen code generator.
//!
//! # Architecture
//!
//! ```text
//! .dacpac → dacgen-schema (SchemaTree) → resolvers → dacgen-ir (DataModel) → templates
//! ```
//!
//! The types here are built fresh for each generation run and are plain
//! data: no schema access, no rendering concerns.

mod entity;
mod method;
mod model;
mod routine;

pub use entity::{Entity, EntityProperty};
pub use method::{AsyncFlags, Method, MethodId, MethodKind};
pub use model::DataModel;
pub use routine::{Routine, RoutineKind, RoutineParam};
