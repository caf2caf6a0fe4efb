//! Built-in pipeline phases.
//!
//! - [`LoadPhase`] - reads the schema package into a tree
//! - [`EntitiesPhase`], [`MethodsPhase`], [`RoutinesPhase`] - build the model
//! - [`RenderEntitiesPhase`], [`RenderAggregatePhase`] - render output files

mod load;
mod render;
mod resolve;

pub use load::LoadPhase;
pub use render::{RenderAggregatePhase, RenderEntitiesPhase};
pub use resolve::{EntitiesPhase, MethodsPhase, RoutinesPhase};
