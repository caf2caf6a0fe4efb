//! Phases that turn the schema tree into the data model.

use crate::{
    Result,
    pipeline::{CompilationContext, Phase, context::schema_not_loaded},
    resolve::{resolve_all_routines, resolve_entities, resolve_methods},
};

/// Phase that builds one entity per retained table.
pub struct EntitiesPhase;

impl Phase for EntitiesPhase {
    fn name(&self) -> &'static str {
        "entities"
    }

    fn description(&self) -> &'static str {
        "resolving entities"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        let mut warnings = Vec::new();
        let entities = resolve_entities(ctx.schema()?, &ctx.config, &mut warnings);
        tracing::info!(count = entities.len(), "resolved entities");
        ctx.model.entities = entities;
        for warning in warnings {
            ctx.add_warning(self.name(), warning);
        }
        Ok(())
    }
}

/// Phase that derives accessors from keys and indexes.
pub struct MethodsPhase;

impl Phase for MethodsPhase {
    fn name(&self) -> &'static str {
        "methods"
    }

    fn description(&self) -> &'static str {
        "resolving methods"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        let mut warnings = Vec::new();
        let schema = ctx.schema.as_ref().ok_or_else(schema_not_loaded)?;
        resolve_methods(schema, &ctx.config, &mut ctx.model, &mut warnings);
        tracing::info!(count = ctx.model.methods.len(), "resolved methods");
        for warning in warnings {
            ctx.add_warning(self.name(), warning);
        }
        Ok(())
    }
}

/// Phase that collects procedure and function signatures.
pub struct RoutinesPhase;

impl Phase for RoutinesPhase {
    fn name(&self) -> &'static str {
        "routines"
    }

    fn description(&self) -> &'static str {
        "resolving routines"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        let routines = resolve_all_routines(ctx.schema()?);
        tracing::info!(count = routines.len(), "resolved routines");
        ctx.model.routines = routines;
        Ok(())
    }
}
