use dacgen_schema::load_dacpac;

use crate::{
    Result,
    pipeline::{CompilationContext, Phase},
};

/// Phase that reads the model document out of the schema package.
pub struct LoadPhase;

impl Phase for LoadPhase {
    fn name(&self) -> &'static str {
        "load"
    }

    fn description(&self) -> &'static str {
        "loading the schema package"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        let tree = load_dacpac(&ctx.dacpac)?;
        tracing::info!(path = %ctx.dacpac.display(), "loaded schema package");
        ctx.schema = Some(tree);
        Ok(())
    }
}
