//! Phases that render output files into the context's file set.

use std::sync::Arc;

use dacgen_core::OutputFile;

use crate::{
    Result,
    pipeline::{CompilationContext, Phase},
    render::{render_aggregate, render_entity},
    template::TemplateRenderer,
};

/// Phase that renders one record-type file per entity into the model
/// output path.
pub struct RenderEntitiesPhase {
    renderer: Arc<dyn TemplateRenderer>,
}

impl RenderEntitiesPhase {
    pub fn new(renderer: Arc<dyn TemplateRenderer>) -> Self {
        Self { renderer }
    }
}

impl Phase for RenderEntitiesPhase {
    fn name(&self) -> &'static str {
        "render-entities"
    }

    fn description(&self) -> &'static str {
        "rendering entity files"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        let config = &ctx.config;
        for entity in &ctx.model.entities {
            let content = render_entity(self.renderer.as_ref(), config, &ctx.model, entity)?;
            let path = config.model_out_path.join(config.file_name(&entity.name));
            tracing::debug!(path = %path.display(), "rendered entity");
            ctx.files.push(OutputFile::new(path, content));
        }
        Ok(())
    }
}

/// Phase that renders the data-access class and its interface into the
/// data-access output path.
pub struct RenderAggregatePhase {
    renderer: Arc<dyn TemplateRenderer>,
}

impl RenderAggregatePhase {
    pub fn new(renderer: Arc<dyn TemplateRenderer>) -> Self {
        Self { renderer }
    }
}

impl Phase for RenderAggregatePhase {
    fn name(&self) -> &'static str {
        "render-aggregate"
    }

    fn description(&self) -> &'static str {
        "rendering the data-access class"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        let config = &ctx.config;
        let rendered = render_aggregate(self.renderer.as_ref(), config, &ctx.model)?;
        let class_name = &config.data_access_class_name;
        let dir = &config.dal_out_path;

        ctx.files.push(OutputFile::new(
            dir.join(config.file_name(class_name)),
            rendered.implementation,
        ));
        ctx.files.push(OutputFile::new(
            dir.join(config.file_name(&format!("I{class_name}"))),
            rendered.interface,
        ));
        Ok(())
    }
}
