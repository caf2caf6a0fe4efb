//! Rendering of the bundled C# templates.
//!
//! Every file is rendered with a fresh [`RenderPass`], so keyword state never
//! carries over from one file to the next.

mod views;

use dacgen_ir::{DataModel, Entity};
use dacgen_manifest::ExtractorConfig;
use serde::Serialize;

pub use views::{
    AggregateView, EntityView, HELPER_VERSION, MethodView, PropertyView, RoutineParamView,
    RoutineView,
};

use crate::{
    Error, Result,
    template::{RenderError, RenderPass, TemplateRenderer},
};

/// Record type of one table.
pub const ENTITY_TEMPLATE: &str = include_str!("templates/entity.cs.tmpl");
/// Data-access class with one accessor family per method.
pub const DATA_ACCESS_TEMPLATE: &str = include_str!("templates/data_access.cs.tmpl");
/// Interface implemented by the data-access class.
pub const DATA_ACCESS_INTERFACE_TEMPLATE: &str =
    include_str!("templates/data_access_interface.cs.tmpl");

/// The data-access implementation and interface, rendered from the same
/// dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedAggregate {
    pub implementation: String,
    pub interface: String,
}

pub fn render_entity(
    renderer: &dyn TemplateRenderer,
    config: &ExtractorConfig,
    model: &DataModel,
    entity: &Entity,
) -> Result<String> {
    let view = EntityView::new(config, model, entity);
    render(renderer, &entity.name, ENTITY_TEMPLATE, &view)
}

pub fn render_aggregate(
    renderer: &dyn TemplateRenderer,
    config: &ExtractorConfig,
    model: &DataModel,
) -> Result<RenderedAggregate> {
    let view = AggregateView::new(config, model);
    let class_name = &config.data_access_class_name;
    Ok(RenderedAggregate {
        implementation: render(renderer, class_name, DATA_ACCESS_TEMPLATE, &view)?,
        interface: render(
            renderer,
            &format!("I{class_name}"),
            DATA_ACCESS_INTERFACE_TEMPLATE,
            &view,
        )?,
    })
}

fn render(
    renderer: &dyn TemplateRenderer,
    name: &str,
    template: &str,
    view: &impl Serialize,
) -> Result<String> {
    let wrap = |source| Error::Render {
        template: name.to_string(),
        source,
    };
    let data = serde_json::to_value(view).map_err(|e| {
        wrap(RenderError::InvalidData {
            message: e.to_string(),
        })
    })?;
    renderer
        .render(template, &data, &mut RenderPass::new())
        .map_err(wrap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Template;

    #[test]
    fn test_bundled_templates_parse() {
        for template in [
            ENTITY_TEMPLATE,
            DATA_ACCESS_TEMPLATE,
            DATA_ACCESS_INTERFACE_TEMPLATE,
        ] {
            Template::parse(template).unwrap();
        }
    }
}
