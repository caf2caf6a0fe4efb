//! Explain operation - show what a run resolves.

use std::path::Path;

use dacgen_codegen::{GenerateOptions, Generator, Outcome};
use dacgen_core::short_name;
use dacgen_ir::{DataModel, Entity, EntityProperty, Method, Routine};
use eyre::{Context, Result};

use crate::reports::{
    ColumnInfo, EntityInfo, ExplainReport, MethodInfo, PhaseInfo, ResolvedModel, RoutineInfo,
};

/// Execute the explain operation.
///
/// Resolves the schema package without rendering and describes the entities,
/// accessors and routines the templates would receive.
pub fn explain(
    generator: &Generator,
    options: &GenerateOptions,
    config_path: &Path,
) -> Result<ExplainReport> {
    let phases = generator
        .phase_info()
        .into_iter()
        .map(|p| PhaseInfo {
            name: p.name.to_string(),
            description: p.description.to_string(),
        })
        .collect();

    let outcome = generator.resolve(options).wrap_err("Pipeline failed")?;
    let (skipped, resolved) = match outcome {
        Outcome::Skipped(reason) => (Some(reason.to_string()), None),
        Outcome::Generated(generation) => (
            None,
            Some(ResolvedModel {
                dacpac: generation.dacpac.clone(),
                entities: generation
                    .model
                    .entities
                    .iter()
                    .map(|e| entity_info(&generation.model, e))
                    .collect(),
                methods: generation
                    .model
                    .methods
                    .iter()
                    .map(|m| method_info(&generation.model, m))
                    .collect(),
                routines: generation.model.routines.iter().map(routine_info).collect(),
            }),
        ),
    };

    Ok(ExplainReport {
        config_path: config_path.to_path_buf(),
        phases,
        skipped,
        resolved,
    })
}

fn entity_info(model: &DataModel, entity: &Entity) -> EntityInfo {
    EntityInfo {
        table: entity.table_name.clone(),
        name: entity.name.clone(),
        access: entity.access.clone(),
        columns: entity.properties.iter().map(column_info).collect(),
        children: model
            .methods_by_id(&entity.foreigns)
            .map(|m| m.key_name.clone())
            .collect(),
    }
}

fn column_info(property: &EntityProperty) -> ColumnInfo {
    ColumnInfo {
        name: property.short_name().to_string(),
        sql_type: property.sql_type.clone(),
        type_name: if property.ty.is_unknown() {
            "<unmapped>".to_string()
        } else {
            property.ty.name.clone()
        },
        identity: property.identity,
    }
}

fn method_info(model: &DataModel, method: &Method) -> MethodInfo {
    let asyncs = [
        ("get", method.asyncs.get),
        ("save", method.asyncs.save),
        ("delete", method.asyncs.delete),
    ]
    .into_iter()
    .filter_map(|(verb, is_async)| is_async.then_some(verb))
    .collect();

    MethodInfo {
        key: method.key_name.clone(),
        kind: method.kind.as_str().to_string(),
        entity: method.entity_name.clone(),
        unique: method.unique,
        params: method
            .params
            .iter()
            .map(|p| p.short_name().to_string())
            .collect(),
        asyncs,
        links: model
            .methods_by_id(&method.foreigns)
            .map(|m| m.key_name.clone())
            .collect(),
    }
}

fn routine_info(routine: &Routine) -> RoutineInfo {
    RoutineInfo {
        kind: routine.kind.as_str().to_string(),
        name: routine.name.clone(),
        params: routine
            .params
            .iter()
            .map(|p| format!("{} {}", short_name(&p.name), short_name(&p.sql_type)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use dacgen_manifest::ExtractorConfig;
    use dacgen_schema::testing::{Column, ModelBuilder};
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_explain_describes_links() {
        let dir = TempDir::new().unwrap();
        let dacpac = dir.path().join("Db.dacpac");
        ModelBuilder::new()
            .table("[dbo].[Parent]", &[Column::new("Id", "int").not_null()])
            .table(
                "[dbo].[Child]",
                &[
                    Column::new("Id", "int").not_null().identity(),
                    Column::new("ParentId", "int"),
                    Column::new("Shape", "geography"),
                ],
            )
            .foreign_key(
                "[dbo].[FK_Child_Parent]",
                "[dbo].[Child]",
                &["ParentId"],
                "[dbo].[Parent]",
                &["Id"],
            )
            .primary_key("[dbo].[PK_Parent]", "[dbo].[Parent]", &["Id"])
            .scalar_function("[dbo].[Total]", &[("@From", "date")])
            .write_dacpac(&dacpac)
            .unwrap();
        let config = ExtractorConfig {
            dacpac: Some(dacpac),
            ..ExtractorConfig::default()
        };

        let report = explain(
            &Generator::new(config),
            &GenerateOptions::default(),
            Path::new("dacgen.toml"),
        )
        .unwrap();

        assert_eq!(report.phases.first().unwrap().name, "load");
        assert_eq!(report.phases.last().unwrap().name, "render-aggregate");

        let resolved = report.resolved.unwrap();
        let parent = &resolved.entities[0];
        assert_eq!(parent.children, vec!["[dbo].[FK_Child_Parent]"]);
        let child = &resolved.entities[1];
        assert_eq!(child.columns[2].type_name, "<unmapped>");

        let pk = resolved
            .methods
            .iter()
            .find(|m| m.key == "[dbo].[PK_Parent]")
            .unwrap();
        assert_eq!(pk.kind, "primary key");
        assert_eq!(pk.links, vec!["[dbo].[FK_Child_Parent]"]);

        assert_eq!(resolved.routines[0].kind, "scalar function");
        assert_eq!(resolved.routines[0].params, vec!["@From date"]);
    }
}
