//! Entity resolution: one entity per retained table.

use std::collections::HashSet;

use dacgen_core::{ColumnTypeResolver, MappedType, is_row_version, name_parts, short_name};
use dacgen_ir::{Entity, EntityProperty};
use dacgen_manifest::{ColumnOverride, ExtractorConfig};
use dacgen_schema::{Element, ElementType, SchemaTree};
use indexmap::IndexMap;

/// Build the entity list in table declaration order.
///
/// Ignored tables are left out entirely. Column overrides are applied
/// before type resolution, so an enum override on the same column wins over
/// the overridden type. Overrides that neither match a column nor declare a
/// synthetic one are reported in `warnings`.
pub fn resolve_entities(
    tree: &SchemaTree,
    config: &ExtractorConfig,
    warnings: &mut Vec<String>,
) -> Vec<Entity> {
    let overrides = &config.overrides;
    let resolver = ColumnTypeResolver::csharp(&overrides.enums);
    let mut applied: HashSet<&str> = HashSet::new();
    let mut entities = Vec::new();

    for table in tree.model_elements(ElementType::Table) {
        let Some(table_name) = table.object_name() else {
            continue;
        };
        if overrides.is_ignored(table_name) {
            tracing::debug!(table = table_name, "skipping ignored table");
            continue;
        }

        let mut properties = Vec::new();
        for column in table.related("Columns", ElementType::SimpleColumn) {
            let Some(mut property) = raw_property(column) else {
                continue;
            };
            if let Some((key, column_override)) =
                find_column_override(&overrides.columns, &property.name)
            {
                applied.insert(key);
                apply_column_override(&mut property, column_override);
            }
            if is_row_version(&property.sql_type) || overrides.is_ignored(&property.name) {
                tracing::debug!(column = %property.name, "dropping column");
                continue;
            }
            property.ty = resolver.resolve(&property.sql_type, property.nullable, Some(&property.name));
            properties.push(property);
        }

        let prefix = format!("{table_name}.");
        for (key, column_override) in &overrides.columns {
            if applied.contains(key.as_str()) || !key.starts_with(&prefix) {
                continue;
            }
            applied.insert(key.as_str());
            if overrides.is_ignored(key) {
                continue;
            }
            let mut property = synthetic_property(key);
            apply_column_override(&mut property, column_override);
            property.ty = resolver.resolve(&property.sql_type, property.nullable, Some(key));
            tracing::debug!(column = %key, "adding override-defined column");
            properties.push(property);
        }

        let entity = build_entity(table_name, properties, config);
        tracing::debug!(
            table = table_name,
            entity = %entity.name,
            columns = entity.properties.len(),
            "resolved entity"
        );
        entities.push(entity);
    }

    for key in overrides.columns.keys() {
        if !applied.contains(key.as_str()) {
            let message = format!("column override '{key}' matches no column");
            tracing::warn!("{message}");
            warnings.push(message);
        }
    }

    entities
}

fn raw_property(column: Element<'_>) -> Option<EntityProperty> {
    let name = column.object_name()?;
    Some(EntityProperty {
        name: name.to_string(),
        sql_type: column
            .type_reference("TypeSpecifier")
            .unwrap_or_default()
            .to_string(),
        ty: MappedType::unknown(),
        nullable: column.property_bool("IsNullable").unwrap_or(true),
        identity: column.property_bool("IsIdentity").unwrap_or(false),
        foreign_name: None,
        annotations: Vec::new(),
    })
}

fn synthetic_property(name: &str) -> EntityProperty {
    EntityProperty {
        name: name.to_string(),
        sql_type: String::new(),
        ty: MappedType::unknown(),
        nullable: true,
        identity: false,
        foreign_name: None,
        annotations: Vec::new(),
    }
}

/// An override matches by qualified column name, or by bare name when the
/// override itself is unqualified.
fn find_column_override<'o>(
    columns: &'o IndexMap<String, ColumnOverride>,
    column: &str,
) -> Option<(&'o str, &'o ColumnOverride)> {
    if let Some((key, found)) = columns.get_key_value(column) {
        return Some((key.as_str(), found));
    }
    let bare = short_name(column);
    columns
        .iter()
        .find(|(key, _)| name_parts(key).len() == 1 && short_name(key) == bare)
        .map(|(key, found)| (key.as_str(), found))
}

fn apply_column_override(property: &mut EntityProperty, column_override: &ColumnOverride) {
    if let Some(sql_type) = &column_override.sql_type {
        property.sql_type = sql_type.clone();
    }
    if let Some(nullable) = column_override.nullable {
        property.nullable = nullable;
    }
    if let Some(annotations) = &column_override.annotations {
        property.annotations = annotations.clone();
    }
}

fn build_entity(table_name: &str, properties: Vec<EntityProperty>, config: &ExtractorConfig) -> Entity {
    let entity_override = config.overrides.entity(table_name);
    Entity {
        table_name: table_name.to_string(),
        name: entity_override
            .and_then(|o| o.name.clone())
            .unwrap_or_else(|| short_name(table_name).to_string()),
        properties,
        annotations: entity_override
            .and_then(|o| o.annotations.clone())
            .unwrap_or_default(),
        access: entity_override
            .and_then(|o| o.access.clone())
            .unwrap_or_else(|| "public".to_string()),
        include_foreign_key: entity_override
            .and_then(|o| o.include_foreign_key)
            .unwrap_or(true),
        foreigns: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn override_for(name: &str) -> ColumnOverride {
        ColumnOverride {
            name: name.to_string(),
            sql_type: Some("nvarchar".to_string()),
            nullable: None,
            annotations: None,
        }
    }

    #[test]
    fn test_find_column_override_prefers_qualified_name() {
        let mut columns = IndexMap::new();
        columns.insert("Name".to_string(), override_for("Name"));
        columns.insert(
            "[dbo].[Table1].[Name]".to_string(),
            override_for("[dbo].[Table1].[Name]"),
        );

        let (key, _) = find_column_override(&columns, "[dbo].[Table1].[Name]").unwrap();
        assert_eq!(key, "[dbo].[Table1].[Name]");

        let (key, _) = find_column_override(&columns, "[dbo].[Table2].[Name]").unwrap();
        assert_eq!(key, "Name");

        assert!(find_column_override(&columns, "[dbo].[Table2].[Id]").is_none());
    }

    #[test]
    fn test_qualified_override_never_matches_by_bare_name() {
        let mut columns = IndexMap::new();
        columns.insert(
            "[dbo].[Table1].[Name]".to_string(),
            override_for("[dbo].[Table1].[Name]"),
        );
        assert!(find_column_override(&columns, "[dbo].[Table2].[Name]").is_none());
    }

    #[test]
    fn test_apply_column_override_keeps_unset_fields() {
        let mut property = synthetic_property("[dbo].[T].[A]");
        property.sql_type = "[int]".to_string();
        property.nullable = false;

        apply_column_override(
            &mut property,
            &ColumnOverride {
                name: "A".to_string(),
                sql_type: None,
                nullable: Some(true),
                annotations: Some(vec!["Required".to_string()]),
            },
        );

        assert_eq!(property.sql_type, "[int]");
        assert!(property.nullable);
        assert_eq!(property.annotations, vec!["Required"]);
    }
}
