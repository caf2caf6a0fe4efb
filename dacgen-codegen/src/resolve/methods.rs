//! Accessor resolution from primary keys, foreign keys and indexes.

use dacgen_ir::{AsyncFlags, DataModel, Entity, Method, MethodKind};
use dacgen_manifest::ExtractorConfig;
use dacgen_schema::{ElementType, SchemaTree};

/// A key read from the schema, before it is checked against the entities.
#[derive(Debug)]
struct KeySpec<'a> {
    kind: MethodKind,
    key_name: &'a str,
    table: &'a str,
    columns: Vec<&'a str>,
    /// Referenced columns, positionally paired with `columns`
    foreign_columns: Vec<&'a str>,
    unique: bool,
}

/// Append the accessors of every enabled key kind to `model.methods`.
///
/// Passes run foreign keys first so primary keys can link to the foreign-key
/// accessors already registered on their entity. Keys that cannot be resolved
/// against the entity set are skipped and reported in `warnings`.
pub fn resolve_methods(
    tree: &SchemaTree,
    config: &ExtractorConfig,
    model: &mut DataModel,
    warnings: &mut Vec<String>,
) {
    let features = config.features;
    if features.foreign_key {
        resolve_foreign_keys(tree, config, model, warnings);
    }
    if features.primary_key {
        resolve_primary_keys(tree, config, model, warnings);
    }
    if features.unique_index || features.non_unique_index {
        resolve_indexes(tree, config, model, warnings);
    }
}

fn resolve_foreign_keys(
    tree: &SchemaTree,
    config: &ExtractorConfig,
    model: &mut DataModel,
    warnings: &mut Vec<String>,
) {
    for constraint in tree.model_elements(ElementType::ForeignKeyConstraint) {
        let (Some(key_name), Some(table)) = (
            constraint.object_name(),
            constraint.reference("DefiningTable"),
        ) else {
            continue;
        };
        if config.overrides.is_ignored(table) {
            continue;
        }
        let spec = KeySpec {
            kind: MethodKind::ForeignKey,
            key_name,
            table,
            columns: constraint.references("Columns"),
            foreign_columns: constraint.references("ForeignColumns"),
            unique: false,
        };
        let Some(method) = resolve_key(&spec, config, model, warnings) else {
            continue;
        };
        let id = model.push_method(method);

        let Some(foreign_table) = constraint.reference("ForeignTable") else {
            continue;
        };
        match model.entity_mut(foreign_table) {
            Some(foreign) if foreign.include_foreign_key => foreign.foreigns.push(id),
            Some(_) => {}
            None => {
                let message = format!(
                    "foreign key {key_name} references {foreign_table}, which is not generated"
                );
                tracing::warn!("{message}");
                warnings.push(message);
            }
        }
    }
}

fn resolve_primary_keys(
    tree: &SchemaTree,
    config: &ExtractorConfig,
    model: &mut DataModel,
    warnings: &mut Vec<String>,
) {
    for constraint in tree.model_elements(ElementType::PrimaryKeyConstraint) {
        let (Some(key_name), Some(table)) = (
            constraint.object_name(),
            constraint.reference("DefiningTable"),
        ) else {
            continue;
        };
        if config.overrides.is_ignored(table) {
            continue;
        }
        let spec = KeySpec {
            kind: MethodKind::PrimaryKey,
            key_name,
            table,
            columns: constraint.indexed_columns(),
            foreign_columns: Vec::new(),
            unique: true,
        };
        let Some(mut method) = resolve_key(&spec, config, model, warnings) else {
            continue;
        };

        // First foreign-key accessor on this entity whose referenced columns
        // are exactly the key columns, in order.
        let link = model.entity(table).and_then(|entity| {
            entity.foreigns.iter().copied().find(|id| {
                model
                    .method(*id)
                    .is_some_and(|fk| fk.references_columns(&spec.columns))
            })
        });
        method.foreigns.extend(link);
        model.push_method(method);
    }
}

fn resolve_indexes(
    tree: &SchemaTree,
    config: &ExtractorConfig,
    model: &mut DataModel,
    warnings: &mut Vec<String>,
) {
    let features = config.features;
    for index in tree.model_elements(ElementType::Index) {
        let (Some(key_name), Some(table)) = (index.object_name(), index.reference("IndexedObject"))
        else {
            continue;
        };
        if config.overrides.is_ignored(table) {
            continue;
        }
        let unique = index.property_bool("IsUnique").unwrap_or(false);
        if (unique && !features.unique_index) || (!unique && !features.non_unique_index) {
            continue;
        }
        let spec = KeySpec {
            kind: MethodKind::Index,
            key_name,
            table,
            columns: index.indexed_columns(),
            foreign_columns: Vec::new(),
            unique,
        };
        if let Some(method) = resolve_key(&spec, config, model, warnings) {
            model.push_method(method);
        }
    }
}

fn resolve_key(
    spec: &KeySpec<'_>,
    config: &ExtractorConfig,
    model: &DataModel,
    warnings: &mut Vec<String>,
) -> Option<Method> {
    let Some(entity) = model.entity(spec.table) else {
        // Keys on views and other non-table objects have no entity.
        tracing::debug!(key = spec.key_name, table = spec.table, "no entity for key");
        return None;
    };
    match build_method(spec, entity, config) {
        Ok(method) => {
            tracing::debug!(
                key = spec.key_name,
                kind = spec.kind.as_str(),
                entity = %entity.name,
                params = method.params.len(),
                "resolved method"
            );
            Some(method)
        }
        Err(column) => {
            let message = format!(
                "{} {} uses column {column}, which is not generated",
                spec.kind.as_str(),
                spec.key_name
            );
            tracing::warn!("{message}");
            warnings.push(message);
            None
        }
    }
}

/// Build an accessor against its owning entity. Fails with the name of the
/// first key column the entity does not carry.
fn build_method(spec: &KeySpec<'_>, entity: &Entity, config: &ExtractorConfig) -> Result<Method, String> {
    let mut params = Vec::with_capacity(spec.columns.len());
    for (position, column) in spec.columns.iter().enumerate() {
        let mut param = entity
            .property(column)
            .cloned()
            .ok_or_else(|| column.to_string())?;
        param.foreign_name = spec
            .foreign_columns
            .get(position)
            .map(|name| name.to_string());
        params.push(param);
    }

    let policy = config
        .overrides
        .async_policy(spec.key_name)
        .unwrap_or(config.async_defaults);

    Ok(Method {
        kind: spec.kind,
        key_name: spec.key_name.to_string(),
        table_name: entity.table_name.clone(),
        entity_name: entity.name.clone(),
        params,
        columns: entity.columns().cloned().collect(),
        identity_columns: entity.identity_columns().cloned().collect(),
        unique: spec.unique,
        asyncs: AsyncFlags {
            get: policy.get,
            save: policy.save,
            delete: policy.delete,
        },
        foreigns: Vec::new(),
    })
}
