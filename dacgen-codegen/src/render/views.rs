//! Serializable dictionaries handed to the templates.
//!
//! Field names are serialized in PascalCase, which is how the templates
//! address them (`{{EntityName}}`, `{{#UniqueMethods}}`).

use std::collections::HashSet;

use dacgen_ir::{DataModel, Entity, EntityProperty, Method, Routine, RoutineKind};
use dacgen_manifest::ExtractorConfig;
use serde::Serialize;

/// Runtime helper version the generated code is written against.
pub const HELPER_VERSION: &str = "1.0.0.4";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PropertyView {
    pub name: String,
    pub sql_type: String,
    pub type_kind: &'static str,
    pub nullable: bool,
    pub identity: bool,
    pub foreign_name: Option<String>,
    pub annotations: Vec<String>,
}

impl From<&EntityProperty> for PropertyView {
    fn from(property: &EntityProperty) -> Self {
        Self {
            name: property.name.clone(),
            sql_type: property.sql_type.clone(),
            type_kind: property.ty.kind.as_str(),
            nullable: property.nullable,
            identity: property.identity,
            foreign_name: property.foreign_name.clone(),
            annotations: property.annotations.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MethodView {
    pub key_name: String,
    pub table_name: String,
    pub entity_name: String,
    pub kind: &'static str,
    pub params: Vec<PropertyView>,
    pub columns: Vec<PropertyView>,
    pub identity_columns: Vec<PropertyView>,
    pub unique: bool,
    /// `"Async"` when the verb is async, otherwise empty; templates append it
    /// to method names and test it with sections
    pub get_async: &'static str,
    pub save_async: &'static str,
    pub delete_async: &'static str,
    /// Linked accessors, one level deep
    pub foreigns: Vec<MethodView>,
}

impl MethodView {
    pub fn new(model: &DataModel, method: &Method) -> Self {
        let mut view = Self::flat(method);
        view.foreigns = model
            .methods_by_id(&method.foreigns)
            .map(Self::flat)
            .collect();
        view
    }

    fn flat(method: &Method) -> Self {
        Self {
            key_name: method.key_name.clone(),
            table_name: method.table_name.clone(),
            entity_name: method.entity_name.clone(),
            kind: method.kind.as_str(),
            params: properties(&method.params),
            columns: properties(&method.columns),
            identity_columns: properties(&method.identity_columns),
            unique: method.unique,
            get_async: async_suffix(method.asyncs.get),
            save_async: async_suffix(method.asyncs.save),
            delete_async: async_suffix(method.asyncs.delete),
            foreigns: Vec::new(),
        }
    }
}

fn async_suffix(is_async: bool) -> &'static str {
    if is_async { "Async" } else { "" }
}

fn properties(list: &[EntityProperty]) -> Vec<PropertyView> {
    list.iter().map(PropertyView::from).collect()
}

/// Dictionary of one entity file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EntityView {
    pub table_name: String,
    pub name: String,
    pub access: String,
    pub annotations: Vec<String>,
    pub include_foreign_key: bool,
    pub properties: Vec<PropertyView>,
    /// Foreign-key accessors of the tables referencing this one, at most one
    /// per referencing entity so each child collection is declared once
    pub foreigns: Vec<MethodView>,
    pub namespace: String,
    pub usings: Vec<String>,
}

impl EntityView {
    pub fn new(config: &ExtractorConfig, model: &DataModel, entity: &Entity) -> Self {
        Self {
            table_name: entity.table_name.clone(),
            name: entity.name.clone(),
            access: entity.access.clone(),
            annotations: entity.annotations.clone(),
            include_foreign_key: entity.include_foreign_key,
            properties: properties(&entity.properties),
            foreigns: child_collections(model, entity),
            namespace: config.model_namespace.clone(),
            usings: config.usings.clone(),
        }
    }
}

/// First incoming foreign key per referencing entity. Further keys from the
/// same child would name the same collection property.
fn child_collections(model: &DataModel, entity: &Entity) -> Vec<MethodView> {
    let mut seen = HashSet::new();
    model
        .methods_by_id(&entity.foreigns)
        .filter(|method| seen.insert(method.entity_name.as_str()))
        .map(|method| MethodView::new(model, method))
        .collect()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoutineParamView {
    pub name: String,
    pub sql_type: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoutineView {
    pub name: String,
    pub params: Vec<RoutineParamView>,
}

impl From<&Routine> for RoutineView {
    fn from(routine: &Routine) -> Self {
        Self {
            name: routine.name.clone(),
            params: routine
                .params
                .iter()
                .map(|p| RoutineParamView {
                    name: p.name.clone(),
                    sql_type: p.sql_type.clone(),
                })
                .collect(),
        }
    }
}

fn method_views<'a>(
    model: &'a DataModel,
    methods: impl Iterator<Item = &'a Method>,
) -> Vec<MethodView> {
    methods.map(|method| MethodView::new(model, method)).collect()
}

/// Dictionary shared by the data-access class and its interface.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AggregateView {
    /// Model namespace, imported by the data-access files
    pub namespace: String,
    pub dal_namespace: String,
    pub data_access_class_name: String,
    pub class_access: String,
    pub helper_version: &'static str,
    pub usings: Vec<String>,
    /// Unique accessors without identity columns
    pub non_query_methods: Vec<MethodView>,
    /// Accessors whose save returns the generated identity
    pub scalar_methods: Vec<MethodView>,
    pub unique_methods: Vec<MethodView>,
    pub multiple_methods: Vec<MethodView>,
    pub sps: Vec<RoutineView>,
    pub scalar_functions: Vec<RoutineView>,
    pub inline_table_functions: Vec<RoutineView>,
    pub table_functions: Vec<RoutineView>,
}

impl AggregateView {
    pub fn new(config: &ExtractorConfig, model: &DataModel) -> Self {
        let routines = |kind: RoutineKind| -> Vec<RoutineView> {
            model.routines_of(kind).map(RoutineView::from).collect()
        };

        Self {
            namespace: config.model_namespace.clone(),
            dal_namespace: config.dal_namespace.clone(),
            data_access_class_name: config.data_access_class_name.clone(),
            class_access: config.class_access.clone(),
            helper_version: HELPER_VERSION,
            usings: config.usings.clone(),
            non_query_methods: method_views(model, model.non_query_methods()),
            scalar_methods: method_views(model, model.scalar_methods()),
            unique_methods: method_views(model, model.unique_methods()),
            multiple_methods: method_views(model, model.multiple_methods()),
            sps: routines(RoutineKind::Procedure),
            scalar_functions: routines(RoutineKind::ScalarFunction),
            inline_table_functions: routines(RoutineKind::InlineTableFunction),
            table_functions: routines(RoutineKind::TableFunction),
        }
    }
}
