//! Resolution of entities and methods from model documents.

use std::str::FromStr;

use dacgen_codegen::resolve::{resolve_entities, resolve_methods};
use dacgen_core::TypeKind;
use dacgen_ir::{DataModel, EntityProperty, MethodId, MethodKind};
use dacgen_manifest::ExtractorConfig;
use dacgen_schema::{
    SchemaTree,
    testing::{Column, ModelBuilder},
};

fn resolve(builder: ModelBuilder, config: &ExtractorConfig) -> (DataModel, Vec<String>) {
    let tree = SchemaTree::parse_str(&builder.to_xml()).expect("model should parse");
    let mut warnings = Vec::new();
    let mut model = DataModel {
        entities: resolve_entities(&tree, config, &mut warnings),
        ..DataModel::default()
    };
    resolve_methods(&tree, config, &mut model, &mut warnings);
    (model, warnings)
}

fn config(toml: &str) -> ExtractorConfig {
    ExtractorConfig::from_str(toml).expect("config should parse")
}

fn names(properties: &[EntityProperty]) -> Vec<&str> {
    properties.iter().map(EntityProperty::short_name).collect()
}

fn parent_child(foreign_columns: &[&str]) -> ModelBuilder {
    ModelBuilder::new()
        .table(
            "[dbo].[Parent]",
            &[
                Column::new("Id", "int").not_null(),
                Column::new("Name1", "bigint").not_null(),
            ],
        )
        .table(
            "[dbo].[Child]",
            &[
                Column::new("Id", "int").not_null().identity(),
                Column::new("ForId", "int"),
                Column::new("ForName", "bigint"),
            ],
        )
        .foreign_key(
            "[dbo].[FK_Child_Parent]",
            "[dbo].[Child]",
            &["ForId", "ForName"][..foreign_columns.len()],
            "[dbo].[Parent]",
            foreign_columns,
        )
        .primary_key("[dbo].[PK_Parent]", "[dbo].[Parent]", &["Id", "Name1"])
}

#[test]
fn test_single_table_with_primary_key() {
    let builder = ModelBuilder::new()
        .table(
            "[dbo].[Table1]",
            &[
                Column::new("Id", "int").not_null(),
                Column::new("Name", "nvarchar"),
            ],
        )
        .primary_key("[dbo].[PK_Table1]", "[dbo].[Table1]", &["Id"]);

    let (model, warnings) = resolve(builder, &ExtractorConfig::default());

    assert!(warnings.is_empty());
    assert_eq!(model.entities.len(), 1);
    let entity = &model.entities[0];
    assert_eq!(entity.name, "Table1");
    assert_eq!(entity.access, "public");
    assert_eq!(names(&entity.properties), vec!["Id", "Name"]);
    assert_eq!(entity.properties[0].ty.name, "int");
    assert!(!entity.properties[0].nullable);
    assert_eq!(entity.properties[1].ty.name, "string");
    assert!(entity.properties[1].nullable);

    assert_eq!(model.methods.len(), 1);
    let method = &model.methods[0];
    assert_eq!(method.kind, MethodKind::PrimaryKey);
    assert!(method.unique);
    assert_eq!(method.entity_name, "Table1");
    assert_eq!(names(&method.params), vec!["Id"]);
    assert_eq!(names(&method.columns), vec!["Id", "Name"]);
    assert!(method.identity_columns.is_empty());
    assert!(method.foreigns.is_empty());
}

#[test]
fn test_identity_primary_key_splits_identity_from_columns() {
    let builder = ModelBuilder::new()
        .table(
            "[dbo].[Table1]",
            &[
                Column::new("Id", "int").not_null().identity(),
                Column::new("Name", "nvarchar"),
            ],
        )
        .primary_key("[dbo].[PK_Table1]", "[dbo].[Table1]", &["Id"]);

    let (model, warnings) = resolve(builder, &ExtractorConfig::default());

    assert!(warnings.is_empty());
    assert_eq!(model.methods.len(), 1);
    let method = &model.methods[0];
    assert_eq!(method.kind, MethodKind::PrimaryKey);
    assert!(method.unique);
    assert_eq!(names(&method.params), vec!["Id"]);
    assert_eq!(names(&method.columns), vec!["Name"]);
    assert_eq!(names(&method.identity_columns), vec!["Id"]);
}

#[test]
fn test_foreign_key_links_to_matching_primary_key() {
    let (model, warnings) = resolve(parent_child(&["Id", "Name1"]), &ExtractorConfig::default());

    assert!(warnings.is_empty());
    assert_eq!(model.methods.len(), 2);

    let fk = &model.methods[0];
    assert_eq!(fk.kind, MethodKind::ForeignKey);
    assert!(!fk.unique);
    assert_eq!(names(&fk.params), vec!["ForId", "ForName"]);
    assert_eq!(
        fk.foreign_names().collect::<Vec<_>>(),
        vec![Some("[dbo].[Parent].[Id]"), Some("[dbo].[Parent].[Name1]")]
    );
    assert_eq!(names(&fk.identity_columns), vec!["Id"]);
    assert_eq!(names(&fk.columns), vec!["ForId", "ForName"]);

    let parent = model.entity("[dbo].[Parent]").unwrap();
    assert_eq!(parent.foreigns, vec![MethodId(0)]);

    let pk = &model.methods[1];
    assert_eq!(pk.kind, MethodKind::PrimaryKey);
    assert_eq!(pk.foreigns, vec![MethodId(0)]);
}

#[test]
fn test_foreign_key_in_other_order_is_not_linked() {
    let (model, _) = resolve(parent_child(&["Name1", "Id"]), &ExtractorConfig::default());

    let parent = model.entity("[dbo].[Parent]").unwrap();
    assert_eq!(parent.foreigns, vec![MethodId(0)]);
    assert!(model.methods[1].foreigns.is_empty());
}

#[test]
fn test_foreign_key_with_fewer_columns_is_not_linked() {
    let (model, _) = resolve(parent_child(&["Id"]), &ExtractorConfig::default());

    assert_eq!(model.methods[0].params.len(), 1);
    assert!(model.methods[1].foreigns.is_empty());
}

#[test]
fn test_foreign_key_inclusion_can_be_disabled_per_entity() {
    let config = config(
        r#"
        [[entity_overrides]]
        table_name = "[dbo].[Parent]"
        include_foreign_key = false
        "#,
    );

    let (model, _) = resolve(parent_child(&["Id", "Name1"]), &config);

    assert!(model.entity("[dbo].[Parent]").unwrap().foreigns.is_empty());
    assert!(model.methods[1].foreigns.is_empty());
}

#[test]
fn test_ignored_defining_table_drops_entity_and_keys() {
    let config = config(r#"objects_to_ignore = ["[dbo].[Child]"]"#);

    let (model, warnings) = resolve(parent_child(&["Id", "Name1"]), &config);

    assert!(warnings.is_empty());
    assert!(model.entity("[dbo].[Child]").is_none());
    assert_eq!(model.methods.len(), 1);
    assert_eq!(model.methods[0].kind, MethodKind::PrimaryKey);
    assert!(model.methods[0].foreigns.is_empty());
}

#[test]
fn test_foreign_key_to_ignored_table_is_kept_with_a_warning() {
    let config = config(r#"objects_to_ignore = ["[dbo].[Parent]"]"#);

    let (model, warnings) = resolve(parent_child(&["Id", "Name1"]), &config);

    assert_eq!(model.entities.len(), 1);
    assert_eq!(model.methods.len(), 1);
    assert_eq!(model.methods[0].kind, MethodKind::ForeignKey);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("[dbo].[Parent]"));
}

#[test]
fn test_feature_switches_gate_passes() {
    let builder = ModelBuilder::new()
        .table(
            "[dbo].[Table2]",
            &[
                Column::new("Id", "int").not_null().identity(),
                Column::new("Name", "nvarchar"),
                Column::new("Descript", "int"),
            ],
        )
        .primary_key("[dbo].[PK_Table2]", "[dbo].[Table2]", &["Id"])
        .index("[dbo].[Table2].[IX_Name]", "[dbo].[Table2]", &["Name"], false)
        .index(
            "[dbo].[Table2].[UX_NameDescript]",
            "[dbo].[Table2]",
            &["Name", "Descript"],
            true,
        );

    let (model, _) = resolve(builder.clone(), &ExtractorConfig::default());
    let kinds: Vec<_> = model.methods.iter().map(|m| (m.kind, m.unique)).collect();
    assert_eq!(
        kinds,
        vec![
            (MethodKind::PrimaryKey, true),
            (MethodKind::Index, false),
            (MethodKind::Index, true),
        ]
    );

    let only_unique = config("include_non_unique_index = false\ninclude_primary_key = false");
    let (model, _) = resolve(builder.clone(), &only_unique);
    assert_eq!(model.methods.len(), 1);
    assert_eq!(model.methods[0].key_name, "[dbo].[Table2].[UX_NameDescript]");
    assert_eq!(names(&model.methods[0].params), vec!["Name", "Descript"]);

    let none = config("include_unique_index = false\ninclude_non_unique_index = false\ninclude_primary_key = false");
    let (model, _) = resolve(builder, &none);
    assert!(model.methods.is_empty());
}

#[test]
fn test_async_policy_per_key_falls_back_to_defaults() {
    let config = config(
        r#"
        get_async = true

        [[async_mappings]]
        index_name = "[dbo].[PK_Parent]"
        save_async = true
        "#,
    );

    let (model, _) = resolve(parent_child(&["Id", "Name1"]), &config);

    let fk = &model.methods[0].asyncs;
    assert!(fk.get && !fk.save && !fk.delete);
    let pk = &model.methods[1].asyncs;
    assert!(!pk.get && pk.save && !pk.delete);
}

#[test]
fn test_row_version_and_ignored_columns_are_dropped() {
    let builder = ModelBuilder::new().table(
        "[dbo].[Audit]",
        &[
            Column::new("Id", "int").not_null(),
            Column::new("Version", "rowversion"),
            Column::new("Stamp", "timestamp"),
            Column::new("Secret", "nvarchar"),
        ],
    );
    let config = config(r#"objects_to_ignore = ["[dbo].[Audit].[Secret]"]"#);

    let (model, _) = resolve(builder, &config);

    assert_eq!(names(&model.entities[0].properties), vec!["Id"]);
}

#[test]
fn test_index_over_ignored_column_is_skipped_with_a_warning() {
    let builder = ModelBuilder::new()
        .table(
            "[dbo].[Audit]",
            &[
                Column::new("Id", "int").not_null(),
                Column::new("Secret", "nvarchar"),
            ],
        )
        .primary_key("[dbo].[PK_Audit]", "[dbo].[Audit]", &["Id"])
        .index("[dbo].[Audit].[IX_Secret]", "[dbo].[Audit]", &["Secret"], false);
    let config = config(r#"objects_to_ignore = ["[dbo].[Audit].[Secret]"]"#);

    let (model, warnings) = resolve(builder, &config);

    assert_eq!(model.methods.len(), 1);
    assert_eq!(model.methods[0].kind, MethodKind::PrimaryKey);
    assert_eq!(
        warnings,
        vec![
            "index [dbo].[Audit].[IX_Secret] uses column [dbo].[Audit].[Secret], which is not generated"
        ]
    );
}

#[test]
fn test_enum_override_applies_on_top_of_column_override() {
    let builder = ModelBuilder::new().table(
        "[dbo].[Order]",
        &[
            Column::new("Id", "int").not_null(),
            Column::new("Status", "int"),
        ],
    );
    let config = config(
        r#"
        [[column_overrides]]
        name = "[dbo].[Order].[Status]"
        type = "tinyint"
        annotations = ["DataMember"]

        [[enum_mappings]]
        column_full_name = "[dbo].[Order].[Status]"
        enum_type_name = "OrderStatus"
        "#,
    );

    let (model, warnings) = resolve(builder, &config);

    assert!(warnings.is_empty());
    let status = model.entities[0]
        .property("[dbo].[Order].[Status]")
        .unwrap();
    assert_eq!(status.sql_type, "tinyint");
    assert_eq!(status.ty.kind, TypeKind::Enum);
    assert_eq!(status.ty.name, "OrderStatus?");
    assert_eq!(status.annotations, vec!["DataMember"]);
}

#[test]
fn test_bare_column_override_applies_to_every_table() {
    let builder = ModelBuilder::new()
        .table("[dbo].[A]", &[Column::new("Code", "char")])
        .table("[dbo].[B]", &[Column::new("Code", "char")]);
    let config = config(
        r#"
        [[column_overrides]]
        name = "Code"
        nullable = false
        "#,
    );

    let (model, warnings) = resolve(builder, &config);

    assert!(warnings.is_empty());
    assert!(model.entities.iter().all(|e| !e.properties[0].nullable));
}

#[test]
fn test_override_only_column_is_appended() {
    let builder = ModelBuilder::new().table(
        "[dbo].[Table1]",
        &[Column::new("Id", "int").not_null()],
    );
    let config = config(
        r#"
        [[column_overrides]]
        name = "[dbo].[Table1].[Total]"
        type = "money"
        nullable = false

        [[column_overrides]]
        name = "[dbo].[Elsewhere].[Ghost]"
        type = "int"
        "#,
    );

    let (model, warnings) = resolve(builder, &config);

    let entity = &model.entities[0];
    assert_eq!(names(&entity.properties), vec!["Id", "Total"]);
    assert_eq!(entity.properties[1].ty.name, "decimal");
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("[dbo].[Elsewhere].[Ghost]"));
}

#[test]
fn test_entity_override_renames_and_annotates() {
    let builder = ModelBuilder::new()
        .table("[dbo].[tbl_cust]", &[Column::new("Id", "int").not_null()])
        .primary_key("[dbo].[PK_cust]", "[dbo].[tbl_cust]", &["Id"]);
    let config = config(
        r#"
        [[entity_overrides]]
        table_name = "[dbo].[tbl_cust]"
        name = "Customer"
        annotations = ["DataContract"]
        access = "internal"
        "#,
    );

    let (model, _) = resolve(builder, &config);

    let entity = &model.entities[0];
    assert_eq!(entity.name, "Customer");
    assert_eq!(entity.access, "internal");
    assert_eq!(entity.annotations, vec!["DataContract"]);
    assert_eq!(model.methods[0].entity_name, "Customer");
}
