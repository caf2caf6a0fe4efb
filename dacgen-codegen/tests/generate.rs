//! End-to-end generation from a schema package on disk.
//!
//! Rendered files are pinned with snapshots. Run `cargo insta review` to
//! update them after an intentional template change.

use std::{fs, path::Path, str::FromStr};

use dacgen_codegen::{Error, GenerateOptions, Generator, Outcome, SkipReason};
use dacgen_codegen::template::RenderError;
use dacgen_manifest::ExtractorConfig;
use dacgen_schema::testing::{Column, ModelBuilder};
use insta::assert_snapshot;
use tempfile::TempDir;

fn table1() -> ModelBuilder {
    ModelBuilder::new()
        .table(
            "[dbo].[Table1]",
            &[
                Column::new("Id", "int").not_null(),
                Column::new("Name", "nvarchar"),
            ],
        )
        .primary_key("[dbo].[PK_Table1]", "[dbo].[Table1]", &["Id"])
}

/// Write `builder` as `Db.dacpac` and a configuration pointing at it.
fn project(dir: &Path, builder: &ModelBuilder, extra: &str) -> ExtractorConfig {
    builder
        .write_dacpac(&dir.join("Db.dacpac"))
        .expect("package should be written");
    let toml = format!(
        r#"
dacpac = "Db.dacpac"
model_namespace = "MyApp.Models"
dal_namespace = "MyApp.Data"
file_name_extension_prefix = "Generated"
{extra}
"#
    );
    let path = dir.join("dacgen.toml");
    fs::write(&path, toml).unwrap();
    ExtractorConfig::from_file(&path).expect("config should load")
}

fn generated(outcome: Outcome) -> dacgen_codegen::Generation {
    match outcome {
        Outcome::Generated(generation) => generation,
        Outcome::Skipped(reason) => panic!("run was skipped: {reason}"),
    }
}

fn read(dir: &Path, path: &str) -> String {
    fs::read_to_string(dir.join(path)).unwrap_or_else(|e| panic!("{path}: {e}"))
}

#[test]
fn test_generate_writes_expected_files() {
    let temp = TempDir::new().unwrap();
    let config = project(temp.path(), &table1(), "");

    let generation = generated(
        Generator::new(config)
            .generate(&GenerateOptions::default())
            .unwrap(),
    );

    assert_eq!(generation.written.len(), 3);
    assert_eq!(generation.warnings().count(), 0);
    for path in [
        "Models/Table1.Generated.cs",
        "Data/DataAccess.Generated.cs",
        "Data/IDataAccess.Generated.cs",
    ] {
        assert!(temp.path().join(path).is_file(), "{path} was not written");
    }

    let entity = read(temp.path(), "Models/Table1.Generated.cs");
    assert_snapshot!("table1_entity", entity);

    let interface = read(temp.path(), "Data/IDataAccess.Generated.cs");
    assert_snapshot!("table1_interface", interface);

    let data_access = read(temp.path(), "Data/DataAccess.Generated.cs");
    assert!(data_access.contains("namespace MyApp.Data"));
    assert!(data_access.contains("using MyApp.Models;"));
    assert!(data_access.contains("public partial class DataAccess : IDataAccess"));
    assert!(data_access.contains("public const string HelperVersion = \"1.0.0.4\";"));
    assert!(data_access.contains("public Table1 GetTable1ById(int id)"));
    assert!(data_access.contains("public void SaveTable1ById(Table1 table1)"));
    assert!(data_access.contains("public void DeleteTable1ById(int id)"));
    assert!(data_access.contains(".AddIntInParam(\"Id\", id, true)"));
    assert!(data_access.contains(".AddNvarcharInParam(\"Name\", table1.Name, true)"));
}

#[test]
fn test_identity_key_saves_through_existence_check() {
    let builder = ModelBuilder::new()
        .table(
            "[dbo].[Table1]",
            &[
                Column::new("Id", "int").not_null().identity(),
                Column::new("Name", "nvarchar"),
            ],
        )
        .primary_key("[dbo].[PK_Table1]", "[dbo].[Table1]", &["Id"]);
    let temp = TempDir::new().unwrap();
    let config = project(temp.path(), &builder, "");

    Generator::new(config)
        .generate(&GenerateOptions::default())
        .unwrap();

    let data_access = read(temp.path(), "Data/DataAccess.Generated.cs");
    assert!(data_access.contains("public Table1 GetTable1ById(int id)"));
    assert!(data_access.contains("public int? SaveTable1ById(Table1 table1)"));
    assert!(data_access.contains(
        "IF EXISTS(SELECT 1 FROM [dbo].[Table1] WHERE [Id] = @Id) \
         UPDATE [dbo].[Table1] SET [Name] = @Name WHERE [Id] = @Id \
         ELSE BEGIN INSERT INTO [dbo].[Table1] ([Name]) VALUES(@Name) \
         SELECT SCOPE_IDENTITY() END"
    ));
    assert!(data_access.contains(".AddIntInParam(\"Id\", table1.Id, true)"));
    assert!(!data_access.contains("public void SaveTable1ById"));

    let interface = read(temp.path(), "Data/IDataAccess.Generated.cs");
    assert!(interface.contains("int? SaveTable1ById(Table1 table1);"));
}

#[test]
fn test_generate_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let generator = Generator::new(project(temp.path(), &table1(), ""));

    generator.generate(&GenerateOptions::default()).unwrap();
    let first = read(temp.path(), "Data/DataAccess.Generated.cs");
    generator.generate(&GenerateOptions::default()).unwrap();
    let second = read(temp.path(), "Data/DataAccess.Generated.cs");

    assert_eq!(first, second);
}

#[test]
fn test_render_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let generator = Generator::new(project(temp.path(), &table1(), ""));

    let generation = generated(generator.render(&GenerateOptions::default()).unwrap());

    assert_eq!(generation.files.len(), 3);
    assert!(generation.written.is_empty());
    assert!(!temp.path().join("Models").exists());
    assert!(!temp.path().join("Data").exists());
}

#[test]
fn test_resolve_renders_nothing() {
    let temp = TempDir::new().unwrap();
    let generator = Generator::new(project(temp.path(), &table1(), ""));

    let generation = generated(generator.resolve(&GenerateOptions::default()).unwrap());

    assert_eq!(generation.model.entities.len(), 1);
    assert_eq!(generation.model.methods.len(), 1);
    assert!(generation.files.is_empty());
}

#[test]
fn test_async_switches_rename_accessors() {
    let temp = TempDir::new().unwrap();
    let config = project(
        temp.path(),
        &table1(),
        "get_async = true\nsave_async = true\ndelete_async = true",
    );

    Generator::new(config)
        .generate(&GenerateOptions::default())
        .unwrap();

    let interface = read(temp.path(), "Data/IDataAccess.Generated.cs");
    assert!(interface.contains("Task<Table1> GetTable1ByIdAsync(int id);"));
    assert!(interface.contains("Task SaveTable1ByIdAsync(Table1 table1);"));
    assert!(interface.contains("Task DeleteTable1ByIdAsync(int id);"));
}

#[test]
fn test_foreign_keys_render_child_collections() {
    let builder = ModelBuilder::new()
        .table("[dbo].[Parent]", &[Column::new("Id", "int").not_null()])
        .table(
            "[dbo].[Child]",
            &[
                Column::new("Id", "int").not_null().identity(),
                Column::new("ParentId", "int"),
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
        .primary_key("[dbo].[PK_Child]", "[dbo].[Child]", &["Id"]);
    let temp = TempDir::new().unwrap();
    let config = project(
        temp.path(),
        &builder,
        r#"
[[plural_mappings]]
entity_name = "Child"
plural_form = "Children"
"#,
    );

    Generator::new(config)
        .generate(&GenerateOptions::default())
        .unwrap();

    let parent = read(temp.path(), "Models/Parent.Generated.cs");
    assert!(parent.contains("public IList<Child> Children { get; set; }"));

    let interface = read(temp.path(), "Data/IDataAccess.Generated.cs");
    assert!(interface.contains("Parent GetParentById(int id, bool includeChildren = false);"));
    assert!(interface.contains("IList<Child> GetChildrenByParentId(int? parentId);"));
    assert!(interface.contains("int? SaveChildById(Child child);"));
    assert!(interface.contains("void DeleteChildrenByParentId(int? parentId);"));
}

#[test]
fn test_two_foreign_keys_from_one_child_share_a_collection() {
    let builder = ModelBuilder::new()
        .table("[dbo].[Address]", &[Column::new("Id", "int").not_null()])
        .table(
            "[dbo].[Order]",
            &[
                Column::new("Id", "int").not_null().identity(),
                Column::new("BillId", "int"),
                Column::new("ShipId", "int"),
            ],
        )
        .foreign_key(
            "[dbo].[FK_Order_Bill]",
            "[dbo].[Order]",
            &["BillId"],
            "[dbo].[Address]",
            &["Id"],
        )
        .foreign_key(
            "[dbo].[FK_Order_Ship]",
            "[dbo].[Order]",
            &["ShipId"],
            "[dbo].[Address]",
            &["Id"],
        )
        .primary_key("[dbo].[PK_Address]", "[dbo].[Address]", &["Id"]);
    let temp = TempDir::new().unwrap();
    let config = project(temp.path(), &builder, "");

    Generator::new(config)
        .generate(&GenerateOptions::default())
        .unwrap();

    let address = read(temp.path(), "Models/Address.Generated.cs");
    assert_eq!(
        address
            .matches("public IList<Order> Orders { get; set; }")
            .count(),
        1
    );

    let data_access = read(temp.path(), "Data/DataAccess.Generated.cs");
    assert!(data_access.contains("public Address GetAddressById(int id, bool includeOrders = false)"));
    assert!(data_access.contains("ret.Orders = reader.GetResultCollection<Order>(\"Orders\");"));
}

#[test]
fn test_routines_are_listed_as_constants() {
    let builder = table1()
        .procedure("[dbo].[GetThings]", &[("@Id", "int"), ("@Name", "nvarchar")])
        .scalar_function("[dbo].[CountThings]", &[]);
    let temp = TempDir::new().unwrap();
    let generator = Generator::new(project(temp.path(), &builder, ""));

    let generation = generated(generator.render(&GenerateOptions::default()).unwrap());

    let data_access = generation
        .files
        .iter()
        .find(|f| f.path().ends_with("DataAccess.Generated.cs"))
        .expect("data-access file should be rendered");
    let content = data_access.content();
    assert!(content.contains("// [dbo].[GetThings](@Id int, @Name nvarchar)"));
    assert!(content.contains("public const string dbo_GetThings = \"[dbo].[GetThings]\";"));
    assert!(content.contains("public const string dbo_CountThings = \"[dbo].[CountThings]\";"));
}

#[test]
fn test_unmapped_type_fails_before_writing() {
    let builder = ModelBuilder::new().table(
        "[dbo].[Place]",
        &[
            Column::new("Id", "int").not_null(),
            Column::new("Shape", "geography"),
        ],
    );
    let temp = TempDir::new().unwrap();
    let generator = Generator::new(project(temp.path(), &builder, ""));

    let err = generator
        .generate(&GenerateOptions::default())
        .unwrap_err();

    assert_eq!(err.to_string(), "generation failed while rendering entity files");
    match err.root() {
        Error::Render { source, .. } => assert_eq!(
            source,
            &RenderError::UnmappedType {
                column: "[dbo].[Place].[Shape]".to_string(),
                sql_type: "[geography]".to_string(),
            }
        ),
        other => panic!("unexpected root error: {other:?}"),
    }
    assert!(!temp.path().join("Models").exists());
}

#[test]
fn test_missing_package_is_an_error_by_default() {
    let temp = TempDir::new().unwrap();
    let mut config = ExtractorConfig::from_str("dacpac = \"Missing.dacpac\"").unwrap();
    config.resolve_paths(temp.path());

    let err = Generator::new(config)
        .generate(&GenerateOptions::default())
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "generation failed while checking the schema package"
    );
    assert!(matches!(err.root(), Error::MissingArtifact { .. }));
}

#[test]
fn test_missing_package_can_be_skipped() {
    let temp = TempDir::new().unwrap();
    let mut config = ExtractorConfig::from_str(
        "dacpac = \"Missing.dacpac\"\nerror_if_dacpac_not_found = false",
    )
    .unwrap();
    config.resolve_paths(temp.path());

    let outcome = Generator::new(config)
        .generate(&GenerateOptions::default())
        .unwrap();

    match outcome {
        Outcome::Skipped(SkipReason::ArtifactMissing(path)) => {
            assert_eq!(path, temp.path().join("Missing.dacpac"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn test_disabled_and_gated_runs_are_skipped() {
    let temp = TempDir::new().unwrap();
    let disabled = project(temp.path(), &table1(), "enabled = false");
    let outcome = Generator::new(disabled)
        .generate(&GenerateOptions::default())
        .unwrap();
    assert!(matches!(outcome, Outcome::Skipped(SkipReason::Disabled)));

    let gated = project(
        temp.path(),
        &table1(),
        r#"enabled_in_configurations = ["Release"]"#,
    );
    let generator = Generator::new(gated);
    let outcome = generator.generate(&GenerateOptions::default()).unwrap();
    assert!(matches!(
        outcome,
        Outcome::Skipped(SkipReason::ConfigurationNotEnabled(ref c)) if c == "Debug"
    ));
    assert!(!temp.path().join("Models").exists());

    let release = GenerateOptions {
        configuration: "release".to_string(),
        ..GenerateOptions::default()
    };
    assert!(!generator.generate(&release).unwrap().is_skipped());
}

#[test]
fn test_explicit_package_wins_over_config() {
    let temp = TempDir::new().unwrap();
    let config = project(temp.path(), &table1(), "");
    let other = temp.path().join("Other.dacpac");
    ModelBuilder::new()
        .table("[dbo].[Other]", &[Column::new("Id", "int").not_null()])
        .write_dacpac(&other)
        .unwrap();

    let options = GenerateOptions {
        dacpac: Some(other.clone()),
        ..GenerateOptions::default()
    };
    let generation = generated(Generator::new(config).resolve(&options).unwrap());

    assert_eq!(generation.dacpac, other);
    assert_eq!(generation.model.entities[0].name, "Other");
}
