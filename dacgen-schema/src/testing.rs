//! Builders for schema packages used in tests.
//!
//! This module is only available when the `testing` feature is enabled
//! or during tests.

use std::{fmt::Write as _, fs::File, io::Write as _, path::Path};

use zip::{ZipWriter, write::SimpleFileOptions};

use crate::loader::MODEL_ENTRY;

/// A column declared on a [`ModelBuilder`] table.
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    sql_type: String,
    nullable: Option<bool>,
    identity: bool,
}

impl Column {
    /// A column with no explicit nullability (the schema default applies).
    pub fn new(name: &str, sql_type: &str) -> Self {
        Self {
            name: name.to_string(),
            sql_type: sql_type.to_string(),
            nullable: None,
            identity: false,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = Some(false);
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = Some(true);
        self
    }

    pub fn identity(mut self) -> Self {
        self.identity = true;
        self
    }
}

/// Writes a model document in the serialized package format.
///
/// Table and routine names are qualified (`[dbo].[Table1]`); column and
/// parameter names are bare and get qualified with their owner.
#[derive(Debug, Default, Clone)]
pub struct ModelBuilder {
    elements: String,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, name: &str, columns: &[Column]) -> Self {
        let mut body = String::new();
        for column in columns {
            let mut props = String::new();
            if let Some(nullable) = column.nullable {
                props.push_str(&property("IsNullable", nullable));
            }
            if column.identity {
                props.push_str(&property("IsIdentity", true));
            }
            let _ = write!(
                body,
                r#"<Entry><Element Type="SqlSimpleColumn" Name="{}.[{}]">{}{}</Element></Entry>"#,
                escape(name),
                escape(&column.name),
                props,
                type_specifier("TypeSpecifier", &column.sql_type),
            );
        }
        let _ = write!(
            self.elements,
            r#"<Element Type="SqlTable" Name="{}"><Relationship Name="Columns">{}</Relationship></Element>"#,
            escape(name),
            body
        );
        self
    }

    pub fn primary_key(mut self, name: &str, table: &str, columns: &[&str]) -> Self {
        let _ = write!(
            self.elements,
            r#"<Element Type="SqlPrimaryKeyConstraint" Name="{}">{}{}</Element>"#,
            escape(name),
            column_specifications(table, columns),
            relationship("DefiningTable", &[table.to_string()]),
        );
        self
    }

    pub fn index(mut self, name: &str, table: &str, columns: &[&str], unique: bool) -> Self {
        let _ = write!(
            self.elements,
            r#"<Element Type="SqlIndex" Name="{}">{}{}{}</Element>"#,
            escape(name),
            property("IsUnique", unique),
            column_specifications(table, columns),
            relationship("IndexedObject", &[table.to_string()]),
        );
        self
    }

    pub fn foreign_key(
        mut self,
        name: &str,
        table: &str,
        columns: &[&str],
        foreign_table: &str,
        foreign_columns: &[&str],
    ) -> Self {
        let _ = write!(
            self.elements,
            r#"<Element Type="SqlForeignKeyConstraint" Name="{}">{}{}{}{}</Element>"#,
            escape(name),
            relationship("Columns", &qualify(table, columns)),
            relationship("DefiningTable", &[table.to_string()]),
            relationship("ForeignColumns", &qualify(foreign_table, foreign_columns)),
            relationship("ForeignTable", &[foreign_table.to_string()]),
        );
        self
    }

    pub fn procedure(self, name: &str, params: &[(&str, &str)]) -> Self {
        self.routine("SqlProcedure", name, params)
    }

    pub fn scalar_function(self, name: &str, params: &[(&str, &str)]) -> Self {
        self.routine("SqlScalarFunction", name, params)
    }

    pub fn inline_table_function(self, name: &str, params: &[(&str, &str)]) -> Self {
        self.routine("SqlInlineTableValuedFunction", name, params)
    }

    pub fn table_function(self, name: &str, params: &[(&str, &str)]) -> Self {
        self.routine("SqlMultiStatementTableValuedFunction", name, params)
    }

    fn routine(mut self, ty: &str, name: &str, params: &[(&str, &str)]) -> Self {
        let mut entries = String::new();
        for (param, sql_type) in params {
            let _ = write!(
                entries,
                r#"<Entry><Element Type="SqlSubroutineParameter" Name="{}.[{}]">{}</Element></Entry>"#,
                escape(name),
                escape(param),
                type_specifier("Type", sql_type),
            );
        }
        let _ = write!(
            self.elements,
            r#"<Element Type="{ty}" Name="{}"><Relationship Name="Parameters">{}</Relationship></Element>"#,
            escape(name),
            entries
        );
        self
    }

    /// The complete model document.
    pub fn to_xml(&self) -> String {
        format!(
            concat!(
                r#"<?xml version="1.0" encoding="utf-8"?>"#,
                r#"<DataSchemaModel FileFormatVersion="1.2" SchemaVersion="2.9" "#,
                r#"xmlns="http://schemas.microsoft.com/sqlserver/dac/Serialization/2012/02">"#,
                "<Model>{}</Model></DataSchemaModel>"
            ),
            self.elements
        )
    }

    /// Write a package archive holding the model document.
    pub fn write_dacpac(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = ZipWriter::new(File::create(path)?);
        writer.start_file(MODEL_ENTRY, SimpleFileOptions::default())?;
        writer.write_all(self.to_xml().as_bytes())?;
        writer.finish()?;
        Ok(())
    }
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn qualify(owner: &str, names: &[&str]) -> Vec<String> {
    names.iter().map(|name| format!("{owner}.[{name}]")).collect()
}

fn property(name: &str, value: bool) -> String {
    let value = if value { "True" } else { "False" };
    format!(r#"<Property Name="{name}" Value="{value}" />"#)
}

fn relationship(name: &str, references: &[String]) -> String {
    let entries: String = references
        .iter()
        .map(|r| format!(r#"<Entry><References Name="{}" /></Entry>"#, escape(r)))
        .collect();
    format!(r#"<Relationship Name="{name}">{entries}</Relationship>"#)
}

fn type_specifier(relationship_name: &str, sql_type: &str) -> String {
    format!(
        concat!(
            r#"<Relationship Name="{}"><Entry><Element Type="SqlTypeSpecifier">"#,
            r#"<Relationship Name="Type"><Entry><References ExternalSource="BuiltIns" Name="[{}]" /></Entry></Relationship>"#,
            "</Element></Entry></Relationship>"
        ),
        relationship_name,
        escape(sql_type)
    )
}

fn column_specifications(table: &str, columns: &[&str]) -> String {
    let entries: String = qualify(table, columns)
        .iter()
        .map(|column| {
            format!(
                r#"<Entry><Element Type="SqlIndexedColumnSpecification">{}</Element></Entry>"#,
                relationship("Column", std::slice::from_ref(column))
            )
        })
        .collect();
    format!(r#"<Relationship Name="ColumnSpecifications">{entries}</Relationship>"#)
}
