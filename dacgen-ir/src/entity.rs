use dacgen_core::{MappedType, short_name};

use crate::MethodId;

/// One retained column of a table, or one parameter of an accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityProperty {
    /// Qualified column name, e.g. `[dbo].[Table1].[Id]`
    pub name: String,
    /// SQL type as declared, e.g. `[int]`
    pub sql_type: String,
    /// Target type resolved by the type mapper
    pub ty: MappedType,
    pub nullable: bool,
    pub identity: bool,
    /// Referenced column, only set on foreign-key parameters
    pub foreign_name: Option<String>,
    pub annotations: Vec<String>,
}

impl EntityProperty {
    /// Bare column name (e.g. `Id`).
    pub fn short_name(&self) -> &str {
        short_name(&self.name)
    }
}

/// The record type generated for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Qualified table name, e.g. `[dbo].[Table1]`
    pub table_name: String,
    /// Display name of the generated type
    pub name: String,
    /// Retained columns in declaration order, synthetic columns last
    pub properties: Vec<EntityProperty>,
    pub annotations: Vec<String>,
    pub access: String,
    /// Whether accessors of tables referencing this one are linked into
    /// [`Entity::foreigns`]
    pub include_foreign_key: bool,
    /// Foreign-key accessors whose referenced table is this entity
    pub foreigns: Vec<MethodId>,
}

impl Entity {
    pub fn property(&self, name: &str) -> Option<&EntityProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Writable columns (everything but identity columns).
    pub fn columns(&self) -> impl Iterator<Item = &EntityProperty> {
        self.properties.iter().filter(|p| !p.identity)
    }

    pub fn identity_columns(&self) -> impl Iterator<Item = &EntityProperty> {
        self.properties.iter().filter(|p| p.identity)
    }
}
