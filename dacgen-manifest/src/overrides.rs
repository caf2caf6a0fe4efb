//! Override tables that adjust naming, typing and structure of generated output.

use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;

/// Replaces the type, nullability or annotations of a column.
///
/// Names are either qualified (`[dbo].[Table1].[Name]`) or bare (`Name`).
/// A qualified override whose column does not exist in the schema declares a
/// synthetic extra column on its table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnOverride {
    pub name: String,
    /// SQL type name, e.g. `nvarchar`
    #[serde(default, rename = "type")]
    pub sql_type: Option<String>,
    #[serde(default)]
    pub nullable: Option<bool>,
    #[serde(default)]
    pub annotations: Option<Vec<String>>,
}

/// Replaces entity-level settings of one table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityOverride {
    pub table_name: String,
    /// Display name of the generated record type
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub annotations: Option<Vec<String>>,
    #[serde(default)]
    pub access: Option<String>,
    /// Whether foreign keys referencing this table are exposed as child rows
    #[serde(default)]
    pub include_foreign_key: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct PluralMapping {
    pub entity_name: String,
    pub plural_form: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct EnumMapping {
    pub column_full_name: String,
    pub enum_type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct AsyncMapping {
    pub index_name: String,
    #[serde(default)]
    pub get_async: bool,
    #[serde(default)]
    pub save_async: bool,
    #[serde(default)]
    pub delete_async: bool,
}

/// Whether each generated verb is emitted as an async method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AsyncPolicy {
    pub get: bool,
    pub save: bool,
    pub delete: bool,
}

impl From<&AsyncMapping> for AsyncPolicy {
    fn from(mapping: &AsyncMapping) -> Self {
        Self {
            get: mapping.get_async,
            save: mapping.save_async,
            delete: mapping.delete_async,
        }
    }
}

/// All override tables, keyed for lookup and kept in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Table and column names excluded from generation
    pub ignored: IndexSet<String>,
    /// Column overrides by column name
    pub columns: IndexMap<String, ColumnOverride>,
    /// Entity overrides by table name
    pub entities: IndexMap<String, EntityOverride>,
    /// Plural forms by entity display name
    pub plurals: IndexMap<String, String>,
    /// Enum type names by fully qualified column name
    pub enums: IndexMap<String, String>,
    /// Async policies by constraint or index name
    pub asyncs: IndexMap<String, AsyncPolicy>,
}

impl Overrides {
    /// Check whether a table or column name is in the ignore list.
    pub fn is_ignored(&self, name: &str) -> bool {
        !name.is_empty() && self.ignored.contains(name)
    }

    pub fn entity(&self, table_name: &str) -> Option<&EntityOverride> {
        self.entities.get(table_name)
    }

    pub fn plural(&self, entity_name: &str) -> Option<&str> {
        self.plurals.get(entity_name).map(String::as_str)
    }

    pub fn async_policy(&self, key_name: &str) -> Option<AsyncPolicy> {
        self.asyncs.get(key_name).copied()
    }
}
