use crate::EntityProperty;

/// Index of a [`Method`] in [`crate::DataModel::methods`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId(pub usize);

/// Which schema object an accessor was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    ForeignKey,
    PrimaryKey,
    Index,
}

impl MethodKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MethodKind::ForeignKey => "foreign key",
            MethodKind::PrimaryKey => "primary key",
            MethodKind::Index => "index",
        }
    }
}

/// Whether each generated verb is async.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AsyncFlags {
    pub get: bool,
    pub save: bool,
    pub delete: bool,
}

/// One read/write/delete accessor family keyed by a constraint or index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub kind: MethodKind,
    /// Constraint or index name, e.g. `[dbo].[PK_Table1]`
    pub key_name: String,
    /// Qualified name of the owning table
    pub table_name: String,
    /// Display name of the owning entity
    pub entity_name: String,
    /// Key columns in key order
    pub params: Vec<EntityProperty>,
    /// Writable columns of the owning entity
    pub columns: Vec<EntityProperty>,
    pub identity_columns: Vec<EntityProperty>,
    /// Always true for primary keys
    pub unique: bool,
    pub asyncs: AsyncFlags,
    /// Related accessors for composite "include child rows" queries
    pub foreigns: Vec<MethodId>,
}

impl Method {
    /// Referenced column names of the parameters, in order. Only
    /// foreign-key parameters carry one.
    pub fn foreign_names(&self) -> impl Iterator<Item = Option<&str>> {
        self.params.iter().map(|p| p.foreign_name.as_deref())
    }

    /// Whether this accessor's parameters reference exactly `columns`,
    /// position by position.
    pub fn references_columns<S: AsRef<str>>(&self, columns: &[S]) -> bool {
        self.params.len() == columns.len()
            && self
                .foreign_names()
                .zip(columns)
                .all(|(foreign, column)| foreign == Some(column.as_ref()))
    }
}
