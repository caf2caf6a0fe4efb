//! Type mapping between SQL Server column types and target-language types.

use indexmap::IndexMap;
use serde::Serialize;

use crate::utils::short_name;

/// Coarse classification of a mapped column type.
///
/// Produced directly by the mapper so later stages never inspect type
/// names to decide how a value behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TypeKind {
    Integer,
    Decimal,
    Boolean,
    Text,
    Binary,
    Date,
    Guid,
    Enum,
    Unknown,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Integer => "integer",
            TypeKind::Decimal => "decimal",
            TypeKind::Boolean => "boolean",
            TypeKind::Text => "text",
            TypeKind::Binary => "binary",
            TypeKind::Date => "date",
            TypeKind::Guid => "guid",
            TypeKind::Enum => "enum",
            TypeKind::Unknown => "unknown",
        }
    }
}

/// A resolved target type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappedType {
    pub kind: TypeKind,
    /// Target type name, empty when the kind is [`TypeKind::Unknown`].
    pub name: String,
}

impl MappedType {
    /// The sentinel returned for SQL types without a mapping.
    pub fn unknown() -> Self {
        Self {
            kind: TypeKind::Unknown,
            name: String::new(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.kind == TypeKind::Unknown
    }
}

/// One row of a [`TypeTable`].
#[derive(Debug)]
pub struct TypeEntry {
    /// Normalized SQL type name (lowercase, no brackets)
    pub sql: &'static str,
    pub kind: TypeKind,
    /// Target type for non-null columns
    pub name: &'static str,
    /// Target type for nullable columns, if it differs
    pub nullable: Option<&'static str>,
}

/// Immutable type lookup tables for one target language.
#[derive(Debug)]
pub struct TypeTable {
    pub entries: &'static [TypeEntry],
    /// Storage kind tags consumed by the runtime parameter-binding helper
    pub storage: &'static [(&'static str, &'static str)],
    /// Suffix appended to enum types of nullable columns
    pub nullable_marker: &'static str,
}

impl TypeTable {
    pub fn find(&self, normalized: &str) -> Option<&'static TypeEntry> {
        self.entries.iter().find(|e| e.sql == normalized)
    }

    pub fn storage_kind(&self, normalized: &str) -> Option<&'static str> {
        self.storage
            .iter()
            .find(|(sql, _)| *sql == normalized)
            .map(|(_, kind)| *kind)
    }
}

const fn entry(
    sql: &'static str,
    kind: TypeKind,
    name: &'static str,
    nullable: Option<&'static str>,
) -> TypeEntry {
    TypeEntry {
        sql,
        kind,
        name,
        nullable,
    }
}

/// C# type tables.
pub static CSHARP_TYPES: TypeTable = TypeTable {
    entries: &[
        entry("bigint", TypeKind::Integer, "long", Some("long?")),
        entry("binary", TypeKind::Binary, "byte[]", None),
        entry("bit", TypeKind::Boolean, "bool", Some("bool?")),
        entry("char", TypeKind::Text, "string", None),
        entry("date", TypeKind::Date, "DateTime", Some("DateTime?")),
        entry("datetime", TypeKind::Date, "DateTime", Some("DateTime?")),
        entry("datetime2", TypeKind::Date, "DateTime", Some("DateTime?")),
        entry(
            "datetimeoffset",
            TypeKind::Date,
            "DateTimeOffset",
            Some("DateTimeOffset?"),
        ),
        entry("decimal", TypeKind::Decimal, "decimal", Some("decimal?")),
        entry("float", TypeKind::Decimal, "decimal", Some("decimal?")),
        entry("image", TypeKind::Binary, "byte[]", None),
        entry("int", TypeKind::Integer, "int", Some("int?")),
        entry("money", TypeKind::Decimal, "decimal", Some("decimal?")),
        entry("nchar", TypeKind::Text, "string", None),
        entry("ntext", TypeKind::Text, "string", None),
        entry("numeric", TypeKind::Decimal, "decimal", Some("decimal?")),
        entry("nvarchar", TypeKind::Text, "string", None),
        entry("real", TypeKind::Decimal, "float", Some("float?")),
        entry("rowversion", TypeKind::Binary, "byte[]", None),
        entry("smalldatetime", TypeKind::Date, "DateTime", Some("DateTime?")),
        entry("smallint", TypeKind::Integer, "short", Some("short?")),
        entry("smallmoney", TypeKind::Decimal, "decimal", Some("decimal?")),
        entry("text", TypeKind::Text, "string", None),
        entry("time", TypeKind::Date, "TimeSpan", Some("TimeSpan?")),
        entry("timestamp", TypeKind::Binary, "byte[]", None),
        entry("tinyint", TypeKind::Integer, "byte", Some("byte?")),
        entry("uniqueidentifier", TypeKind::Guid, "Guid", Some("Guid?")),
        entry("varbinary", TypeKind::Binary, "byte[]", None),
        entry("varchar", TypeKind::Text, "string", None),
        entry("xml", TypeKind::Text, "string", None),
    ],
    storage: &[
        ("bigint", "BigInt"),
        ("datetime", "DateTime"),
        ("datetime2", "DateTime2"),
        ("datetimeoffset", "DateTimeOffset"),
        ("nchar", "Nchar"),
        ("ntext", "Ntext"),
        ("nvarchar", "Nvarchar"),
        ("rowversion", "Binary"),
        ("smalldatetime", "SmallDateTime"),
        ("smallint", "SmallInt"),
        ("smallmoney", "SmallMoney"),
        ("timestamp", "Binary"),
        ("tinyint", "TinyInt"),
        ("uniqueidentifier", "Guid"),
        ("varbinary", "VarBinary"),
        ("varchar", "Varchar"),
    ],
    nullable_marker: "?",
};

/// Normalize a schema type name to its bare lowercase short form
/// (e.g. "[NVarChar]" -> "nvarchar").
pub fn normalize_type_name(sql_type: &str) -> String {
    short_name(sql_type).to_lowercase()
}

/// Whether a SQL type is a pseudo-versioning type that never becomes a property.
pub fn is_row_version(sql_type: &str) -> bool {
    matches!(
        normalize_type_name(sql_type).as_str(),
        "timestamp" | "rowversion"
    )
}

/// Trait for mapping SQL types to language-specific type names.
///
/// Implement this trait for each target language to provide type mappings.
pub trait TypeMapper {
    /// The lookup tables backing this mapper
    fn table(&self) -> &'static TypeTable;

    /// Map a SQL type to a target type, returning the unknown sentinel
    /// when no mapping exists.
    fn map_type(&self, sql_type: &str, nullable: bool) -> MappedType {
        let normalized = normalize_type_name(sql_type);
        match self.table().find(&normalized) {
            Some(entry) => {
                let name = match (nullable, entry.nullable) {
                    (true, Some(nullable_name)) => nullable_name,
                    _ => entry.name,
                };
                MappedType {
                    kind: entry.kind,
                    name: name.to_string(),
                }
            }
            None => MappedType::unknown(),
        }
    }

    /// Map a SQL type to the storage kind tag used when binding parameters,
    /// falling back to the normalized name itself.
    fn storage_kind(&self, sql_type: &str) -> String {
        let normalized = normalize_type_name(sql_type);
        match self.table().storage_kind(&normalized) {
            Some(kind) => kind.to_string(),
            None => normalized,
        }
    }
}

/// C# type mapper implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct CSharpTypeMapper;

impl TypeMapper for CSharpTypeMapper {
    fn table(&self) -> &'static TypeTable {
        &CSHARP_TYPES
    }
}

/// Resolves column types, layering enum overrides on top of a [`TypeMapper`].
///
/// Enum overrides are keyed by fully qualified column name.
#[derive(Debug, Clone)]
pub struct ColumnTypeResolver<'a, M = CSharpTypeMapper> {
    mapper: M,
    enums: &'a IndexMap<String, String>,
}

impl<'a> ColumnTypeResolver<'a, CSharpTypeMapper> {
    pub fn csharp(enums: &'a IndexMap<String, String>) -> Self {
        Self::new(CSharpTypeMapper, enums)
    }
}

impl<'a, M: TypeMapper> ColumnTypeResolver<'a, M> {
    pub fn new(mapper: M, enums: &'a IndexMap<String, String>) -> Self {
        Self { mapper, enums }
    }

    pub fn mapper(&self) -> &M {
        &self.mapper
    }

    /// The enum type declared for a column, if any.
    pub fn enum_type(&self, column: &str) -> Option<&'a str> {
        self.enums.get(column.trim()).map(String::as_str)
    }

    /// Resolve the target type of a column.
    pub fn resolve(&self, sql_type: &str, nullable: bool, column: Option<&str>) -> MappedType {
        if let Some(column) = column
            && let Some(enum_type) = self.enum_type(column)
        {
            let marker = if nullable {
                self.mapper.table().nullable_marker
            } else {
                ""
            };
            return MappedType {
                kind: TypeKind::Enum,
                name: format!("{}{}", enum_type, marker),
            };
        }
        self.mapper.map_type(sql_type, nullable)
    }

    pub fn storage_kind(&self, sql_type: &str) -> String {
        self.mapper.storage_kind(sql_type)
    }
}
