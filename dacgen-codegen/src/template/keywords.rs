//! Keywords used by the bundled C# templates.

use dacgen_core::{
    ColumnTypeResolver, CSharpTypeMapper, TypeMapper, bare_name, first_lower, first_upper,
    short_name,
};
use dacgen_manifest::ExtractorConfig;
use indexmap::IndexMap;
use serde_json::Value;

use super::{Keyword, KeywordCall, KeywordRegistry, RenderError, keyword::text_input};

/// Build the keyword registry for a configuration.
pub fn keywords_for(config: &ExtractorConfig) -> KeywordRegistry {
    KeywordRegistry::new()
        .with(Plural::new(config.overrides.plurals.clone()))
        .with(FirstUpper)
        .with(FirstLower)
        .with(ShortName)
        .with(Sanitize)
        .with(CoerceType::new(config.overrides.enums.clone()))
        .with(EnumCast::new(config.overrides.enums.clone()))
        .with(StorageKind)
        .with(Join)
}

/// `Plural`: plural override by entity name, else the name plus `s`.
#[derive(Debug, Default)]
pub struct Plural {
    overrides: IndexMap<String, String>,
}

impl Plural {
    pub fn new(overrides: IndexMap<String, String>) -> Self {
        Self { overrides }
    }

    pub fn pluralize(&self, name: &str) -> String {
        match self.overrides.get(name) {
            Some(plural) => plural.clone(),
            None => format!("{name}s"),
        }
    }
}

impl Keyword for Plural {
    fn name(&self) -> &'static str {
        "Plural"
    }

    fn apply(&self, _call: &mut KeywordCall<'_, '_>, value: Value) -> Result<Value, RenderError> {
        let name = text_input(self.name(), &value)?;
        Ok(Value::String(self.pluralize(&name)))
    }
}

macro_rules! text_keyword {
    ($(#[$doc:meta])* $ty:ident, $name:literal, $transform:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $ty;

        impl Keyword for $ty {
            fn name(&self) -> &'static str {
                $name
            }

            fn apply(
                &self,
                _call: &mut KeywordCall<'_, '_>,
                value: Value,
            ) -> Result<Value, RenderError> {
                let text = text_input($name, &value)?;
                let transform: fn(&str) -> String = $transform;
                Ok(Value::String(transform(&text)))
            }
        }
    };
}

text_keyword!(
    /// `FirstUpper`: uppercase the first character.
    FirstUpper,
    "FirstUpper",
    first_upper
);
text_keyword!(
    /// `FirstLower`: lowercase the first character.
    FirstLower,
    "FirstLower",
    first_lower
);
text_keyword!(
    /// `ShortName`: last part of a qualified name, brackets removed.
    ShortName,
    "ShortName",
    |s| short_name(s).to_string()
);
text_keyword!(
    /// `Sanitize`: strip brackets, turn separators into underscores.
    Sanitize,
    "Sanitize",
    bare_name
);
text_keyword!(
    /// `StorageKind`: parameter binding tag of a SQL type.
    StorageKind,
    "StorageKind",
    |s| CSharpTypeMapper.storage_kind(s)
);

/// `Type("Field")`: target type of a SQL type.
///
/// Reads nullability from `Nullable` in scope (default false) and the
/// qualified column name from the field named by the argument, so enum
/// overrides apply. Unmapped types fail the render.
#[derive(Debug, Default)]
pub struct CoerceType {
    enums: IndexMap<String, String>,
}

impl CoerceType {
    pub fn new(enums: IndexMap<String, String>) -> Self {
        Self { enums }
    }
}

impl Keyword for CoerceType {
    fn name(&self) -> &'static str {
        "Type"
    }

    fn apply(&self, call: &mut KeywordCall<'_, '_>, value: Value) -> Result<Value, RenderError> {
        let sql_type = text_input(self.name(), &value)?;
        let nullable = call.lookup_bool("Nullable").unwrap_or(false);
        let column = call.arg.and_then(|field| call.lookup_str(field));

        let mapped = ColumnTypeResolver::csharp(&self.enums).resolve(&sql_type, nullable, column);
        if mapped.is_unknown() {
            return Err(RenderError::UnmappedType {
                column: column.unwrap_or_default().to_string(),
                sql_type,
            });
        }
        Ok(Value::String(mapped.name))
    }
}

/// `EnumCast("Field")`: `(int)`-style cast to the underlying type when the
/// column is enum-backed, otherwise nothing.
///
/// Nullability defaults to true when `Nullable` is absent.
#[derive(Debug, Default)]
pub struct EnumCast {
    enums: IndexMap<String, String>,
}

impl EnumCast {
    pub fn new(enums: IndexMap<String, String>) -> Self {
        Self { enums }
    }
}

impl Keyword for EnumCast {
    fn name(&self) -> &'static str {
        "EnumCast"
    }

    fn apply(&self, call: &mut KeywordCall<'_, '_>, value: Value) -> Result<Value, RenderError> {
        let sql_type = text_input(self.name(), &value)?;
        let nullable = call.lookup_bool("Nullable").unwrap_or(true);
        let Some(column) = call.arg.and_then(|field| call.lookup_str(field)) else {
            return Ok(Value::String(String::new()));
        };

        let resolver = ColumnTypeResolver::csharp(&self.enums);
        if resolver.enum_type(column).is_none() {
            return Ok(Value::String(String::new()));
        }
        let base = resolver.mapper().map_type(&sql_type, nullable);
        if base.is_unknown() {
            return Err(RenderError::UnmappedType {
                column: column.to_string(),
                sql_type,
            });
        }
        Ok(Value::String(format!("({})", base.name)))
    }
}

/// `Join("sep")`: print the separator before every item but the first of
/// the enclosing repeated block.
#[derive(Debug, Clone, Copy, Default)]
pub struct Join;

impl Keyword for Join {
    fn name(&self) -> &'static str {
        "Join"
    }

    fn apply(&self, call: &mut KeywordCall<'_, '_>, value: Value) -> Result<Value, RenderError> {
        let text = text_input(self.name(), &value)?;
        let position = call.pass.next_position(call.level, call.instance);
        if position == 0 {
            return Ok(Value::String(text));
        }
        Ok(Value::String(format!("{}{}", call.arg.unwrap_or_default(), text)))
    }
}
