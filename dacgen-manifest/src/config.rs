//! Generator configuration types and parsing.

use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::Deserialize;

use crate::{
    Error, Result,
    error::SourceContext,
    overrides::{
        AsyncMapping, AsyncPolicy, ColumnOverride, EntityOverride, EnumMapping, Overrides,
        PluralMapping,
    },
    validate::{ACCESS_MODIFIERS, find_value_span, validate_identifier, validate_namespace},
};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "dacgen.toml";

/// Configuration written by `dacgen init`.
pub const DEFAULT_CONFIG: &str = r#"# dacgen configuration

enabled = true
# error_if_dacpac_not_found = true
# enabled_in_configurations = ["Debug"]

# Either point at the database project (the package is looked up in
# bin/<configuration>/) or at the package itself.
source_project = "../Database/Database.sqlproj"
# dacpac = "../Database/bin/Debug/Database.dacpac"

model_namespace = "MyApp.Models"
dal_namespace = "MyApp.Data"
model_out_path = "Models"
dal_out_path = "Data"
data_access_class_name = "DataAccess"
file_name_extension_prefix = "Generated"
class_access = "public"

include_primary_key = true
include_unique_index = true
include_non_unique_index = true
include_foreign_key = true

get_async = false
save_async = false
delete_async = false

usings = []
objects_to_ignore = []

# [[column_overrides]]
# name = "[dbo].[Table1].[Name]"
# type = "nvarchar"
# nullable = false
# annotations = ["DataMember"]

# [[entity_overrides]]
# table_name = "[dbo].[Table1]"
# name = "Customer"
# annotations = ["DataContract"]
# access = "internal"
# include_foreign_key = true

# [[plural_mappings]]
# entity_name = "Category"
# plural_form = "Categories"

# [[enum_mappings]]
# column_full_name = "[dbo].[Order].[Status]"
# enum_type_name = "OrderStatus"

# [[async_mappings]]
# index_name = "[dbo].[PK_Order]"
# get_async = true
# save_async = true
# delete_async = false
"#;

fn default_true() -> bool {
    true
}

fn default_access() -> String {
    "public".to_string()
}

fn default_class_name() -> String {
    "DataAccess".to_string()
}

fn default_model_out_path() -> PathBuf {
    PathBuf::from("Models")
}

fn default_dal_out_path() -> PathBuf {
    PathBuf::from("Data")
}

/// The configuration document as written on disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(default = "default_true")]
    include_primary_key: bool,
    #[serde(default = "default_true")]
    include_unique_index: bool,
    #[serde(default = "default_true")]
    include_non_unique_index: bool,
    #[serde(default = "default_true")]
    include_foreign_key: bool,
    #[serde(default)]
    get_async: bool,
    #[serde(default)]
    save_async: bool,
    #[serde(default)]
    delete_async: bool,
    #[serde(default = "default_true")]
    error_if_dacpac_not_found: bool,
    #[serde(default = "default_access")]
    class_access: String,
    #[serde(default)]
    source_project: Option<PathBuf>,
    #[serde(default)]
    dacpac: Option<PathBuf>,
    #[serde(default)]
    model_namespace: String,
    #[serde(default)]
    dal_namespace: String,
    #[serde(default = "default_model_out_path")]
    model_out_path: PathBuf,
    #[serde(default = "default_dal_out_path")]
    dal_out_path: PathBuf,
    #[serde(default = "default_class_name")]
    data_access_class_name: String,
    #[serde(default)]
    file_name_extension_prefix: Option<String>,
    #[serde(default)]
    usings: Vec<String>,
    #[serde(default)]
    enabled_in_configurations: Vec<String>,
    #[serde(default)]
    objects_to_ignore: Vec<String>,
    #[serde(default)]
    column_overrides: Vec<ColumnOverride>,
    #[serde(default)]
    entity_overrides: Vec<EntityOverride>,
    #[serde(default)]
    plural_mappings: Vec<PluralMapping>,
    #[serde(default)]
    enum_mappings: Vec<EnumMapping>,
    #[serde(default)]
    async_mappings: Vec<AsyncMapping>,
}

/// Which constraint kinds produce accessor methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Features {
    pub primary_key: bool,
    pub unique_index: bool,
    pub non_unique_index: bool,
    pub foreign_key: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            primary_key: true,
            unique_index: true,
            non_unique_index: true,
            foreign_key: true,
        }
    }
}

/// The resolved generator configuration, immutable for a run.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub enabled: bool,
    pub features: Features,
    /// Async policy applied when no per-key mapping exists
    pub async_defaults: AsyncPolicy,
    pub error_if_dacpac_not_found: bool,
    /// Access modifier of the generated data-access class
    pub class_access: String,
    pub source_project: Option<PathBuf>,
    pub dacpac: Option<PathBuf>,
    pub model_namespace: String,
    pub dal_namespace: String,
    pub model_out_path: PathBuf,
    pub dal_out_path: PathBuf,
    pub data_access_class_name: String,
    pub file_name_extension_prefix: Option<String>,
    pub usings: Vec<String>,
    pub enabled_in_configurations: Vec<String>,
    pub overrides: Overrides,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            features: Features::default(),
            async_defaults: AsyncPolicy::default(),
            error_if_dacpac_not_found: true,
            class_access: default_access(),
            source_project: None,
            dacpac: None,
            model_namespace: String::new(),
            dal_namespace: String::new(),
            model_out_path: default_model_out_path(),
            dal_out_path: default_dal_out_path(),
            data_access_class_name: default_class_name(),
            file_name_extension_prefix: None,
            usings: Vec::new(),
            enabled_in_configurations: Vec::new(),
            overrides: Overrides::default(),
        }
    }
}

impl FromStr for ExtractorConfig {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        parse_config(s, CONFIG_FILE_NAME)
    }
}

impl ExtractorConfig {
    /// Parse a configuration file; relative paths are resolved against its directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        let mut config = parse_config(&content, &path.display().to_string())?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Make every relative path absolute against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        join(&mut self.model_out_path);
        join(&mut self.dal_out_path);
        if let Some(p) = self.source_project.as_mut() {
            join(p);
        }
        if let Some(p) = self.dacpac.as_mut() {
            join(p);
        }
    }

    /// Whether generation runs for the given build configuration.
    ///
    /// An empty `enabled_in_configurations` list enables every configuration.
    pub fn is_enabled_for(&self, configuration: &str) -> bool {
        self.enabled
            && (self.enabled_in_configurations.is_empty()
                || self
                    .enabled_in_configurations
                    .iter()
                    .any(|c| c.eq_ignore_ascii_case(configuration)))
    }

    /// Locate the schema package: the explicit `dacpac` path, else
    /// `<project dir>/bin/<configuration>/<project stem>.dacpac`.
    pub fn dacpac_path(&self, configuration: &str) -> Option<PathBuf> {
        if let Some(dacpac) = &self.dacpac {
            return Some(dacpac.clone());
        }
        let project = self.source_project.as_ref()?;
        let stem = project.file_stem()?;
        let dir = project.parent().unwrap_or_else(|| Path::new(""));
        Some(
            dir.join("bin")
                .join(configuration)
                .join(format!("{}.dacpac", stem.to_string_lossy())),
        )
    }

    /// File name for a generated type, honoring the extension prefix segment
    /// (e.g. "Table1.Generated.cs").
    pub fn file_name(&self, type_name: &str) -> String {
        match self
            .file_name_extension_prefix
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
        {
            Some(prefix) => format!("{}.{}.cs", type_name, prefix),
            None => format!("{}.cs", type_name),
        }
    }
}

/// Parse configuration content with the given filename for error reporting.
pub fn parse_config(content: &str, filename: &str) -> Result<ExtractorConfig> {
    let source_ctx = SourceContext::new(content, filename);
    let raw: RawConfig = toml::from_str(content).map_err(|e| source_ctx.parse_error(e))?;
    let config = lower_config(raw, &source_ctx)?;
    tracing::debug!(
        filename,
        ignored = config.overrides.ignored.len(),
        column_overrides = config.overrides.columns.len(),
        entity_overrides = config.overrides.entities.len(),
        "loaded configuration"
    );
    Ok(config)
}

/// Validate the raw document and build the keyed override tables.
fn lower_config(raw: RawConfig, ctx: &SourceContext) -> Result<ExtractorConfig> {
    let src = ctx.src();

    if let Some(reason) = validate_identifier(&raw.data_access_class_name) {
        return Err(ctx.invalid_identifier_error(
            &raw.data_access_class_name,
            "data access class name",
            reason,
            find_value_span(src, &raw.data_access_class_name, 0),
        ));
    }

    for namespace in [&raw.model_namespace, &raw.dal_namespace] {
        if !namespace.is_empty()
            && let Some(reason) = validate_namespace(namespace)
        {
            return Err(ctx.invalid_identifier_error(
                namespace,
                "namespace",
                reason,
                find_value_span(src, namespace, 0),
            ));
        }
    }

    validate_access(&raw.class_access, ctx)?;

    let mut overrides = Overrides {
        ignored: raw.objects_to_ignore.iter().cloned().collect(),
        ..Overrides::default()
    };

    for column in raw.column_overrides {
        let key = column.name.trim().to_string();
        if overrides.columns.contains_key(&key) {
            return Err(duplicate(ctx, "column_overrides", &key));
        }
        overrides.columns.insert(key, column);
    }

    for entity in raw.entity_overrides {
        if let Some(name) = &entity.name
            && let Some(reason) = validate_identifier(name)
        {
            return Err(ctx.invalid_identifier_error(
                name,
                "entity name",
                reason,
                find_value_span(src, name, 0),
            ));
        }
        if let Some(access) = &entity.access {
            validate_access(access, ctx)?;
        }
        let key = entity.table_name.trim().to_string();
        if overrides.entities.contains_key(&key) {
            return Err(duplicate(ctx, "entity_overrides", &key));
        }
        overrides.entities.insert(key, entity);
    }

    for plural in raw.plural_mappings {
        if overrides.plurals.contains_key(&plural.entity_name) {
            return Err(duplicate(ctx, "plural_mappings", &plural.entity_name));
        }
        overrides
            .plurals
            .insert(plural.entity_name, plural.plural_form);
    }

    for mapping in raw.enum_mappings {
        let key = mapping.column_full_name.trim().to_string();
        if overrides.enums.contains_key(&key) {
            return Err(duplicate(ctx, "enum_mappings", &key));
        }
        overrides.enums.insert(key, mapping.enum_type_name);
    }

    for mapping in raw.async_mappings {
        if overrides.asyncs.contains_key(&mapping.index_name) {
            return Err(duplicate(ctx, "async_mappings", &mapping.index_name));
        }
        let policy = AsyncPolicy::from(&mapping);
        overrides.asyncs.insert(mapping.index_name, policy);
    }

    Ok(ExtractorConfig {
        enabled: raw.enabled,
        features: Features {
            primary_key: raw.include_primary_key,
            unique_index: raw.include_unique_index,
            non_unique_index: raw.include_non_unique_index,
            foreign_key: raw.include_foreign_key,
        },
        async_defaults: AsyncPolicy {
            get: raw.get_async,
            save: raw.save_async,
            delete: raw.delete_async,
        },
        error_if_dacpac_not_found: raw.error_if_dacpac_not_found,
        class_access: raw.class_access,
        source_project: raw.source_project,
        dacpac: raw.dacpac,
        model_namespace: raw.model_namespace,
        dal_namespace: raw.dal_namespace,
        model_out_path: raw.model_out_path,
        dal_out_path: raw.dal_out_path,
        data_access_class_name: raw.data_access_class_name,
        file_name_extension_prefix: raw.file_name_extension_prefix,
        usings: raw.usings,
        enabled_in_configurations: raw.enabled_in_configurations,
        overrides,
    })
}

fn validate_access(access: &str, ctx: &SourceContext) -> Result<()> {
    if ACCESS_MODIFIERS.contains(&access) {
        return Ok(());
    }
    Err(ctx.validation_error(
        format!(
            "invalid access modifier '{}', expected one of: {}",
            access,
            ACCESS_MODIFIERS.join(", ")
        ),
        find_value_span(ctx.src(), access, 0),
    ))
}

fn duplicate(ctx: &SourceContext, table: &str, key: &str) -> Box<Error> {
    ctx.duplicate_key_error(table, key, find_value_span(ctx.src(), key, 1))
}
