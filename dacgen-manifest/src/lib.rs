//! Configuration loading for the dacgen code generator.
//!
//! The configuration is a TOML document (see [`DEFAULT_CONFIG`]) holding the
//! feature switches, naming and output settings, and the override tables
//! applied while resolving the schema.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod config;
mod error;
mod overrides;
mod validate;

pub use config::{
    CONFIG_FILE_NAME, DEFAULT_CONFIG, ExtractorConfig, Features, parse_config,
};
pub use error::{Error, Result, SourceContext};
pub use overrides::{AsyncPolicy, ColumnOverride, EntityOverride, Overrides};
