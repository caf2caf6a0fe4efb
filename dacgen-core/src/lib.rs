//! Core utilities and types for the dacgen code generator.
//!
//! This crate provides the type mapping tables, SQL object naming helpers
//! and the buffered file writer used across the dacgen workspace.

mod file;
mod type_mapper;
mod utils;

// File operations
pub use file::{FileSet, OutputFile, WriteReport};
// Type mapping
pub use type_mapper::{
    CSHARP_TYPES, CSharpTypeMapper, ColumnTypeResolver, MappedType, TypeEntry, TypeKind,
    TypeMapper, TypeTable, is_row_version, normalize_type_name,
};
// Naming utilities
pub use utils::{bare_name, first_lower, first_upper, name_parts, short_name};
