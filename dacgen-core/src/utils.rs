//! Naming helpers for SQL object identifiers.
//!
//! Schema objects arrive fully qualified and bracket-delimited, e.g.
//! `[dbo].[Table1].[Id]`. These helpers split and reshape such names.

/// Split a qualified SQL name into its parts, respecting bracket delimiters
/// (e.g. "[dbo].[Table.1]" -> ["dbo", "Table.1"]).
pub fn name_parts(full: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_brackets = false;

    for (i, c) in full.char_indices() {
        match c {
            '[' => in_brackets = true,
            ']' => in_brackets = false,
            '.' if !in_brackets => {
                parts.push(strip_brackets(&full[start..i]));
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(strip_brackets(&full[start..]));
    parts
}

fn strip_brackets(part: &str) -> &str {
    part.trim().trim_start_matches('[').trim_end_matches(']')
}

/// Last segment of a qualified name without brackets (e.g. "[dbo].[Table1]" -> "Table1")
pub fn short_name(full: &str) -> &str {
    name_parts(full).pop().unwrap_or_default()
}

/// Remove bracket delimiters and turn separators into underscores
/// (e.g. "[dbo].[Procedure1]" -> "dbo_Procedure1")
pub fn bare_name(full: &str) -> String {
    full.replace(['[', ']'], "").replace('.', "_")
}

/// Uppercase the first character (e.g. "int" -> "Int")
pub fn first_upper(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().chain(chars).collect(),
    }
}

/// Lowercase the first character (e.g. "ForId" -> "forId")
pub fn first_lower(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_lowercase().chain(chars).collect(),
    }
}
