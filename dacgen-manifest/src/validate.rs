//! Validation helpers for configuration parsing.

use miette::SourceSpan;

/// C# reserved keywords that cannot be used as generated type names
pub(crate) const CSHARP_KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

/// Access modifiers accepted for generated types
pub(crate) const ACCESS_MODIFIERS: &[&str] = &[
    "public",
    "internal",
    "private",
    "protected",
    "protected internal",
    "private protected",
];

/// Check if a name is a C# reserved keyword
pub(crate) fn is_csharp_keyword(name: &str) -> bool {
    CSHARP_KEYWORDS.contains(&name)
}

/// Validate that a name is a valid C# identifier.
/// Returns None if valid, Some(reason) if invalid
pub(crate) fn validate_identifier(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        return Some("name cannot be empty");
    }

    if is_csharp_keyword(name) {
        return Some("name is a C# reserved keyword");
    }

    let mut chars = name.chars();

    // First character must be a letter or underscore
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        Some(_) => return Some("name must start with a letter or underscore"),
        None => return Some("name cannot be empty"),
    }

    if chars.any(|c| !(c.is_alphanumeric() || c == '_')) {
        return Some("name must contain only letters, numbers, and underscores");
    }

    None
}

/// Validate a dotted namespace (e.g. "MyApp.Data").
pub(crate) fn validate_namespace(namespace: &str) -> Option<&'static str> {
    namespace.split('.').find_map(validate_identifier)
}

/// Find the span of the `nth` (zero based) quoted occurrence of a value in
/// the TOML source, e.g. `"[dbo].[Table1]"`.
pub(crate) fn find_value_span(src: &str, value: &str, nth: usize) -> Option<SourceSpan> {
    for quote in ['"', '\''] {
        let needle = format!("{quote}{value}{quote}");
        if let Some((pos, _)) = src.match_indices(&needle).nth(nth) {
            // +1 to skip the opening quote
            return Some(SourceSpan::from((pos + 1, value.len())));
        }
    }
    None
}
