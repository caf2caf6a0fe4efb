use thiserror::Error;

/// Failure to parse or render a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("unclosed tag at byte {offset}")]
    UnclosedTag { offset: usize },

    #[error("invalid tag '{{{{{tag}}}}}'")]
    InvalidTag { tag: String },

    #[error("section '{section}' is never closed")]
    UnclosedSection { section: String },

    #[error("'{found}' closes a section that was not opened (expected '{expected}')")]
    MismatchedSection { expected: String, found: String },

    #[error("unknown keyword '{keyword}'")]
    UnknownKeyword { keyword: String },

    #[error("keyword '{keyword}' {message}")]
    KeywordInput { keyword: String, message: String },

    #[error("'{path}' is a list or object and cannot be printed")]
    NotScalar { path: String },

    #[error("column '{column}' has unmapped SQL type '{sql_type}'")]
    UnmappedType { column: String, sql_type: String },

    #[error("template data could not be built: {message}")]
    InvalidData { message: String },
}
