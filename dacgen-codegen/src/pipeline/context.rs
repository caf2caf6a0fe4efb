//! State carried through the phases of a run.

use std::path::PathBuf;

use dacgen_core::FileSet;
use dacgen_ir::DataModel;
use dacgen_manifest::ExtractorConfig;
use dacgen_schema::SchemaTree;

use super::diagnostic::{Diagnostic, Severity};
use crate::{Error, Result};

/// Context passed through all pipeline phases.
///
/// Each phase fills in its part: the schema tree after loading, the model
/// during resolution, the rendered files during rendering.
#[derive(Debug)]
pub struct CompilationContext {
    pub config: ExtractorConfig,
    /// Location of the schema package being read
    pub dacpac: PathBuf,
    /// The parsed model document (populated by the load phase)
    pub schema: Option<SchemaTree>,
    pub model: DataModel,
    /// Rendered files, written only once every render succeeded
    pub files: FileSet,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompilationContext {
    pub fn new(config: ExtractorConfig, dacpac: impl Into<PathBuf>) -> Self {
        Self {
            config,
            dacpac: dacpac.into(),
            schema: None,
            model: DataModel::default(),
            files: FileSet::new(),
            diagnostics: Vec::new(),
        }
    }

    /// The loaded schema tree.
    ///
    /// # Errors
    ///
    /// Fails when the load phase has not run.
    pub fn schema(&self) -> Result<&SchemaTree> {
        self.schema.as_ref().ok_or_else(schema_not_loaded)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_error())
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_warning())
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity.is_error())
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity.is_warning())
            .count()
    }

    pub fn add_error(&mut self, phase: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::error(phase, message));
    }

    pub fn add_warning(&mut self, phase: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::warning(phase, message));
    }

    pub fn add_info(&mut self, phase: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::info(phase, message));
    }

    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d.severity, Severity::Warning))
    }
}

pub(crate) fn schema_not_loaded() -> Error {
    Error::Pipeline("schema package has not been loaded".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_creation() {
        let ctx = CompilationContext::new(ExtractorConfig::default(), "Db.dacpac");

        assert!(ctx.schema.is_none());
        assert!(ctx.model.entities.is_empty());
        assert!(ctx.files.is_empty());
        assert!(matches!(ctx.schema(), Err(Error::Pipeline(_))));
    }

    #[test]
    fn test_context_diagnostics() {
        let mut ctx = CompilationContext::new(ExtractorConfig::default(), "Db.dacpac");

        ctx.add_warning("methods", "just a warning");
        ctx.add_info("load", "just info");
        assert!(!ctx.has_errors());
        assert!(ctx.has_warnings());

        ctx.add_error("render", "broken");
        assert!(ctx.has_errors());
        assert_eq!(ctx.error_count(), 1);
        assert_eq!(ctx.warning_count(), 1);
        assert_eq!(ctx.warnings().count(), 1);
    }
}
