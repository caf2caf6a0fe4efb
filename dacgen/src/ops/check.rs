//! Check operation - configuration and schema validation.

use std::path::Path;

use dacgen_codegen::{
    GenerateOptions, Generator, Outcome,
    pipeline::Severity,
};
use eyre::{Context, Result};

use super::diagnostic_message;
use crate::reports::{CheckReport, CheckSummary};

/// Execute the check operation.
///
/// Loads and resolves the schema package without rendering, and returns the
/// diagnostics collected on the way.
pub fn check(
    generator: &Generator,
    options: &GenerateOptions,
    config_path: &Path,
) -> Result<CheckReport> {
    let outcome = generator.resolve(options).wrap_err("Validation failed")?;

    let generation = match outcome {
        Outcome::Skipped(reason) => {
            return Ok(CheckReport {
                config_path: config_path.to_path_buf(),
                skipped: Some(reason.to_string()),
                summary: None,
                errors: Vec::new(),
                warnings: Vec::new(),
                infos: Vec::new(),
            });
        }
        Outcome::Generated(generation) => generation,
    };

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut infos = Vec::new();

    for diag in &generation.diagnostics {
        let msg = diagnostic_message(diag);
        match diag.severity {
            Severity::Error => errors.push(msg),
            Severity::Warning => warnings.push(msg),
            Severity::Info => infos.push(msg),
        }
    }

    let model = &generation.model;
    Ok(CheckReport {
        config_path: config_path.to_path_buf(),
        skipped: None,
        summary: Some(CheckSummary {
            dacpac: generation.dacpac.clone(),
            entity_count: model.entities.len(),
            method_count: model.methods.len(),
            routine_count: model.routines.len(),
        }),
        errors,
        warnings,
        infos,
    })
}
