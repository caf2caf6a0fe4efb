//! Generate operation - render and write the C# sources.

use dacgen_codegen::{GenerateOptions, Generator, Outcome};
use eyre::Result;

use super::diagnostic_message;
use crate::reports::{GenerateReport, GenerationResult, PreviewFile, PreviewResult, WrittenResult};

/// Options for the generate operation.
pub struct GenerateRunOptions {
    /// Whether to preview without writing files.
    pub dry_run: bool,
}

/// Execute the generate operation.
///
/// In dry-run mode every file is rendered but nothing touches the disk.
pub fn generate(
    generator: &Generator,
    options: &GenerateOptions,
    opts: GenerateRunOptions,
) -> Result<GenerateReport> {
    let outcome = if opts.dry_run {
        generator.render(options)?
    } else {
        generator.generate(options)?
    };

    let generation = match outcome {
        Outcome::Skipped(reason) => {
            return Ok(GenerateReport {
                warnings: Vec::new(),
                result: GenerationResult::Skipped(reason.to_string()),
            });
        }
        Outcome::Generated(generation) => generation,
    };

    let warnings = generation.warnings().map(diagnostic_message).collect();

    let result = if opts.dry_run {
        let files = generation
            .files
            .iter()
            .map(|f| PreviewFile {
                path: f.path().display().to_string(),
                content: f.content().to_string(),
            })
            .collect();
        GenerationResult::Preview(PreviewResult { files })
    } else {
        GenerationResult::Written(WrittenResult {
            dacpac: generation.dacpac,
            entity_count: generation.model.entities.len(),
            method_count: generation.model.methods.len(),
            files: generation.written,
        })
    };

    Ok(GenerateReport { warnings, result })
}
