//! Generate command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from code generation.
#[derive(Debug)]
pub struct GenerateReport {
    /// Warning messages from the pipeline.
    pub warnings: Vec<String>,

    /// Generation result (files written, preview, or skipped).
    pub result: GenerationResult,
}

/// Result of code generation.
#[derive(Debug)]
pub enum GenerationResult {
    /// Files were written to disk.
    Written(WrittenResult),
    /// Dry-run preview.
    Preview(PreviewResult),
    /// Nothing was generated, with the reason.
    Skipped(String),
}

/// Result when files were written to disk.
#[derive(Debug)]
pub struct WrittenResult {
    /// Schema package the model was read from.
    pub dacpac: PathBuf,
    pub entity_count: usize,
    pub method_count: usize,
    /// Files written, in write order.
    pub files: Vec<PathBuf>,
}

/// Result of a dry-run preview.
#[derive(Debug)]
pub struct PreviewResult {
    /// Files that would be generated.
    pub files: Vec<PreviewFile>,
}

/// A file in preview mode.
#[derive(Debug)]
pub struct PreviewFile {
    /// File path.
    pub path: String,
    /// File content.
    pub content: String,
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        for warning in &self.warnings {
            out.warning(warning);
        }

        match &self.result {
            GenerationResult::Written(written) => Self::render_written(out, written),
            GenerationResult::Preview(preview) => Self::render_preview(out, preview),
            GenerationResult::Skipped(reason) => {
                out.key_value("Skipped", reason);
            }
        }
    }
}

impl GenerateReport {
    fn render_written(out: &mut dyn Output, written: &WrittenResult) {
        out.key_value("Schema", &written.dacpac.display().to_string());
        out.key_value(
            "Resolved",
            &format!(
                "{} entit{}, {} accessor{}",
                written.entity_count,
                if written.entity_count == 1 { "y" } else { "ies" },
                written.method_count,
                if written.method_count == 1 { "" } else { "s" }
            ),
        );
        out.newline();

        out.section(&format!("Generated ({})", written.files.len()));
        for file in &written.files {
            out.added_item(&file.display().to_string());
        }
    }

    fn render_preview(out: &mut dyn Output, preview: &PreviewResult) {
        for file in &preview.files {
            out.divider(&file.path);
            out.preformatted(&file.content);
        }

        out.divider("Summary");
        out.preformatted(&format!(
            "{} files would be generated",
            preview.files.len()
        ));
    }
}
