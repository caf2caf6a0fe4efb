//! Check command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from configuration and schema validation.
#[derive(Debug)]
pub struct CheckReport {
    /// Path to the config file.
    pub config_path: PathBuf,
    /// Why the run would be skipped, if it would be.
    pub skipped: Option<String>,
    /// What was resolved; `None` when skipped.
    pub summary: Option<CheckSummary>,
    /// Error messages.
    pub errors: Vec<String>,
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Info messages.
    pub infos: Vec<String>,
}

/// Counts of the resolved model.
#[derive(Debug)]
pub struct CheckSummary {
    pub dacpac: PathBuf,
    pub entity_count: usize,
    pub method_count: usize,
    pub routine_count: usize,
}

impl CheckReport {
    /// Whether the check passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        for error in &self.errors {
            out.error(error);
        }

        for warning in &self.warnings {
            out.warning(warning);
        }

        for info in &self.infos {
            out.preformatted(&format!("info: {}", info));
        }

        if !self.warnings.is_empty() || !self.errors.is_empty() {
            out.newline();
        }

        if !self.is_valid() {
            return;
        }

        out.preformatted(&format!("✓ {} is valid", self.config_path.display()));
        if let Some(reason) = &self.skipped {
            out.key_value_indented("Skipped", reason);
        }
        if let Some(summary) = &self.summary {
            out.key_value_indented("Schema", &summary.dacpac.display().to_string());
            out.key_value_indented("Entities", &summary.entity_count.to_string());
            out.key_value_indented("Accessors", &summary.method_count.to_string());
            out.key_value_indented("Routines", &summary.routine_count.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::output::RecordingOutput;

    #[test]
    fn test_invalid_report_prints_errors_only() {
        let report = CheckReport {
            config_path: PathBuf::from("dacgen.toml"),
            skipped: None,
            summary: None,
            errors: vec!["broken".to_string()],
            warnings: Vec::new(),
            infos: Vec::new(),
        };

        let mut out = RecordingOutput::default();
        report.render(&mut out);

        assert!(!report.is_valid());
        assert_eq!(out.lines, vec!["error: broken", ""]);
    }

    #[test]
    fn test_valid_report_prints_counts() {
        let report = CheckReport {
            config_path: PathBuf::from("dacgen.toml"),
            skipped: None,
            summary: Some(CheckSummary {
                dacpac: PathBuf::from("Db.dacpac"),
                entity_count: 2,
                method_count: 3,
                routine_count: 0,
            }),
            errors: Vec::new(),
            warnings: Vec::new(),
            infos: Vec::new(),
        };

        let mut out = RecordingOutput::default();
        report.render(&mut out);

        assert_eq!(
            out.lines,
            vec![
                "✓ dacgen.toml is valid",
                "  Schema: Db.dacpac",
                "  Entities: 2",
                "  Accessors: 3",
                "  Routines: 0",
            ]
        );
    }
}
