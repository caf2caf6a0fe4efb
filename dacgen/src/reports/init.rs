//! Init command report.

use std::path::PathBuf;

use super::output::{Output, Report};

#[derive(Debug)]
pub struct InitReport {
    /// Path of the configuration that was written.
    pub config_path: PathBuf,
}

impl Report for InitReport {
    fn render(&self, out: &mut dyn Output) {
        out.preformatted(&format!("Created {}", self.config_path.display()));
        out.newline();
        out.section("Next steps");
        out.list_item("point `source_project` or `dacpac` at your database project");
        out.list_item("set `model_namespace` and `dal_namespace`");
        out.list_item("run `dacgen check`, then `dacgen generate`");
    }
}
