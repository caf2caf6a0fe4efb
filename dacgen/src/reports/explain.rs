//! Explain command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from a resolution-only run.
#[derive(Debug)]
pub struct ExplainReport {
    /// Path to the config file.
    pub config_path: PathBuf,
    /// Pipeline phases of a full run.
    pub phases: Vec<PhaseInfo>,
    /// Why the run would be skipped, if it would be.
    pub skipped: Option<String>,
    /// The resolved model; `None` when skipped.
    pub resolved: Option<ResolvedModel>,
}

/// Information about a pipeline phase.
#[derive(Debug)]
pub struct PhaseInfo {
    /// Phase name.
    pub name: String,
    /// Phase description.
    pub description: String,
}

#[derive(Debug)]
pub struct ResolvedModel {
    pub dacpac: PathBuf,
    pub entities: Vec<EntityInfo>,
    pub methods: Vec<MethodInfo>,
    pub routines: Vec<RoutineInfo>,
}

#[derive(Debug)]
pub struct EntityInfo {
    /// Qualified table name.
    pub table: String,
    /// Generated type name.
    pub name: String,
    pub access: String,
    pub columns: Vec<ColumnInfo>,
    /// Foreign keys that point at this entity.
    pub children: Vec<String>,
}

#[derive(Debug)]
pub struct ColumnInfo {
    pub name: String,
    pub sql_type: String,
    /// Target type, or `<unmapped>`.
    pub type_name: String,
    pub identity: bool,
}

#[derive(Debug)]
pub struct MethodInfo {
    /// Constraint or index name.
    pub key: String,
    pub kind: String,
    pub entity: String,
    pub unique: bool,
    pub params: Vec<String>,
    /// Verbs generated as async.
    pub asyncs: Vec<&'static str>,
    /// Linked foreign-key accessors.
    pub links: Vec<String>,
}

#[derive(Debug)]
pub struct RoutineInfo {
    pub kind: String,
    pub name: String,
    pub params: Vec<String>,
}

impl Report for ExplainReport {
    fn render(&self, out: &mut dyn Output) {
        out.title("dacgen Pipeline Explanation");
        out.newline();

        out.key_value("Input", &self.config_path.display().to_string());
        out.newline();

        out.section("Pipeline Phases");
        for (i, phase) in self.phases.iter().enumerate() {
            out.numbered_item(i + 1, &format!("{} - {}", phase.name, phase.description));
        }
        out.newline();

        if let Some(reason) = &self.skipped {
            out.key_value("Skipped", reason);
        }
        if let Some(resolved) = &self.resolved {
            render_resolved(out, resolved);
        }
    }
}

fn render_resolved(out: &mut dyn Output, resolved: &ResolvedModel) {
    out.key_value("Schema", &resolved.dacpac.display().to_string());
    out.newline();

    out.section(&format!("Entities ({})", resolved.entities.len()));
    for entity in &resolved.entities {
        out.list_item(&format!(
            "{} {} <- {}",
            entity.access, entity.name, entity.table
        ));
        for column in &entity.columns {
            let identity = if column.identity { " identity" } else { "" };
            out.nested_item(&format!(
                "{}: {} ({}{})",
                column.name, column.type_name, column.sql_type, identity
            ));
        }
        for child in &entity.children {
            out.nested_item(&format!("child rows via {}", child));
        }
    }
    out.newline();

    out.section(&format!("Accessors ({})", resolved.methods.len()));
    for method in &resolved.methods {
        out.list_item(&format!(
            "{} {} on {} by ({}){}",
            if method.unique { "unique" } else { "multiple" },
            method.kind,
            method.entity,
            method.params.join(", "),
            if method.asyncs.is_empty() {
                String::new()
            } else {
                format!(" async: {}", method.asyncs.join(", "))
            }
        ));
        out.nested_item(&method.key);
        for link in &method.links {
            out.nested_item(&format!("includes {}", link));
        }
    }

    if !resolved.routines.is_empty() {
        out.newline();
        out.section(&format!("Routines ({})", resolved.routines.len()));
        for routine in &resolved.routines {
            out.list_item(&format!(
                "{} {}({})",
                routine.kind,
                routine.name,
                routine.params.join(", ")
            ));
        }
    }
}
