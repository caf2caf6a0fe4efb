//! Pipeline orchestrator.

use std::path::PathBuf;

use dacgen_manifest::ExtractorConfig;

use super::{
    CompilationContext, Phase, PhaseInfo, Plugin,
    phases::{EntitiesPhase, LoadPhase, MethodsPhase, RoutinesPhase},
};
use crate::Result;

/// Runs the phases of a generation run in order.
///
/// The built-in phases load the schema package and resolve the data model.
/// Phases added with [`Pipeline::phase`] run after them, typically the render
/// phases. Plugins are called before and after every phase.
///
/// # Example
///
/// ```ignore
/// let pipeline = Pipeline::new()
///     .plugin(TracingPlugin::new())
///     .phase(RenderEntitiesPhase::new(renderer.clone()));
///
/// let ctx = pipeline.run(config, "Db.dacpac")?;
/// ```
pub struct Pipeline {
    phases: Vec<Box<dyn Phase>>,
    plugins: Vec<Box<dyn Plugin>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            phases: Vec::new(),
            plugins: Vec::new(),
        }
    }

    /// Add a phase to run after the built-in phases.
    pub fn phase(mut self, phase: impl Phase + 'static) -> Self {
        self.phases.push(Box::new(phase));
        self
    }

    /// Add a plugin to receive phase lifecycle hooks.
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Every phase this pipeline runs, built-in phases first.
    pub fn phase_info(&self) -> Vec<PhaseInfo> {
        builtin_phases()
            .iter()
            .chain(self.phases.iter())
            .map(|phase| phase.info())
            .collect()
    }

    /// Run every phase against the schema package at `dacpac`.
    ///
    /// # Errors
    ///
    /// The first failing phase or hook stops the run. Its error is wrapped
    /// with the phase description, see [`crate::Error::Generation`].
    pub fn run(&self, config: ExtractorConfig, dacpac: impl Into<PathBuf>) -> Result<CompilationContext> {
        let mut ctx = CompilationContext::new(config, dacpac);

        for phase in builtin_phases().iter().chain(self.phases.iter()) {
            self.run_phase(phase.as_ref(), &mut ctx)
                .map_err(|err| err.in_stage(phase.description()))?;
        }

        Ok(ctx)
    }

    fn run_phase(&self, phase: &dyn Phase, ctx: &mut CompilationContext) -> Result<()> {
        let phase_name = phase.name();

        for plugin in &self.plugins {
            plugin.on_before_phase(phase_name, ctx)?;
        }

        phase.run(ctx)?;

        for plugin in &self.plugins {
            plugin.on_after_phase(phase_name, ctx)?;
        }

        Ok(())
    }
}

fn builtin_phases() -> Vec<Box<dyn Phase>> {
    vec![
        Box::new(LoadPhase),
        Box::new(EntitiesPhase),
        Box::new(MethodsPhase),
        Box::new(RoutinesPhase),
    ]
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use dacgen_schema::testing::{Column, ModelBuilder};
    use tempfile::TempDir;

    use super::*;
    use crate::Error;

    struct CountingPlugin {
        before_count: Arc<AtomicUsize>,
        after_count: Arc<AtomicUsize>,
    }

    impl CountingPlugin {
        fn new() -> (Self, Arc<AtomicUsize>, Arc<AtomicUsize>) {
            let before = Arc::new(AtomicUsize::new(0));
            let after = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    before_count: before.clone(),
                    after_count: after.clone(),
                },
                before,
                after,
            )
        }
    }

    impl Plugin for CountingPlugin {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn on_before_phase(&self, _phase: &str, _ctx: &mut CompilationContext) -> Result<()> {
            self.before_count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn on_after_phase(&self, _phase: &str, _ctx: &mut CompilationContext) -> Result<()> {
            self.after_count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FailingPhase;

    impl Phase for FailingPhase {
        fn name(&self) -> &'static str {
            "fail"
        }

        fn description(&self) -> &'static str {
            "failing on purpose"
        }

        fn run(&self, _ctx: &mut CompilationContext) -> Result<()> {
            Err(Error::Pipeline("boom".into()))
        }
    }

    fn write_dacpac(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("Db.dacpac");
        ModelBuilder::new()
            .table(
                "[dbo].[Table1]",
                &[
                    Column::new("Id", "int").not_null(),
                    Column::new("Name", "nvarchar"),
                ],
            )
            .primary_key("[dbo].[PK_Table1]", "[dbo].[Table1]", &["Id"])
            .write_dacpac(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_pipeline_runs_phases() {
        let dir = TempDir::new().unwrap();
        let dacpac = write_dacpac(&dir);

        let ctx = Pipeline::new()
            .run(ExtractorConfig::default(), dacpac)
            .expect("pipeline should succeed");

        assert!(ctx.schema.is_some());
        assert_eq!(ctx.model.entities.len(), 1);
        assert_eq!(ctx.model.methods.len(), 1);
        assert!(ctx.files.is_empty());
    }

    #[test]
    fn test_pipeline_plugin_hooks() {
        let dir = TempDir::new().unwrap();
        let dacpac = write_dacpac(&dir);
        let (plugin, before_count, after_count) = CountingPlugin::new();

        let pipeline = Pipeline::new().plugin(plugin);
        let _ = pipeline
            .run(ExtractorConfig::default(), dacpac)
            .expect("pipeline should succeed");

        // 4 built-in phases = 4 before + 4 after hooks
        assert_eq!(before_count.load(Ordering::SeqCst), 4);
        assert_eq!(after_count.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_failing_phase_is_wrapped_with_its_description() {
        let dir = TempDir::new().unwrap();
        let dacpac = write_dacpac(&dir);
        let (plugin, _, after_count) = CountingPlugin::new();

        let err = Pipeline::new()
            .plugin(plugin)
            .phase(FailingPhase)
            .run(ExtractorConfig::default(), dacpac)
            .unwrap_err();

        assert_eq!(err.to_string(), "generation failed while failing on purpose");
        assert!(matches!(err.root(), Error::Pipeline(msg) if msg == "boom"));
        assert_eq!(after_count.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_missing_package_fails_in_load() {
        let dir = TempDir::new().unwrap();

        let err = Pipeline::new()
            .run(ExtractorConfig::default(), dir.path().join("missing.dacpac"))
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "generation failed while loading the schema package"
        );
        assert!(matches!(err.root(), Error::Schema(_)));
    }

    #[test]
    fn test_phase_info_lists_builtin_phases_first() {
        let names: Vec<_> = Pipeline::new()
            .phase(FailingPhase)
            .phase_info()
            .into_iter()
            .map(|info| info.name)
            .collect();
        assert_eq!(names, vec!["load", "entities", "methods", "routines", "fail"]);
    }
}
