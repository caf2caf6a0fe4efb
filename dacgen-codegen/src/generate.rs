//! The generation orchestrator.

use std::{fmt, path::{Path, PathBuf}, sync::Arc};

use dacgen_core::FileSet;
use dacgen_ir::DataModel;
use dacgen_manifest::ExtractorConfig;

use crate::{
    Error, Result,
    pipeline::{
        Diagnostic, PhaseInfo, Pipeline, TracingPlugin,
        phases::{RenderAggregatePhase, RenderEntitiesPhase},
    },
    template::{TemplateRenderer, Templator, keywords_for},
};

const PREFLIGHT_STAGE: &str = "checking the schema package";
const WRITE_STAGE: &str = "writing generated files";

/// Per-run inputs that do not live in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Active build configuration, e.g. `Debug` or `Release`
    pub configuration: String,
    /// Schema package to read, taking precedence over the configuration
    pub dacpac: Option<PathBuf>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            configuration: "Debug".to_string(),
            dacpac: None,
        }
    }
}

/// Why a run ended without generating anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Disabled,
    ConfigurationNotEnabled(String),
    ArtifactMissing(PathBuf),
    NoArtifact,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Disabled => write!(f, "generation is disabled"),
            SkipReason::ConfigurationNotEnabled(configuration) => write!(
                f,
                "generation is not enabled for the '{configuration}' configuration"
            ),
            SkipReason::ArtifactMissing(path) => {
                write!(f, "schema package '{}' does not exist", path.display())
            }
            SkipReason::NoArtifact => write!(f, "no schema package is configured"),
        }
    }
}

/// Result of the checks made before anything is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preflight {
    Skip(SkipReason),
    /// Generation can go ahead with the package at this path
    Ready(PathBuf),
}

/// Everything a completed run produced.
#[derive(Debug)]
pub struct Generation {
    pub dacpac: PathBuf,
    pub model: DataModel,
    /// Rendered files; empty when rendering was not requested
    pub files: FileSet,
    pub diagnostics: Vec<Diagnostic>,
    /// Files written to disk; empty unless the run was asked to write
    pub written: Vec<PathBuf>,
}

impl Generation {
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity.is_warning())
    }
}

#[derive(Debug)]
pub enum Outcome {
    Skipped(SkipReason),
    Generated(Generation),
}

impl Outcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped(_))
    }

    pub fn generation(&self) -> Option<&Generation> {
        match self {
            Outcome::Generated(generation) => Some(generation),
            Outcome::Skipped(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Resolve,
    Render,
    Write,
}

/// Drives a run: disabled check, preflight, load, resolution, rendering and
/// the final write.
///
/// ```ignore
/// let generator = Generator::load("dacgen.toml")?;
/// match generator.generate(&GenerateOptions::default())? {
///     Outcome::Skipped(reason) => println!("skipped: {reason}"),
///     Outcome::Generated(generation) => println!("{} files", generation.written.len()),
/// }
/// ```
pub struct Generator {
    config: ExtractorConfig,
    renderer: Arc<dyn TemplateRenderer>,
}

impl Generator {
    /// A generator using the bundled template engine.
    pub fn new(config: ExtractorConfig) -> Self {
        let renderer = Arc::new(Templator::new(keywords_for(&config)));
        Self::with_renderer(config, renderer)
    }

    pub fn with_renderer(config: ExtractorConfig, renderer: Arc<dyn TemplateRenderer>) -> Self {
        Self { config, renderer }
    }

    /// Read the configuration file and build a generator from it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config = ExtractorConfig::from_file(path)?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Decide whether the run goes ahead and which package it reads.
    ///
    /// A missing package is an error when `error_if_dacpac_not_found` is
    /// set, otherwise the run is skipped.
    pub fn preflight(&self, options: &GenerateOptions) -> Result<Preflight> {
        let config = &self.config;
        if !config.enabled {
            return Ok(Preflight::Skip(SkipReason::Disabled));
        }
        if !config.is_enabled_for(&options.configuration) {
            return Ok(Preflight::Skip(SkipReason::ConfigurationNotEnabled(
                options.configuration.clone(),
            )));
        }

        let path = options
            .dacpac
            .clone()
            .or_else(|| config.dacpac_path(&options.configuration));
        let strict = config.error_if_dacpac_not_found;
        match path {
            Some(path) if path.is_file() => Ok(Preflight::Ready(path)),
            Some(path) if strict => Err(Error::MissingArtifact { path }.in_stage(PREFLIGHT_STAGE)),
            Some(path) => Ok(Preflight::Skip(SkipReason::ArtifactMissing(path))),
            None if strict => Err(Error::NoArtifactPath.in_stage(PREFLIGHT_STAGE)),
            None => Ok(Preflight::Skip(SkipReason::NoArtifact)),
        }
    }

    /// Load and resolve the model without rendering.
    pub fn resolve(&self, options: &GenerateOptions) -> Result<Outcome> {
        self.run(options, Mode::Resolve)
    }

    /// Render every file without writing anything.
    pub fn render(&self, options: &GenerateOptions) -> Result<Outcome> {
        self.run(options, Mode::Render)
    }

    /// Render every file, then write them all.
    ///
    /// Nothing is written unless every render succeeded.
    pub fn generate(&self, options: &GenerateOptions) -> Result<Outcome> {
        self.run(options, Mode::Write)
    }

    /// Phases of a full run, in order.
    pub fn phase_info(&self) -> Vec<PhaseInfo> {
        self.pipeline(Mode::Write).phase_info()
    }

    fn pipeline(&self, mode: Mode) -> Pipeline {
        let pipeline = Pipeline::new().plugin(TracingPlugin::new());
        if mode == Mode::Resolve {
            return pipeline;
        }
        pipeline
            .phase(RenderEntitiesPhase::new(self.renderer.clone()))
            .phase(RenderAggregatePhase::new(self.renderer.clone()))
    }

    fn run(&self, options: &GenerateOptions, mode: Mode) -> Result<Outcome> {
        let dacpac = match self.preflight(options)? {
            Preflight::Ready(path) => path,
            Preflight::Skip(reason) => {
                tracing::info!(%reason, "skipping generation");
                return Ok(Outcome::Skipped(reason));
            }
        };

        let ctx = self.pipeline(mode).run(self.config.clone(), dacpac.clone())?;

        let written = if mode == Mode::Write {
            ctx.files
                .flush()
                .map_err(|(path, source)| Error::Io { path, source }.in_stage(WRITE_STAGE))?
                .written
        } else {
            Vec::new()
        };

        Ok(Outcome::Generated(Generation {
            dacpac,
            model: ctx.model,
            files: ctx.files,
            diagnostics: ctx.diagnostics,
            written,
        }))
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::Disabled.to_string(), "generation is disabled");
        assert_eq!(
            SkipReason::ConfigurationNotEnabled("Release".into()).to_string(),
            "generation is not enabled for the 'Release' configuration"
        );
    }

    #[test]
    fn test_preflight_without_package_path() {
        let mut config = ExtractorConfig::default();
        let err = Generator::new(config.clone())
            .preflight(&GenerateOptions::default())
            .unwrap_err();
        assert!(matches!(err.root(), Error::NoArtifactPath));

        config.error_if_dacpac_not_found = false;
        let preflight = Generator::new(config)
            .preflight(&GenerateOptions::default())
            .unwrap();
        assert_eq!(preflight, Preflight::Skip(SkipReason::NoArtifact));
    }

    #[test]
    fn test_disabled_wins_over_missing_package() {
        let config = ExtractorConfig {
            enabled: false,
            ..ExtractorConfig::default()
        };
        let outcome = Generator::new(config)
            .generate(&GenerateOptions::default())
            .unwrap();
        assert!(matches!(outcome, Outcome::Skipped(SkipReason::Disabled)));
    }
}
