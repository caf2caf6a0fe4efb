use std::path::PathBuf;

use thiserror::Error;

use crate::template::RenderError;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a generation run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load configuration")]
    Config(#[source] Box<dacgen_manifest::Error>),

    #[error("schema package not found at '{path}'")]
    MissingArtifact { path: PathBuf },

    #[error("no schema package configured; set `dacpac` or `source_project`")]
    NoArtifactPath,

    #[error("failed to load schema package")]
    Schema(#[from] dacgen_schema::Error),

    #[error("failed to render {template}")]
    Render {
        template: String,
        #[source]
        source: RenderError,
    },

    #[error("failed to write '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Pipeline(String),

    /// A failed stage, keeping the original cause reachable through
    /// [`std::error::Error::source`].
    #[error("generation failed while {stage}")]
    Generation {
        stage: &'static str,
        #[source]
        source: Box<Error>,
    },
}

impl From<Box<dacgen_manifest::Error>> for Error {
    fn from(err: Box<dacgen_manifest::Error>) -> Self {
        Error::Config(err)
    }
}

impl Error {
    /// Wrap this error with the stage it happened in.
    pub fn in_stage(self, stage: &'static str) -> Self {
        match self {
            Error::Generation { .. } => self,
            other => Error::Generation {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, skipping stage wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Error::Generation { source, .. } => source.root(),
            other => other,
        }
    }
}
