use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Broad class of a load failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The archive could not be opened or lacks the model entry
    ArchiveFormat,
    /// The model entry is not a well-formed document
    SchemaParse,
}

/// Failure to load a schema package.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to open schema package '{path}'")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("schema package '{path}' has no '{entry}' entry")]
    MissingEntry { path: PathBuf, entry: String },

    #[error("failed to read '{entry}' from '{path}'")]
    Io {
        path: PathBuf,
        entry: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed schema document at byte {position}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("malformed schema document: {0}")]
    Malformed(String),

    #[error("schema document has no root element")]
    NoRoot,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Archive { .. } | Self::MissingEntry { .. } | Self::Io { .. } => {
                ErrorKind::ArchiveFormat
            }
            Self::Xml { .. } | Self::Malformed(_) | Self::NoRoot => ErrorKind::SchemaParse,
        }
    }
}
