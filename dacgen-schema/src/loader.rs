use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use zip::{ZipArchive, result::ZipError};

use crate::{
    error::{Error, Result},
    tree::SchemaTree,
};

/// Archive entry holding the serialized object model.
pub const MODEL_ENTRY: &str = "model.xml";

/// Open a schema package and parse its model document.
pub fn load_dacpac(path: &Path) -> Result<SchemaTree> {
    let archive_error = |source| Error::Archive {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|e| archive_error(ZipError::Io(e)))?;
    let mut archive = ZipArchive::new(BufReader::new(file)).map_err(archive_error)?;

    let mut entry = match archive.by_name(MODEL_ENTRY) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => {
            return Err(Error::MissingEntry {
                path: path.to_path_buf(),
                entry: MODEL_ENTRY.to_string(),
            });
        }
        Err(e) => return Err(archive_error(e)),
    };

    let mut bytes = Vec::with_capacity(initial_capacity(entry.size()));
    entry.read_to_end(&mut bytes).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        entry: MODEL_ENTRY.to_string(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "read model document");

    SchemaTree::parse_bytes(&bytes)
}

/// Upper bound on the buffer reserved up front from the declared entry size.
const PREALLOCATION_LIMIT: u64 = 16 * 1024 * 1024;

/// The declared size comes from the archive header and is not trusted
/// beyond [`PREALLOCATION_LIMIT`]; larger entries grow while reading.
fn initial_capacity(declared: u64) -> usize {
    usize::try_from(declared.min(PREALLOCATION_LIMIT)).unwrap_or(0)
}
