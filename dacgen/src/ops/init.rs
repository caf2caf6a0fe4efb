//! Init operation - write a starter configuration.

use std::{fs, path::Path};

use dacgen_manifest::{CONFIG_FILE_NAME, DEFAULT_CONFIG};
use eyre::{Context, Result, bail};

use crate::reports::InitReport;

/// Write the default `dacgen.toml` into `dir`, creating the directory when
/// needed. An existing configuration is never overwritten.
pub fn init(dir: &Path) -> Result<InitReport> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        bail!("{} already exists", path.display());
    }

    fs::create_dir_all(dir).wrap_err_with(|| format!("Failed to create {}", dir.display()))?;
    fs::write(&path, DEFAULT_CONFIG)
        .wrap_err_with(|| format!("Failed to write {}", path.display()))?;

    Ok(InitReport { config_path: path })
}
