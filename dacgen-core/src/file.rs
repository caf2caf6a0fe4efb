use std::{
    io,
    path::{Path, PathBuf},
};

/// A rendered file waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    path: PathBuf,
    content: String,
}

impl OutputFile {
    /// Create a new file with the given path and content
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the file content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Write the file, creating parent directories as needed
    pub fn write(&self) -> io::Result<()> {
        write_file(&self.path, &self.content)
    }
}

fn write_file(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
}

/// Summary of a flush.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WriteReport {
    /// Files written, in flush order
    pub written: Vec<PathBuf>,
}

/// Buffered set of rendered files.
///
/// Nothing touches the disk until [`FileSet::flush`] is called, so a run that
/// fails while rendering leaves the output directories untouched.
#[derive(Debug, Default, Clone)]
pub struct FileSet {
    files: Vec<OutputFile>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, file: OutputFile) {
        self.files.push(file);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> &[OutputFile] {
        &self.files
    }

    pub fn iter(&self) -> impl Iterator<Item = &OutputFile> {
        self.files.iter()
    }

    /// Create every output directory, then write all files in order.
    ///
    /// Stops at the first failing write; files already written stay on disk.
    pub fn flush(&self) -> Result<WriteReport, (PathBuf, io::Error)> {
        for file in &self.files {
            if let Some(parent) = file.path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| (parent.to_path_buf(), e))?;
            }
        }

        let mut report = WriteReport::default();
        for file in &self.files {
            file.write().map_err(|e| (file.path.clone(), e))?;
            tracing::info!(path = %file.path.display(), "wrote generated file");
            report.written.push(file.path.clone());
        }
        Ok(report)
    }
}

impl IntoIterator for FileSet {
    type Item = OutputFile;
    type IntoIter = std::vec::IntoIter<OutputFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}
