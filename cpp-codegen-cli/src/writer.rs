//! File writer for generated converters.
//!
//! Writes generated files under the output directory, with support for
//! dry-run mode, and checks whether files on disk are up to date.

use crate::error::{CliResult, WriteError};
use crate::generator::GeneratedFile;
use std::path::{Path, PathBuf};

/// Result of a write operation.
#[derive(Debug)]
pub enum WriteResult {
    /// File was written successfully.
    Written {
        /// Path to the written file.
        path: PathBuf,
        /// Number of bytes written.
        bytes: usize,
    },
    /// File already had the generated content and was left alone.
    Unchanged {
        /// Path to the file.
        path: PathBuf,
    },
    /// Dry run - content was not written.
    DryRun {
        /// Content that would have been written.
        content: String,
        /// Path where content would have been written.
        path: PathBuf,
    },
}

/// State of one generated file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// Content matches.
    Fresh(PathBuf),
    /// Content differs.
    Stale(PathBuf),
    /// File does not exist.
    Missing(PathBuf),
}

/// File writer with dry-run support.
#[derive(Debug)]
pub struct FileWriter {
    /// Directory generated paths are relative to.
    root: PathBuf,

    /// Whether to run in dry-run mode.
    dry_run: bool,
}

impl FileWriter {
    /// Create a new file writer rooted at the output directory.
    pub fn new(root: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            root: root.into(),
            dry_run,
        }
    }

    /// Write content to a path relative to the output directory.
    ///
    /// In dry-run mode, returns the content without writing. Files whose
    /// content already matches are not rewritten, so build systems do not
    /// see a fresh timestamp.
    pub fn write(&self, relative: &Path, content: &str) -> CliResult<WriteResult> {
        let path = self.root.join(relative);

        if self.dry_run {
            return Ok(WriteResult::DryRun {
                content: content.to_string(),
                path,
            });
        }

        if matches!(self.status(relative, content)?, FileStatus::Fresh(_)) {
            tracing::debug!(path = %path.display(), "unchanged");
            return Ok(WriteResult::Unchanged { path });
        }

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| WriteError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        std::fs::write(&path, content).map_err(|e| WriteError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        tracing::debug!(path = %path.display(), bytes = content.len(), "written");
        Ok(WriteResult::Written {
            path,
            bytes: content.len(),
        })
    }

    /// Write every generated file.
    pub fn write_all(&self, files: &[GeneratedFile]) -> CliResult<Vec<WriteResult>> {
        files
            .iter()
            .map(|file| self.write(&file.path, &file.content))
            .collect()
    }

    /// Compare generated content with the file on disk.
    pub fn status(&self, relative: &Path, content: &str) -> CliResult<FileStatus> {
        let path = self.root.join(relative);
        if !path.exists() {
            return Ok(FileStatus::Missing(path));
        }

        let existing = std::fs::read_to_string(&path).map_err(|e| WriteError::ReadExisting {
            path: path.clone(),
            source: e,
        })?;

        if existing == content {
            Ok(FileStatus::Fresh(path))
        } else {
            Ok(FileStatus::Stale(path))
        }
    }

    /// Status of every generated file, in order.
    pub fn check(&self, files: &[GeneratedFile]) -> CliResult<Vec<FileStatus>> {
        files
            .iter()
            .map(|file| self.status(&file.path, &file.content))
            .collect()
    }

    /// Check if running in dry-run mode.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Get the output directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl WriteResult {
    /// Get the path associated with this result.
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path, .. } => path,
            WriteResult::Unchanged { path } => path,
            WriteResult::DryRun { path, .. } => path,
        }
    }

    /// Check if the file was written.
    pub fn was_written(&self) -> bool {
        matches!(self, WriteResult::Written { .. })
    }

    /// Get the number of bytes written (0 unless written).
    pub fn bytes(&self) -> usize {
        match self {
            WriteResult::Written { bytes, .. } => *bytes,
            WriteResult::Unchanged { .. } | WriteResult::DryRun { .. } => 0,
        }
    }
}

impl FileStatus {
    /// Path of the file on disk.
    pub fn path(&self) -> &Path {
        match self {
            FileStatus::Fresh(path) | FileStatus::Stale(path) | FileStatus::Missing(path) => path,
        }
    }

    /// Whether the file is up to date.
    pub fn is_fresh(&self) -> bool {
        matches!(self, FileStatus::Fresh(_))
    }
}
