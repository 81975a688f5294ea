//! Error types for the CLI.
//!
//! Parsing problems in headers are not errors here: the core reports them as
//! diagnostics. These types cover everything around the core: discovering
//! files, loading configuration, assembling output and touching the disk.

use std::path::PathBuf;

use cpp_codegen::GeneratorError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Main error type for CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Error during source file scanning.
    #[error("Failed to scan directory: {0}")]
    Scan(#[from] ScanError),

    /// Error during converter generation.
    #[error("Failed to generate converters: {0}")]
    Generate(#[from] GenerateError),

    /// Error loading configuration.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    /// Error writing output files.
    #[error("Failed to write output: {0}")]
    Write(#[from] WriteError),

    /// Error during file watching.
    #[error("Watch error: {0}")]
    Watch(#[from] WatchError),

    /// Diagnostics failed the build under `--strict` or `--deny-warnings`.
    #[error("{count} diagnostic(s) failed the build")]
    Diagnostics { count: usize },

    /// Validation failed (generated files out of date).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Serializing the declaration model failed.
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Generic IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error during source file scanning.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Directory does not exist.
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// No header files found in directory.
    #[error("No header files found in: {path}")]
    NoSourceFiles { path: PathBuf },

    /// Invalid filter pattern.
    #[error("Invalid filter pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// IO error during scanning.
    #[error("IO error scanning {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from ignore crate walker.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),
}

/// Error during converter generation.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Two declarations render to the same output file.
    #[error("'{first}' and '{second}' both generate {path}")]
    OutputCollision {
        path: PathBuf,
        first: String,
        second: String,
    },

    /// An emitter failed for a declaration.
    #[error("Generation error for '{enum_name}': {source}")]
    Emit {
        enum_name: String,
        #[source]
        source: GeneratorError,
    },
}

/// Error loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid TOML syntax.
    #[error("Invalid TOML in {path}: {message}")]
    InvalidToml { path: PathBuf, message: String },

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// IO error reading config.
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error writing output files.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to create directory.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("Failed to write file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read a previously generated file.
    #[error("Failed to read existing file {path}: {source}")]
    ReadExisting {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error during file watching.
#[derive(Debug, Error)]
pub enum WatchError {
    /// Failed to initialize watcher.
    #[error("Failed to initialize file watcher: {0}")]
    Init(String),

    /// Error from notify crate.
    #[error("Watch notification error: {0}")]
    Notify(String),
}

impl ScanError {
    /// Create a directory not found error.
    pub fn not_found(path: PathBuf) -> Self {
        Self::DirectoryNotFound { path }
    }

    /// Create a no source files error.
    pub fn no_source_files(path: PathBuf) -> Self {
        Self::NoSourceFiles { path }
    }

    /// Create an invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}

impl GenerateError {
    /// Create an output collision error.
    pub fn collision(path: PathBuf, first: impl Into<String>, second: impl Into<String>) -> Self {
        Self::OutputCollision {
            path,
            first: first.into(),
            second: second.into(),
        }
    }
}

impl ConfigError {
    /// Create a not found error.
    pub fn not_found(path: PathBuf) -> Self {
        Self::NotFound { path }
    }

    /// Create an invalid TOML error.
    pub fn invalid_toml(path: PathBuf, message: impl Into<String>) -> Self {
        Self::InvalidToml {
            path,
            message: message.into(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collision_display() {
        let err = GenerateError::collision(
            PathBuf::from("converters/mode.hpp"),
            "a::mode",
            "b::mode",
        );
        assert_eq!(
            err.to_string(),
            "'a::mode' and 'b::mode' both generate converters/mode.hpp"
        );
    }

    #[test]
    fn test_scan_error_wraps_into_cli_error() {
        let err: CliError = ScanError::no_source_files(PathBuf::from("include")).into();
        assert!(matches!(err, CliError::Scan(ScanError::NoSourceFiles { .. })));
        assert_eq!(
            err.to_string(),
            "Failed to scan directory: No header files found in: include"
        );
    }

    #[test]
    fn test_diagnostics_display() {
        let err = CliError::Diagnostics { count: 3 };
        assert_eq!(err.to_string(), "3 diagnostic(s) failed the build");
    }
}
