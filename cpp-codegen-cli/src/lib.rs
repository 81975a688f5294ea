//! # cpp-codegen-cli
//!
//! CLI library for generating string and JSON converters for annotated C++
//! enums.
//!
//! This crate provides the functionality behind the `cpp-codegen` binary:
//! header discovery, analysis with `cpp-codegen`, converter generation and
//! file output.
//!
//! ## Architecture
//!
//! - [`config`] - Configuration management and TOML parsing
//! - [`scanner`] - Header discovery and filtering
//! - [`generator`] - Parallel analysis and converter rendering
//! - [`writer`] - File output, dry-run support and freshness checks
//! - [`watcher`] - File system watching for development mode
//! - [`error`] - Error types and handling

pub mod config;
pub mod error;
pub mod generator;
pub mod scanner;
pub mod watcher;
pub mod writer;

// Re-export main types for convenience
pub use config::{Config, ConfigManager};
pub use error::{CliError, CliResult};
pub use generator::{Analysis, ConverterGenerator, DiagnosticPolicy, GeneratedOutput};
pub use scanner::{SourceFile, SourceScanner};
pub use watcher::FileWatcher;
pub use writer::{FileStatus, FileWriter};
