//! Configuration management for the CLI.
//!
//! This module handles loading configuration from `cpp-codegen.toml` files
//! and merging with command-line arguments.

use crate::error::{CliResult, ConfigError};
use cpp_codegen::{DeclarationBuilder, EmitConfig, FileCase, FileNaming, IndentStyle, OutputLayout};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "cpp-codegen.toml";

/// Main configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output configuration.
    pub output: OutputConfig,

    /// Annotation syntax.
    pub annotation: AnnotationConfig,

    /// Source discovery.
    pub scan: ScanConfig,
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory for generated files.
    pub dir: PathBuf,

    /// Subdirectory of `dir` holding the converters, also used in `#include`.
    pub include_prefix: String,

    /// Extension of generated headers.
    pub header_extension: String,

    /// Extension of generated sources.
    pub source_extension: String,

    /// Name files after the enum (`short`) or its full path (`qualified`).
    pub file_naming: FileNaming,

    /// Keep names as written (`preserve`) or convert them (`snake`).
    pub file_case: FileCase,

    /// Indentation of generated code.
    pub indent: IndentStyle,
}

/// Annotation configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// Marker that opts an enum in.
    pub marker: String,

    /// Drop declarations carrying unknown directives.
    pub strict_directives: bool,
}

/// Source discovery configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Header extensions to scan, without the dot.
    pub extensions: Vec<String>,

    /// File name prefixes to skip.
    pub skip_prefixes: Vec<String>,

    /// Whether to respect .gitignore files.
    pub respect_gitignore: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./generated"),
            include_prefix: "converters".to_string(),
            header_extension: "hpp".to_string(),
            source_extension: "cpp".to_string(),
            file_naming: FileNaming::Short,
            file_case: FileCase::Preserve,
            indent: IndentStyle::Spaces4,
        }
    }
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            marker: cpp_codegen::parser::DEFAULT_MARKER.to_string(),
            strict_directives: false,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: ["h", "hh", "hpp", "hxx"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            skip_prefixes: vec!["test_".to_string()],
            respect_gitignore: true,
        }
    }
}

impl OutputConfig {
    /// File layout for the emitter.
    pub fn layout(&self) -> OutputLayout {
        OutputLayout::new()
            .with_include_prefix(self.include_prefix.clone())
            .with_extensions(self.header_extension.clone(), self.source_extension.clone())
            .with_naming(self.file_naming)
            .with_case(self.file_case)
    }

    /// Emitter settings.
    pub fn emit_config(&self) -> EmitConfig {
        EmitConfig::new().with_indent(self.indent)
    }
}

impl AnnotationConfig {
    /// Declaration builder honoring these settings.
    pub fn builder(&self) -> DeclarationBuilder {
        DeclarationBuilder::new()
            .with_marker(self.marker.clone())
            .with_strict_directives(self.strict_directives)
    }
}

impl Config {
    /// Reject values that would make scanning or generation meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.annotation.marker.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "annotation.marker",
                "marker must not be empty",
            ));
        }
        if self.annotation.marker.split_whitespace().count() > 1 {
            return Err(ConfigError::invalid_value(
                "annotation.marker",
                "marker must be a single word",
            ));
        }
        if self.scan.extensions.is_empty() {
            return Err(ConfigError::invalid_value(
                "scan.extensions",
                "at least one extension is required",
            ));
        }
        for (key, ext) in [
            ("output.header_extension", &self.output.header_extension),
            ("output.source_extension", &self.output.source_extension),
        ] {
            if ext.is_empty() || ext.starts_with('.') {
                return Err(ConfigError::invalid_value(
                    key,
                    format!("'{ext}' is not an extension without a leading dot"),
                ));
            }
        }
        if self.output.header_extension == self.output.source_extension {
            return Err(ConfigError::invalid_value(
                "output.source_extension",
                "header and source extensions must differ",
            ));
        }
        Ok(())
    }
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// If the path is None, attempts to load from the default location.
    /// If no config file exists, returns default configuration. An explicit
    /// path that does not exist is an error.
    pub fn load(path: Option<&Path>) -> CliResult<Config> {
        let config_path = match path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::not_found(path.to_path_buf()).into());
            }
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(CONFIG_FILENAME),
        };

        if !config_path.exists() {
            tracing::debug!("no {CONFIG_FILENAME} found, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config = Self::parse(&config_path, &content)?;
        tracing::debug!(path = %config_path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse and validate configuration text.
    pub fn parse(path: &Path, content: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(content)
            .map_err(|e| ConfigError::invalid_toml(path.to_path_buf(), e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        if let Some(ref output) = args.output {
            config.output.dir = output.clone();
        }

        if let Some(ref marker) = args.marker {
            config.annotation.marker = marker.clone();
        }

        if let Some(strict) = args.strict_directives {
            config.annotation.strict_directives = strict;
        }

        if let Some(respect) = args.respect_gitignore {
            config.scan.respect_gitignore = respect;
        }

        config
    }

    /// Load the configuration, apply `args` and validate the result.
    pub fn resolve(path: Option<&Path>, args: &CliArgs) -> CliResult<Config> {
        let config = Self::merge_cli_args(Self::load(path)?, args);
        config.validate()?;
        Ok(config)
    }

    /// Get default configuration.
    pub fn default_config() -> Config {
        Config::default()
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# cpp-codegen configuration file

[output]
# Output directory for generated converters
dir = "./generated"

# Subdirectory of `dir` for generated files, also used in #include lines
include_prefix = "converters"

# Extensions of generated files
header_extension = "hpp"
source_extension = "cpp"

# Name files after the enum ("short") or its qualified path ("qualified")
file_naming = "short"

# Keep file names as written ("preserve") or convert them ("snake")
file_case = "preserve"

# Indentation of generated code ("spaces2", "spaces4", "tabs")
indent = "spaces4"

[annotation]
# Documentation comment marker that opts an enum in
marker = "@cpp_codegen"

# Drop declarations that carry an unknown directive
strict_directives = false

[scan]
# Header extensions to scan
extensions = ["h", "hh", "hpp", "hxx"]

# Skip files whose name starts with one of these prefixes
skip_prefixes = ["test_"]

# Respect .gitignore files
respect_gitignore = true
"#
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Output directory override.
    pub output: Option<PathBuf>,

    /// Marker override.
    pub marker: Option<String>,

    /// Strict directives override.
    pub strict_directives: Option<bool>,

    /// Gitignore override.
    pub respect_gitignore: Option<bool>,
}
