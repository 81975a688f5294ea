//! Converter generator.
//!
//! Runs the declaration builder over every scanned header and turns the
//! resulting declarations into header/source pairs through the emitter
//! registry of `cpp-codegen`.

use crate::config::Config;
use crate::error::{CliResult, GenerateError};
use crate::scanner::SourceFile;
use cpp_codegen::{render_files, Diagnostic, EmitterRegistry, EnumDeclaration, Severity};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Declarations and diagnostics of one header.
#[derive(Debug, Clone, Serialize)]
pub struct FileAnalysis {
    /// Path relative to the scan root.
    pub relative_path: PathBuf,

    /// Annotated enums, in declaration order.
    pub declarations: Vec<EnumDeclaration>,

    /// Problems found while scanning, ordered by position.
    pub diagnostics: Vec<Diagnostic>,
}

/// Result of analyzing a set of headers, sorted by relative path.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Analysis {
    pub files: Vec<FileAnalysis>,
}

impl Analysis {
    /// All declarations, file by file.
    pub fn declarations(&self) -> impl Iterator<Item = (&Path, &EnumDeclaration)> {
        self.files.iter().flat_map(|file| {
            file.declarations
                .iter()
                .map(move |decl| (file.relative_path.as_path(), decl))
        })
    }

    /// All diagnostics, file by file.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.files.iter().flat_map(|file| file.diagnostics.iter())
    }

    /// Total number of declarations.
    pub fn declaration_count(&self) -> usize {
        self.files.iter().map(|file| file.declarations.len()).sum()
    }

    /// Number of diagnostics with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics()
            .filter(|diagnostic| diagnostic.severity == severity)
            .count()
    }
}

/// Which diagnostics fail a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiagnosticPolicy {
    /// Error diagnostics fail the build.
    pub strict: bool,

    /// Every diagnostic fails the build.
    pub deny_warnings: bool,
}

impl DiagnosticPolicy {
    /// Number of diagnostics in `analysis` that fail the build.
    pub fn failures(&self, analysis: &Analysis) -> usize {
        if self.deny_warnings {
            analysis.diagnostics().count()
        } else if self.strict {
            analysis.count(Severity::Error)
        } else {
            0
        }
    }
}

/// One file to write, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub content: String,
}

/// Everything generated from an analysis.
#[derive(Debug, Clone, Default)]
pub struct GeneratedOutput {
    /// Generated files, headers before sources, in declaration order.
    pub files: Vec<GeneratedFile>,

    /// Number of declarations rendered.
    pub declarations: usize,
}

/// Converter generator driven by the CLI configuration.
pub struct ConverterGenerator {
    config: Config,
    registry: EmitterRegistry,
}

impl ConverterGenerator {
    /// Create a generator with the built-in emitters.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            registry: EmitterRegistry::new(),
        }
    }

    /// Replace the emitter registry.
    pub fn with_registry(mut self, registry: EmitterRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Build the declaration model of every file in parallel.
    pub fn analyze(&self, files: &[SourceFile]) -> Analysis {
        let builder = self.config.annotation.builder();

        let mut analyzed: Vec<FileAnalysis> = files
            .par_iter()
            .map(|file| {
                let (declarations, diagnostics) = builder
                    .build_file(&file.relative_path, &file.content)
                    .into_parts();
                tracing::debug!(
                    file = %file.relative_path.display(),
                    declarations = declarations.len(),
                    diagnostics = diagnostics.len(),
                    "analyzed"
                );
                FileAnalysis {
                    relative_path: file.relative_path.clone(),
                    declarations,
                    diagnostics,
                }
            })
            .collect();

        analyzed.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Analysis { files: analyzed }
    }

    /// Render every declaration of `analysis` into output files.
    pub fn generate(&self, analysis: &Analysis) -> CliResult<GeneratedOutput> {
        let layout = self.config.output.layout();
        let emit_config = self.config.output.emit_config();

        let mut owners: HashMap<PathBuf, String> = HashMap::new();
        let mut output = GeneratedOutput::default();

        for (relative_path, decl) in analysis.declarations() {
            let qualified = decl.qualified_path.to_string();
            warn_duplicate_values(decl);

            let units = self
                .registry
                .emit(decl, &emit_config)
                .map_err(|source| GenerateError::Emit {
                    enum_name: qualified.clone(),
                    source,
                })?;

            let rendered = render_files(decl, &units, &layout, &include_path(relative_path));

            for path in [&rendered.header_path, &rendered.source_path] {
                if let Some(first) = owners.insert(path.clone(), qualified.clone()) {
                    return Err(GenerateError::collision(path.clone(), first, qualified).into());
                }
            }

            output.files.push(GeneratedFile {
                path: rendered.header_path,
                content: rendered.header,
            });
            output.files.push(GeneratedFile {
                path: rendered.source_path,
                content: rendered.source,
            });
            output.declarations += 1;
        }

        tracing::info!(
            declarations = output.declarations,
            files = output.files.len(),
            "generated converters"
        );
        Ok(output)
    }
}

/// Include path of an original header, with forward slashes.
fn include_path(relative_path: &Path) -> String {
    relative_path
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn warn_duplicate_values(decl: &EnumDeclaration) {
    for kind in decl.requested_conversions.iter().copied() {
        for (value, names) in decl.duplicate_values(kind) {
            tracing::warn!(
                path = %decl.qualified_path,
                conversion = %kind,
                value,
                enumerators = %names.join(", "),
                "several enumerators share a value; parsing resolves it to the first"
            );
        }
    }
}
